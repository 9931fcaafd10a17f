use colored::*;
use knockr_core::knock::{KnockOutcome, KnockStatus};
use knockr_core::resolver::DialHost;
use knockr_core::sequencer::Reporter;
use tracing::info;

use crate::terminal::logging::KNOCK_TARGET;

/// Prints one line per knock: host, right-aligned port, outcome.
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn report(&self, host: &DialHost, outcome: &KnockOutcome) {
        info!(target: KNOCK_TARGET, "{}", knock_line(host, outcome));
    }
}

fn knock_line(host: &DialHost, outcome: &KnockOutcome) -> String {
    let text: String = outcome.to_string();
    let result: ColoredString = match outcome.status {
        KnockStatus::Open => text.green().bold(),
        KnockStatus::Sent => text.cyan(),
        KnockStatus::Timeout => text.yellow(),
        KnockStatus::Refused => text.red(),
    };
    format!("{} {:>5} {}", host, outcome.port, result)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
