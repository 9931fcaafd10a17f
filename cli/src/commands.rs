use std::time::Duration;

use clap::{ArgAction, CommandFactory, Parser};
use knockr_common::config::{KnockPlan, Timing, Transport};
use knockr_common::error::PlanError;
use knockr_common::network::ports;
use knockr_common::network::target::Target;
use knockr_common::utils::duration::parse_duration;

const EXAMPLES: &str = "\
Examples:

  # knock on three ports using tcp and other defaults
  knockr my.host.name 1234,8923,1233

  # using udp protocol with a 50ms delay between, knock on three ports
  knockr -n udp -d 50ms 123.123.123.10 8327,183,420";

#[derive(Parser, Debug)]
#[command(name = "knockr", version)]
#[command(about = "Knock on a sequence of ports to open a port-knocking firewall.")]
#[command(after_help = EXAMPLES)]
pub struct CommandLine {
    /// Hostname or IP address to knock on
    pub target: Target,

    /// Ports to knock, in order (comma-separated and/or space-separated)
    #[arg(required = true, num_args = 1.., value_name = "PORTS")]
    pub ports: Vec<String>,

    /// Delay between knocks
    #[arg(short, long, default_value = "100ms", value_parser = parse_duration)]
    pub delay: Duration,

    /// Timeout for each knock
    #[arg(short, long, default_value = "1s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Network protocol (tcp, udp)
    #[arg(short = 'n', long = "network", default_value = "tcp")]
    pub transport: Transport,

    /// Silence all but error output
    #[arg(short, long)]
    pub silent: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "silent")]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_plan(&self) -> Result<KnockPlan, PlanError> {
        let ports: Vec<u16> = ports::collect_ports(&self.ports)?;
        let timing = Timing {
            delay: self.delay,
            timeout: self.timeout,
        };
        KnockPlan::new(
            self.target.clone(),
            ports,
            self.transport,
            timing,
            !self.silent,
        )
    }

    /// One-line usage plus the help pointer, printed after a failed run.
    pub fn usage() -> String {
        let usage = Self::command().render_usage();
        format!("{usage}\n\nFor more information, try '--help'.")
    }

    pub fn log_level(&self) -> &'static str {
        match (self.silent, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
