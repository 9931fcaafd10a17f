mod commands;
mod terminal;

use std::process::ExitCode;

use anyhow::Context;
use commands::CommandLine;
use knockr_common::{info, success, warn};
use knockr_core::knock;
use knockr_core::resolver;
use knockr_core::sequencer::{Completion, Sequencer};
use terminal::logging;
use terminal::report::TerminalReporter;
use tracing::{debug, error};

const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.log_level());

    match run(&commands).await {
        Ok(Completion::Finished { .. }) => ExitCode::SUCCESS,
        Ok(Completion::Cancelled { .. }) => ExitCode::from(EXIT_INTERRUPTED),
        Err(err) => {
            error!("knockr v{} error: {err:#}", env!("CARGO_PKG_VERSION"));
            eprintln!("\n{}", CommandLine::usage());
            ExitCode::FAILURE
        }
    }
}

async fn run(commands: &CommandLine) -> anyhow::Result<Completion> {
    let plan = commands.to_plan().context("invalid arguments")?;
    debug!(?plan, "knock plan ready");
    if plan.report_each_attempt() {
        info!(
            "knocking {} ports on {} over {}",
            plan.ports().len(),
            plan.target(),
            plan.transport()
        );
    }

    let host = resolver::resolve(plan.target()).await?;

    let sequencer = Sequencer::new(
        &plan,
        host,
        knock::knocker_for(plan.transport()),
        Box::new(TerminalReporter),
    );

    let completion = sequencer.run_until(shutdown_signal()).await;
    let total: usize = plan.ports().len();
    match completion {
        Completion::Finished { attempted } => {
            if plan.report_each_attempt() {
                success!("knocked {attempted} of {total} ports on {}", plan.target());
            }
        }
        Completion::Cancelled { attempted } => {
            warn!("interrupted after {attempted} of {total} knocks");
        }
    }

    Ok(completion)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for ctrl-c, the sequence will run to the end: {err}");
        std::future::pending::<()>().await;
    }
}
