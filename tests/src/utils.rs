#![cfg(test)]
use std::sync::{Arc, Mutex};
use std::time::Duration;

use knockr_common::config::{KnockPlan, Timing, Transport};
use knockr_common::network::target::Target;
use knockr_core::knock::{self, KnockOutcome};
use knockr_core::resolver::{self, DialHost};
use knockr_core::sequencer::{Completion, Reporter, Sequencer};

/// Collects every reported outcome so tests can inspect the run afterwards.
#[derive(Clone, Default)]
pub struct OutcomeLog(Arc<Mutex<Vec<KnockOutcome>>>);

impl OutcomeLog {
    pub fn outcomes(&self) -> Vec<KnockOutcome> {
        self.0.lock().unwrap().clone()
    }
}

impl Reporter for OutcomeLog {
    fn report(&self, _host: &DialHost, outcome: &KnockOutcome) {
        self.0.lock().unwrap().push(outcome.clone());
    }
}

pub fn plan(target: &str, ports: Vec<u16>, transport: Transport, timeout_ms: u64, delay_ms: u64) -> KnockPlan {
    let timing = Timing {
        delay: Duration::from_millis(delay_ms),
        timeout: Duration::from_millis(timeout_ms),
    };
    let target: Target = target.parse().expect("test target should parse");
    KnockPlan::new(target, ports, transport, timing, true).expect("test plan should be valid")
}

/// Resolves and runs `plan` with the real network knockers.
pub async fn run_plan(plan: &KnockPlan) -> anyhow::Result<(Completion, Vec<KnockOutcome>)> {
    let log = OutcomeLog::default();
    let host = resolver::resolve(plan.target()).await?;
    let sequencer = Sequencer::new(
        plan,
        host,
        knock::knocker_for(plan.transport()),
        Box::new(log.clone()),
    );
    let completion = sequencer.run().await;
    Ok((completion, log.outcomes()))
}
