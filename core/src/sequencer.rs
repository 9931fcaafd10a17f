//! # Knock Sequencer
//!
//! Drives a [`KnockPlan`] from the first port to the last:
//! one knock at a time, in the given order, each bounded by the plan timeout
//! and followed by the inter-knock delay unless it was the final knock.
//!
//! A knock outcome never aborts the run. Closed and filtered ports are the
//! expected answer for most of a knock sequence.

use std::future;

use knockr_common::config::KnockPlan;
use tokio::time::sleep;
use tracing::{debug, trace};

use crate::knock::{KnockOutcome, Knocker};
use crate::resolver::DialHost;

/// Sink for per-knock results. Decides how a result is rendered, not whether.
pub trait Reporter: Send + Sync {
    fn report(&self, host: &DialHost, outcome: &KnockOutcome);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every port in the plan was knocked.
    Finished { attempted: usize },
    /// The shutdown signal fired first; the remaining ports were skipped.
    Cancelled { attempted: usize },
}

impl Completion {
    pub fn attempted(&self) -> usize {
        match self {
            Completion::Finished { attempted } | Completion::Cancelled { attempted } => *attempted,
        }
    }
}

pub struct Sequencer<'a> {
    plan: &'a KnockPlan,
    host: DialHost,
    knocker: Box<dyn Knocker>,
    reporter: Box<dyn Reporter>,
}

impl<'a> Sequencer<'a> {
    pub fn new(
        plan: &'a KnockPlan,
        host: DialHost,
        knocker: Box<dyn Knocker>,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Self {
            plan,
            host,
            knocker,
            reporter,
        }
    }

    /// Knocks every port of the plan.
    pub async fn run(&self) -> Completion {
        self.run_until(future::pending::<()>()).await
    }

    /// Knocks every port of the plan unless `shutdown` resolves first.
    ///
    /// Cancellation is checked while a knock is in flight and during every delay.
    pub async fn run_until<F>(&self, shutdown: F) -> Completion
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let ports: &[u16] = self.plan.ports();
        let limit = self.plan.timeout();
        debug!(
            host = %self.host,
            transport = %self.plan.transport(),
            knocks = ports.len(),
            "starting knock sequence"
        );

        for (idx, &port) in ports.iter().enumerate() {
            let address: String = self.host.address(port);

            let outcome: KnockOutcome = tokio::select! {
                biased;
                _ = &mut shutdown => return Completion::Cancelled { attempted: idx },
                outcome = self.knocker.knock(&address, port, limit) => outcome,
            };
            trace!(%address, status = ?outcome.status, "knock finished");

            if self.plan.report_each_attempt() {
                self.reporter.report(&self.host, &outcome);
            }

            if idx + 1 == ports.len() {
                break;
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => return Completion::Cancelled { attempted: idx + 1 },
                _ = sleep(self.plan.delay()) => {}
            }
        }

        Completion::Finished {
            attempted: ports.len(),
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
