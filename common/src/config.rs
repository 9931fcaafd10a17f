//! # Knock Plan
//!
//! The immutable description of one knocking run. It is built once from
//! validated input and handed to the sequencer by reference.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::PlanError;
use crate::network::ports;
use crate::network::target::Target;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// How a knock is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Connection-oriented; a knock is a connection attempt.
    #[default]
    Tcp,
    /// Connectionless; a knock is a single marker datagram.
    Udp,
}

impl FromStr for Transport {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tcp" => Ok(Transport::Tcp),
            "udp" => Ok(Transport::Udp),
            _ => Err(PlanError::UnsupportedTransport(s.to_string())),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Tcp => write!(f, "tcp"),
            Transport::Udp => write!(f, "udp"),
        }
    }
}

/// Pacing of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Pause between two consecutive knocks. Never applied after the last one.
    pub delay: Duration,
    /// Upper bound for a single knock.
    pub timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnockPlan {
    target: Target,
    ports: Vec<u16>,
    transport: Transport,
    timing: Timing,
    report_each_attempt: bool,
}

impl KnockPlan {
    pub fn new(
        target: Target,
        ports: Vec<u16>,
        transport: Transport,
        timing: Timing,
        report_each_attempt: bool,
    ) -> Result<Self, PlanError> {
        if ports.is_empty() {
            return Err(PlanError::NoPorts);
        }
        for &port in &ports {
            ports::check_range(i64::from(port))?;
        }
        if timing.timeout.is_zero() {
            return Err(PlanError::ZeroTimeout);
        }

        Ok(Self {
            target,
            ports,
            transport,
            timing,
            report_each_attempt,
        })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The knock sequence, in the order given.
    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn delay(&self) -> Duration {
        self.timing.delay
    }

    pub fn timeout(&self) -> Duration {
        self.timing.timeout
    }

    pub fn report_each_attempt(&self) -> bool {
        self.report_each_attempt
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
