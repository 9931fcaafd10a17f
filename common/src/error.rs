use thiserror::Error;

/// Everything that can go wrong while building a [`KnockPlan`](crate::config::KnockPlan).
///
/// These are raised before a single knock is sent and end the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("no ports given; at least one port is required")]
    NoPorts,

    #[error("port {0}; allowable ports are 1 - 65535")]
    PortOutOfRange(i64),

    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[error("unsupported network protocol '{0}' (expected tcp or udp)")]
    UnsupportedTransport(String),

    #[error("knock timeout must be greater than zero")]
    ZeroTimeout,

    #[error("invalid target '{0}'")]
    InvalidTarget(String),

    #[error("invalid duration '{0}'")]
    InvalidDuration(String),
}
