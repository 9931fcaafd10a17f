//! # Knock Target Model
//!
//! Defines the host a knock sequence is aimed at.
//!
//! A target is one of:
//! * A literal IPv4 address (e.g. `192.168.1.5`).
//! * A literal IPv6 address, bare or bracketed (e.g. `::1`, `[fe80::1]`).
//! * A hostname, resolved before the first knock.
//!
//! Ports are never part of the target; they are appended per knock.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::PlanError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
    Hostname(String),
}

impl Target {
    /// Host part of a dial address, ready for `host:port` concatenation.
    ///
    /// IPv6 literals are wrapped in brackets so the trailing `:port` stays unambiguous.
    pub fn dial_host(&self) -> String {
        match self {
            Target::V4(addr) => addr.to_string(),
            Target::V6(addr) => format!("[{addr}]"),
            Target::Hostname(name) => name.clone(),
        }
    }
}

impl From<IpAddr> for Target {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => Target::V4(v4),
            IpAddr::V6(v6) => Target::from(v6),
        }
    }
}

/// IPv4-mapped addresses (`::ffff:a.b.c.d`) are knocked over IPv4.
impl From<Ipv6Addr> for Target {
    fn from(addr: Ipv6Addr) -> Self {
        match addr.to_ipv4_mapped() {
            Some(v4) => Target::V4(v4),
            None => Target::V6(addr),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::V4(addr) => write!(f, "{addr}"),
            Target::V6(addr) => write!(f, "{addr}"),
            Target::Hostname(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for Target {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PlanError::InvalidTarget(s.to_string()));
        }

        if let Some(target) = parse_literal(s) {
            return Ok(target);
        }

        if let Some(target) = parse_bracketed(s) {
            return Ok(target);
        }

        parse_hostname(s)
    }
}

fn parse_literal(s: &str) -> Option<Target> {
    s.parse::<IpAddr>().ok().map(Target::from)
}

/// Accepts `[addr]` so users can paste the form they would dial.
fn parse_bracketed(s: &str) -> Option<Target> {
    s.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .and_then(|inner| inner.parse::<Ipv6Addr>().ok())
        .map(Target::from)
}

fn parse_hostname(s: &str) -> Result<Target, PlanError> {
    // A colon here is either a malformed IPv6 literal or an embedded port.
    let forbidden = |c: char| c.is_whitespace() || matches!(c, ':' | '/' | '[' | ']');
    if s.contains(forbidden) {
        return Err(PlanError::InvalidTarget(s.to_string()));
    }
    Ok(Target::Hostname(s.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
