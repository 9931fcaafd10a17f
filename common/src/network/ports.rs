//! Port list parsing.
//!
//! The knock sequence is the order ports are written in, so nothing here
//! sorts or deduplicates.

use crate::error::PlanError;

pub const MIN_PORT: i64 = 1;
pub const MAX_PORT: i64 = u16::MAX as i64;

/// Parses a comma-separated port list such as `"7000,8000,9000"`.
pub fn parse_port_list(s: &str) -> Result<Vec<u16>, PlanError> {
    s.split(',').map(parse_port).collect()
}

/// Flattens several port arguments, each possibly a comma list, into one sequence.
///
/// `["1,2", "3", "2"]` yields `[1, 2, 3, 2]`.
pub fn collect_ports<S: AsRef<str>>(args: &[S]) -> Result<Vec<u16>, PlanError> {
    let mut ports: Vec<u16> = Vec::new();
    for arg in args {
        ports.extend(parse_port_list(arg.as_ref())?);
    }
    if ports.is_empty() {
        return Err(PlanError::NoPorts);
    }
    Ok(ports)
}

fn parse_port(item: &str) -> Result<u16, PlanError> {
    let item = item.trim();
    let value: i64 = item
        .parse()
        .map_err(|_| PlanError::InvalidPort(item.to_string()))?;
    check_range(value)
}

pub fn check_range(value: i64) -> Result<u16, PlanError> {
    if !(MIN_PORT..=MAX_PORT).contains(&value) {
        return Err(PlanError::PortOutOfRange(value));
    }
    Ok(value as u16)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
