//! # Address Resolver
//!
//! Turns a [`Target`] into the host half of every dial address.
//!
//! Hostnames get one lookup before the first knock. The answer itself is
//! thrown away; the point is to warm the system resolver so the first knock
//! does not spend its timeout on DNS while later knocks hit the cache.
//! A hostname that does not resolve ends the run before any knock.

use std::fmt;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use knockr_common::network::target::Target;
use thiserror::Error;
use tokio::net::lookup_host;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to resolve {host}: {source}")]
    Lookup {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("{0} did not resolve to any address")]
    NoAddresses(String),
}

/// Host part of a dial address: an IPv4 literal, a bracketed IPv6 literal or a hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialHost(String);

impl DialHost {
    /// The address a single knock dials.
    pub fn address(&self, port: u16) -> String {
        format!("{}:{port}", self.0)
    }
}

impl fmt::Display for DialHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub async fn resolve(target: &Target) -> Result<DialHost, ResolveError> {
    let Target::Hostname(name) = target else {
        return Ok(DialHost(target.dial_host()));
    };

    let started = Instant::now();
    let addrs: Vec<SocketAddr> = lookup_host((name.as_str(), 0))
        .await
        .map_err(|source| ResolveError::Lookup {
            host: name.clone(),
            source,
        })?
        .collect();

    if addrs.is_empty() {
        return Err(ResolveError::NoAddresses(name.clone()));
    }

    let ips: Vec<IpAddr> = addrs.iter().map(SocketAddr::ip).collect();
    debug!(
        host = %name,
        addresses = ?ips,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "resolver cache warmed"
    );

    Ok(DialHost(target.dial_host()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
