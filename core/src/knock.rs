//! # Knock Primitives
//!
//! A knock is one bounded attempt against a single port:
//! * **TCP**: a connection attempt. Refused, reset or unreachable are normal
//!   answers for a knock and are reported, never raised.
//! * **UDP**: a single [`MARKER_PAYLOAD`] datagram. There is no handshake, so
//!   [`KnockStatus::Sent`] only means the local stack accepted the datagram;
//!   delivery is never confirmed.

use std::fmt;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use knockr_common::config::Transport;
use tokio::net::{self, TcpStream, UdpSocket};
use tokio::time::timeout;

/// Fixed datagram body for UDP knocks. Makes the knock easy to spot on the wire.
pub const MARKER_PAYLOAD: [u8; 4] = [0xDE, 0xCA, 0xFB, 0xAD];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnockStatus {
    /// TCP handshake completed.
    Open,
    /// The attempt did not finish within the knock timeout.
    Timeout,
    /// The attempt failed for any other reason (refused, unreachable, send error).
    Refused,
    /// UDP marker handed to the local stack.
    Sent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnockOutcome {
    pub port: u16,
    pub status: KnockStatus,
    pub detail: Option<String>,
}

impl KnockOutcome {
    pub fn new(port: u16, status: KnockStatus) -> Self {
        Self {
            port,
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn from_error(port: u16, err: io::Error) -> Self {
        let status = match err.kind() {
            io::ErrorKind::TimedOut => KnockStatus::Timeout,
            _ => KnockStatus::Refused,
        };
        Self::new(port, status).with_detail(err.to_string())
    }

    fn elapsed(port: u16, limit: Duration) -> Self {
        Self::new(port, KnockStatus::Timeout)
            .with_detail(format!("no answer within {}ms", limit.as_millis()))
    }
}

impl fmt::Display for KnockOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.detail) {
            (KnockStatus::Open, _) => write!(f, "open"),
            (KnockStatus::Sent, _) => write!(f, "udp packet sent"),
            (KnockStatus::Timeout, Some(detail)) => write!(f, "timeout ({detail})"),
            (KnockStatus::Timeout, None) => write!(f, "timeout"),
            (KnockStatus::Refused, Some(detail)) => write!(f, "{detail}"),
            (KnockStatus::Refused, None) => write!(f, "refused"),
        }
    }
}

/// Delivers a single knock.
///
/// Implementations must release every socket they open before returning and
/// must never take longer than `limit` (plus scheduling jitter).
#[async_trait]
pub trait Knocker: Send + Sync {
    async fn knock(&self, address: &str, port: u16, limit: Duration) -> KnockOutcome;
}

pub struct TcpKnocker;

#[async_trait]
impl Knocker for TcpKnocker {
    async fn knock(&self, address: &str, port: u16, limit: Duration) -> KnockOutcome {
        match timeout(limit, TcpStream::connect(address)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                KnockOutcome::new(port, KnockStatus::Open)
            }
            Ok(Err(err)) => KnockOutcome::from_error(port, err),
            Err(_elapsed) => KnockOutcome::elapsed(port, limit),
        }
    }
}

pub struct UdpKnocker;

#[async_trait]
impl Knocker for UdpKnocker {
    async fn knock(&self, address: &str, port: u16, limit: Duration) -> KnockOutcome {
        match timeout(limit, send_marker(address)).await {
            Ok(Ok(_)) => KnockOutcome::new(port, KnockStatus::Sent),
            Ok(Err(err)) => KnockOutcome::from_error(port, err),
            Err(_elapsed) => KnockOutcome::elapsed(port, limit),
        }
    }
}

async fn send_marker(address: &str) -> io::Result<usize> {
    let remote: SocketAddr = net::lookup_host(address).await?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("{address} did not resolve to any address"),
        )
    })?;

    let local: SocketAddr = match remote {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };

    let socket = UdpSocket::bind(local).await?;
    socket.connect(remote).await?;
    socket.send(&MARKER_PAYLOAD).await
}

pub fn knocker_for(transport: Transport) -> Box<dyn Knocker> {
    match transport {
        Transport::Tcp => Box::new(TcpKnocker),
        Transport::Udp => Box::new(UdpKnocker),
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
