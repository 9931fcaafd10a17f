#![cfg(test)]
use std::time::{Duration, Instant};

use knockr_common::config::Transport;
use knockr_common::error::PlanError;
use knockr_common::network::ports;
use knockr_core::knock::{KnockStatus, MARKER_PAYLOAD};
use knockr_core::resolver::{self, ResolveError};
use knockr_core::sequencer::Completion;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, UdpSocket};
use tokio::time::timeout;

use crate::utils::{self, run_plan};

async fn closed_tcp_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Open port on loopback: the knock completes the handshake and hangs up.
#[tokio::test]
async fn tcp_knock_on_listening_port() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let plan = utils::plan("127.0.0.1", vec![port], Transport::Tcp, 500, 10);

    let (completion, outcomes) = run_plan(&plan).await.unwrap();

    assert_eq!(completion, Completion::Finished { attempted: 1 });
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, KnockStatus::Open);

    let (mut conn, _) = listener.accept().await.unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(conn.read(&mut buf).await.unwrap(), 0);
}

/// Three closed ports, 50ms timeout, 10ms delay.
#[tokio::test]
async fn tcp_knocks_on_closed_ports_are_paced_and_bounded() {
    let port = closed_tcp_port().await;
    let plan = utils::plan("127.0.0.1", vec![port, port, port], Transport::Tcp, 50, 10);

    let started = Instant::now();
    let (completion, outcomes) = run_plan(&plan).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(completion, Completion::Finished { attempted: 3 });
    assert_eq!(outcomes.len(), 3);
    for outcome in &outcomes {
        assert_eq!(outcome.port, port);
        assert!(
            matches!(outcome.status, KnockStatus::Refused | KnockStatus::Timeout),
            "unexpected status {:?}",
            outcome.status
        );
    }
    assert!(elapsed >= Duration::from_millis(20), "delays were skipped: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(3 * 50 + 2 * 10 + 500), "run overran: {elapsed:?}");
}

/// Mixed open and closed ports keep the given order and never abort the run.
#[tokio::test]
async fn tcp_sequence_preserves_order_across_outcomes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open = listener.local_addr().unwrap().port();
    let closed = closed_tcp_port().await;
    let plan = utils::plan("127.0.0.1", vec![closed, open, closed, open], Transport::Tcp, 200, 0);

    let (completion, outcomes) = run_plan(&plan).await.unwrap();

    assert_eq!(completion.attempted(), 4);
    let ports: Vec<u16> = outcomes.iter().map(|o| o.port).collect();
    assert_eq!(ports, vec![closed, open, closed, open]);
    assert_eq!(outcomes[1].status, KnockStatus::Open);
    assert_eq!(outcomes[3].status, KnockStatus::Open);
    assert_ne!(outcomes[0].status, KnockStatus::Open);
}

#[tokio::test]
async fn hostname_targets_are_resolved_up_front() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let plan = utils::plan("localhost", vec![port], Transport::Tcp, 500, 0);

    let (_, outcomes) = run_plan(&plan).await.unwrap();
    assert_eq!(outcomes[0].status, KnockStatus::Open);
}

/// A hostname that does not resolve stops the run before a sequencer exists.
#[tokio::test]
async fn unresolvable_hostname_fails_before_any_knock() {
    let plan = utils::plan("knockr-does-not-exist.invalid", vec![7000, 8000], Transport::Tcp, 50, 0);

    let err = resolver::resolve(plan.target()).await.unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Lookup { .. } | ResolveError::NoAddresses(_)
    ));
    assert!(err.to_string().contains("knockr-does-not-exist.invalid"));

    let run = run_plan(&plan).await;
    assert!(run.is_err(), "a run against an unresolvable host must fail");
}

/// Each UDP knock lands one marker datagram, in sequence order.
#[tokio::test]
async fn udp_knocks_deliver_markers_in_order() {
    let first = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let second = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let a = first.local_addr().unwrap().port();
    let b = second.local_addr().unwrap().port();
    let plan = utils::plan("127.0.0.1", vec![a, b, a], Transport::Udp, 200, 5);

    let (completion, outcomes) = run_plan(&plan).await.unwrap();

    assert_eq!(completion, Completion::Finished { attempted: 3 });
    assert!(outcomes.iter().all(|o| o.status == KnockStatus::Sent));

    let mut buf = [0u8; 16];
    for socket in [&first, &first, &second] {
        let (len, _) = timeout(Duration::from_millis(500), socket.recv_from(&mut buf))
            .await
            .expect("marker datagram never arrived")
            .unwrap();
        assert_eq!(&buf[..len], &MARKER_PAYLOAD);
    }
}

/// With no listener there is nothing to confirm delivery; the knock still counts as sent.
#[tokio::test]
async fn udp_knock_without_listener_is_sent() {
    let port = {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        socket.local_addr().unwrap().port()
    };
    let plan = utils::plan("127.0.0.1", vec![port], Transport::Udp, 200, 0);

    let (_, outcomes) = run_plan(&plan).await.unwrap();
    assert_eq!(outcomes[0].status, KnockStatus::Sent);
}

#[test]
fn invalid_ports_fail_before_any_knock() {
    assert_eq!(ports::parse_port_list("22,0"), Err(PlanError::PortOutOfRange(0)));
    assert_eq!(
        ports::parse_port_list("65536"),
        Err(PlanError::PortOutOfRange(65536))
    );
    let none: [&str; 0] = [];
    assert_eq!(ports::collect_ports(&none), Err(PlanError::NoPorts));
}
