//! Port reachability in two steps, one per probe state. `resolve` fails only
//! with `DnsFailure`; `connect` fails with `PortUnreachable` or `Timeout`.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use sshprobe_common::error::ProbeError;
use tokio::net::{self, TcpStream};
use tokio::time::timeout;
use tracing::debug;

/// Resolves `host` to every address the system resolver knows for it.
///
/// Resolution is bounded by `limit`; running out of time counts as a DNS failure.
pub async fn resolve(host: &str, port: u16, limit: Duration) -> Result<Vec<SocketAddr>, ProbeError> {
    let addrs: Vec<SocketAddr> = match timeout(limit, net::lookup_host((host, port))).await {
        Ok(Ok(addrs)) => addrs.collect(),
        Ok(Err(e)) => return Err(ProbeError::DnsFailure(e.to_string())),
        Err(_elapsed) => return Err(ProbeError::DnsFailure("DNS resolution timed out".to_string())),
    };

    if addrs.is_empty() {
        return Err(ProbeError::DnsFailure(format!("no addresses found for {host}")));
    }

    debug!(host, ?addrs, "resolved");
    Ok(addrs)
}

/// Opens and immediately closes a TCP connection to the first address that accepts one.
pub async fn connect(addrs: &[SocketAddr], limit: Duration) -> Result<(), ProbeError> {
    let port: u16 = addrs.first().map(SocketAddr::port).unwrap_or_default();

    match timeout(limit, TcpStream::connect(addrs)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            Ok(())
        }
        Ok(Err(e)) if e.kind() == io::ErrorKind::TimedOut => Err(connect_timeout(limit)),
        Ok(Err(e)) => {
            debug!(?addrs, error = %e, "connect failed");
            Err(ProbeError::PortUnreachable(format!(
                "SSH port {port} is not accessible"
            )))
        }
        Err(_elapsed) => Err(connect_timeout(limit)),
    }
}

fn connect_timeout(limit: Duration) -> ProbeError {
    ProbeError::Timeout(format!(
        "Connection timed out after {} seconds",
        limit.as_secs()
    ))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use sshprobe_common::network::status::ProbeStatus;
    use tokio::net::TcpListener;

    const LIMIT: Duration = Duration::from_secs(3);

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn resolve_ip_literal_keeps_port() {
        let addrs = resolve("127.0.0.1", 2222, LIMIT).await.unwrap();
        assert_eq!(addrs, vec!["127.0.0.1:2222".parse::<SocketAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn resolve_reserved_tld_fails() {
        let err = resolve("nonexistent-host-xyz.invalid", 22, LIMIT).await.unwrap_err();
        assert_eq!(err.status(), ProbeStatus::DnsFailed);
    }

    #[tokio::test]
    async fn connect_to_listening_port_succeeds() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let addrs = resolve("127.0.0.1", port, LIMIT).await.unwrap();
        assert!(connect(&addrs, LIMIT).await.is_ok());
    }

    #[tokio::test]
    async fn connect_to_refused_port_is_unreachable() {
        let port = closed_port().await;
        let addrs = resolve("127.0.0.1", port, LIMIT).await.unwrap();

        let err = connect(&addrs, LIMIT).await.unwrap_err();
        assert_eq!(err.status(), ProbeStatus::PortClosed);
        assert_eq!(err.to_string(), format!("SSH port {port} is not accessible"));
    }

    #[tokio::test]
    async fn connect_falls_through_to_a_later_address() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open = listener.local_addr().unwrap();
        let closed: SocketAddr = format!("127.0.0.1:{}", closed_port().await).parse().unwrap();

        assert!(connect(&[closed, open], LIMIT).await.is_ok());
    }

    #[tokio::test]
    #[ignore]
    async fn connect_should_timeout_on_blackholed_address() {
        let limit = Duration::from_secs(1);
        let addrs = resolve("203.0.113.1", 22, limit).await.unwrap();

        let err = connect(&addrs, limit).await.unwrap_err();
        assert_eq!(err.status(), ProbeStatus::Timeout);
        assert_eq!(err.to_string(), "Connection timed out after 1 seconds");
    }
}
