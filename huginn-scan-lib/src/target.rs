#![forbid(unsafe_code)]

use serde::Serialize;
use std::{
    fmt,
    net::{IpAddr, SocketAddr},
    str::FromStr,
};
use tokio::net::lookup_host;
use tracing::debug;

use crate::error::{Result, ScanError};

pub const DEFAULT_TLS_PORT: u16 = 443;

/// A host to scan, as given on the command line
///
/// Accepted forms: `host`, `host:port`, `[v6]:port`, and any of those
/// prefixed with `tls://`. The port defaults to 443.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AnalyzerTarget {
    pub host: String,
    pub port: u16,
}

impl AnalyzerTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }

    /// IP literal of the host, if it is one
    pub fn ip(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }

    /// Name sent in the SNI extension; IP literals are not sent
    pub fn server_name(&self) -> Option<&str> {
        match self.ip() {
            Some(_) => None,
            None => Some(self.host.as_str()),
        }
    }

    /// Resolves the target to socket addresses
    pub async fn resolve(&self) -> Result<Vec<SocketAddr>> {
        if let Some(ip) = self.ip() {
            return Ok(vec![SocketAddr::new(ip, self.port)]);
        }
        debug!(host = %self.host, port = self.port, "resolving target");
        let addresses: Vec<SocketAddr> = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| ScanError::InvalidTarget(format!("failed to resolve {}: {e}", self.host)))?
            .collect();
        if addresses.is_empty() {
            return Err(ScanError::InvalidTarget(format!("no addresses found for {}", self.host)));
        }
        Ok(addresses)
    }
}

impl fmt::Display for AnalyzerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ip() {
            Some(IpAddr::V6(ip)) => write!(f, "[{ip}]:{}", self.port),
            _ => write!(f, "{}:{}", self.host, self.port),
        }
    }
}

impl FromStr for AnalyzerTarget {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| ScanError::InvalidTarget(format!("{s}: {reason}"));

        let rest = s.trim();
        let rest = match rest.split_once("://") {
            Some(("tls", rest)) => rest,
            Some((scheme, _)) => return Err(invalid(&format!("unsupported scheme {scheme}"))),
            None => rest,
        };
        let rest = rest.trim_end_matches('/');
        if rest.is_empty() {
            return Err(invalid("empty host"));
        }

        if let Ok(socket) = rest.parse::<SocketAddr>() {
            return Ok(Self::new(socket.ip().to_string(), socket.port()));
        }
        if let Ok(ip) = rest.parse::<IpAddr>() {
            return Ok(Self::new(ip.to_string(), DEFAULT_TLS_PORT));
        }

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| invalid("invalid port"))?;
                (host, port)
            }
            None => (rest, DEFAULT_TLS_PORT),
        };
        if host.is_empty() || host.contains(['/', '[', ']', ':', ' ']) {
            return Err(invalid("invalid host"));
        }
        if port == 0 {
            return Err(invalid("port must be > 0"));
        }
        Ok(Self::new(host.to_ascii_lowercase(), port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() -> Result<()> {
        let target: AnalyzerTarget = "example.com".parse()?;
        assert_eq!(target, AnalyzerTarget::new("example.com", 443));
        assert_eq!(target.server_name(), Some("example.com"));
        Ok(())
    }

    #[test]
    fn test_scheme_and_port() -> Result<()> {
        let target: AnalyzerTarget = "tls://Mail.Example.com:8443".parse()?;
        assert_eq!(target, AnalyzerTarget::new("mail.example.com", 8443));
        assert_eq!(target.to_string(), "mail.example.com:8443");
        Ok(())
    }

    #[test]
    fn test_ip_literals_have_no_server_name() -> Result<()> {
        let v4: AnalyzerTarget = "127.0.0.1:4433".parse()?;
        assert_eq!(v4.server_name(), None);
        assert_eq!(v4.port, 4433);

        let v6: AnalyzerTarget = "[::1]:4433".parse()?;
        assert_eq!(v6.host, "::1");
        assert_eq!(v6.to_string(), "[::1]:4433");

        let bare_v6: AnalyzerTarget = "::1".parse()?;
        assert_eq!(bare_v6.port, DEFAULT_TLS_PORT);
        Ok(())
    }

    #[test]
    fn test_invalid_targets() {
        for input in ["", "https://example.com", "example.com:http", "example.com:0", "exa mple.com"] {
            assert!(input.parse::<AnalyzerTarget>().is_err(), "{input} should be rejected");
        }
    }

    #[tokio::test]
    async fn test_resolve_ip_literal_skips_dns() -> Result<()> {
        let target = AnalyzerTarget::new("127.0.0.1", 4433);
        let addresses = target.resolve().await?;
        assert_eq!(addresses, vec![SocketAddr::from(([127, 0, 0, 1], 4433))]);
        Ok(())
    }
}
