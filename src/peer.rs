//! Structural peer identities of the form `host:port`
//!
//! A [Peer] names a node endpoint as registered in the coordination service.
//! Equality is structural: two peers are the same iff host and port match.

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use crate::{Error, Result};

/// A node endpoint registered in the coordination service.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Peer {
    pub host: String,
    pub port: u16,
}

impl Peer {
    pub fn new(host: &str, port: u16) -> Peer {
        Peer { host: host.to_owned(), port }
    }

    /// Resolves the peer to a socket address, taking the first resolution.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| Error::PeerParseError)?
            .next()
            .ok_or(Error::PeerParseError)
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for Peer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Peer {
    type Err = Error;

    /// Parses a peer description from the format `host:port`
    fn from_str(s: &str) -> Result<Self> {
        let (host, port) = s.rsplit_once(':').ok_or(Error::PeerParseError)?;
        if host.is_empty() {
            return Err(Error::PeerParseError);
        }
        let port: u16 = port.parse().map_err(|_| Error::PeerParseError)?;
        Ok(Peer::new(host, port))
    }
}

impl From<SocketAddr> for Peer {
    fn from(addr: SocketAddr) -> Self {
        Peer { host: addr.ip().to_string(), port: addr.port() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_parse_peer() {
        let peer: Peer = "10.0.0.1:9199".parse().unwrap();
        assert_eq!(peer, Peer::new("10.0.0.1", 9199));
        assert_eq!(format!("{}", peer), "10.0.0.1:9199");

        let peer: Peer = "node-3.cluster.local:29090".parse().unwrap();
        assert_eq!(peer.host, "node-3.cluster.local");
        assert_eq!(peer.port, 29090);
    }

    #[actix_rt::test]
    async fn test_parse_peer_rejects_malformed() {
        assert!("10.0.0.1".parse::<Peer>().is_err());
        assert!(":9199".parse::<Peer>().is_err());
        assert!("10.0.0.1:not-a-port".parse::<Peer>().is_err());
        assert!("10.0.0.1:99999".parse::<Peer>().is_err());
    }

    #[actix_rt::test]
    async fn test_structural_equality() {
        let p1 = Peer::new("h", 9);
        let p2: Peer = "h:9".parse().unwrap();
        assert_eq!(p1, p2);
        assert!(p1 != Peer::new("h", 10));
        assert!(p1 != Peer::new("g", 9));
    }

    #[actix_rt::test]
    async fn test_socket_addr_resolution() {
        let peer = Peer::new("127.0.0.1", 9199);
        let addr = peer.socket_addr().unwrap();
        assert_eq!(addr, "127.0.0.1:9199".parse().unwrap());
    }
}
