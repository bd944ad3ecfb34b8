//! The membership view caches the most up to date set of cluster peers.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use colored::Colorize;
use tracing::{debug, warn};

use super::registry::{cluster_path, Registry};
use crate::peer::Peer;

/// A lazily refreshed, ordered view of the peers registered under the
/// cluster's `(type, name)` path.
///
/// Staleness between refreshes is tolerated. The view may include the local
/// node; removing `self` is the candidate selector's responsibility.
pub struct Membership {
    registry: Arc<dyn Registry>,
    path: String,
    peers: Mutex<Vec<Peer>>,
}

impl Membership {
    pub fn new(registry: Arc<dyn Registry>, service_type: &str, name: &str) -> Self {
        let path = cluster_path(service_type, name);
        Membership { registry, path, peers: Mutex::new(vec![]) }
    }

    /// Queries the coordination service and replaces the peer sequence,
    /// returning the new size. Registry failures are logged and read as an
    /// empty cluster; they never propagate.
    ///
    /// The view mutex is not held across the registry query.
    pub async fn refresh(&self) -> usize {
        let listed = match self.registry.list_nodes(&self.path).await {
            Ok(listed) => listed,
            Err(err) => {
                warn!("[{}] registry query failed: {}", "membership".cyan(), err);
                return 0;
            }
        };

        // One refresh never yields duplicate identities.
        let mut seen = HashSet::new();
        let mut next = vec![];
        for peer in listed {
            if seen.insert(peer.clone()) {
                next.push(peer);
            }
        }

        debug!("[{}] refreshed {} peers under {}", "membership".cyan(), next.len(), self.path);
        let mut peers = self.peers.lock().unwrap();
        *peers = next;
        peers.len()
    }

    /// Returns a stable copy of the current peer sequence.
    pub fn snapshot(&self) -> Vec<Peer> {
        self.peers.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.peers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
