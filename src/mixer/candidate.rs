//! Candidate selection policies.
//!
//! A selector maps the current membership snapshot to the ordered sublist of
//! peers to mix with this round. Selectors never yield the local node.

use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::peer::Peer;

/// Policy choosing this round's mix partners from `(peers, self)`.
pub type CandidateSelector = Arc<dyn Fn(&[Peer], &Peer) -> Vec<Peer> + Send + Sync>;

/// Selects every peer except the local node, preserving membership order.
pub fn all_except_self() -> CandidateSelector {
    Arc::new(|peers: &[Peer], my_id: &Peer| {
        peers.iter().filter(|peer| *peer != my_id).cloned().collect()
    })
}

/// Selects up to `k` random peers, excluding the local node.
pub fn random_k(k: usize) -> CandidateSelector {
    Arc::new(move |peers: &[Peer], my_id: &Peer| {
        let mut rng = rand::thread_rng();
        let mut others: Vec<Peer> =
            peers.iter().filter(|peer| *peer != my_id).cloned().collect();
        others.shuffle(&mut rng);
        others.truncate(k);
        others
    })
}
