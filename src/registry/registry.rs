//! Access to the external coordination service.
//!
//! A [Registry] lists the node endpoints registered under a cluster path.
//! Implementors differ radically in their behaviour: a networked backend
//! queries a hierarchical namespace service, while [SeedRegistry] serves a
//! fixed seed list and is used for static deployments and tests.

use std::future::Future;
use std::{pin::Pin, sync::Arc};

use crate::peer::Peer;
use crate::Result;

/// Future type that can be safely held across `.await` boundaries
/// and is compatible with Tokio
type SafeFuture<Out> = Pin<Box<dyn Sync + Send + Future<Output = Out>>>;

pub type ListOutput = SafeFuture<Result<Vec<Peer>>>;

/// `Registry` represents an `async` trait for listing the nodes registered
/// under a cluster path.
pub trait Registry: Sync + Send {
    /// `== async fn list_nodes(..) -> Result<Vec<Peer>>`
    fn list_nodes(&self, path: &str) -> ListOutput;
}

/// Derives the registry path for the cluster designated by `(type, name)`.
pub fn cluster_path(service_type: &str, name: &str) -> String {
    format!("/actors/{}/{}/nodes", service_type, name)
}

/// [Registry] backend serving a fixed seed list, regardless of path.
pub struct SeedRegistry {
    seeds: Vec<Peer>,
}

impl SeedRegistry {
    pub fn new(seeds: Vec<Peer>) -> Arc<dyn Registry> {
        Arc::new(SeedRegistry { seeds })
    }
}

impl Registry for SeedRegistry {
    fn list_nodes(&self, _path: &str) -> ListOutput {
        let seeds = self.seeds.clone();
        Box::pin(async move { Ok(seeds) })
    }
}
