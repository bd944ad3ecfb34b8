use std::net::SocketAddr;
use std::sync::Arc;

use actix::{Actor, Arbiter};
use colored::Colorize;
use tokio::time::Duration;
use tracing::info;

use crate::mixer::{all_except_self, random_k, MixableHandle, PushMixer, RpcCommunication};
use crate::model::AveragingModel;
use crate::peer::Peer;
use crate::registry::{Membership, SeedRegistry};
use crate::server::settings::Settings;
use crate::server::{Router, Server};
use crate::Result;

/// Wires the registry, membership, mixer and server together and launches
/// them on dedicated arbiters.
pub fn run(settings: Settings) -> Result<()> {
    let my_id: Peer = settings.listener_ip.parse()?;
    let listener_ip: SocketAddr = my_id.socket_addr()?;

    let mut seeds = vec![];
    for seed in settings.seed_peers.iter() {
        seeds.push(seed.parse()?);
    }

    info!("[{}] node {} is starting", "node".green(), my_id);

    let registry = SeedRegistry::new(seeds);
    let membership =
        Arc::new(Membership::new(registry, &settings.service_type, &settings.service_name));
    let communication = RpcCommunication::new(Duration::from_secs(settings.timeout_secs));
    let adapter = MixableHandle::new(Box::new(AveragingModel::new(settings.model_dimension)));
    let selector = match settings.mix_candidates {
        Some(k) => random_k(k),
        None => all_except_self(),
    };
    let mixer = PushMixer::new(
        communication,
        membership,
        adapter,
        selector,
        settings.count_threshold,
        Duration::from_secs(settings.tick_threshold_secs),
        my_id,
    );

    let execution = async move {
        // Launch the background worker before serving peers.
        mixer.start();

        // Setup the router
        let router = Router::new(mixer);
        let router_addr = router.start();
        // Setup the server
        let server =
            Server::new(format!("0.0.0.0:{}", listener_ip.port()).parse().unwrap(), router_addr);
        // Listen for incoming connections
        server.listen().await.unwrap()
    };

    let arbiter = Arbiter::new();
    arbiter.spawn(execution);

    Ok(())
}
