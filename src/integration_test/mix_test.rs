#[cfg(test)]
mod mix_test {
    use crate::client;
    use crate::mixer::{all_except_self, Mixable, MixableHandle, PushMixer, RpcCommunication};
    use crate::model::{AveragingModel, WeightsDiff};
    use crate::peer::Peer;
    use crate::protocol::{MixAck, Pull, PullAck, PullArgumentAck, Push, PushAck, Request, Response};
    use crate::registry::{Membership, SeedRegistry};
    use crate::server::{Router, Server};
    use crate::Result;

    use actix::Actor;
    use std::sync::Arc;
    use tokio::time::Duration;

    /// Stands up a full node: model, mixer, router and a listening server.
    async fn spawn_node(port: u16, seeds: Vec<Peer>, samples: Vec<Vec<f64>>) -> Arc<PushMixer> {
        let my_id = Peer::new("127.0.0.1", port);
        let registry = SeedRegistry::new(seeds);
        let membership = Arc::new(Membership::new(registry, "mean", "itest"));
        let communication = RpcCommunication::new(Duration::from_secs(3));

        let mut model = AveragingModel::new(2);
        for sample in samples.iter() {
            model.observe(sample);
        }
        let adapter = MixableHandle::new(Box::new(model));

        let mixer = PushMixer::new(
            communication,
            membership,
            adapter,
            all_except_self(),
            0,
            Duration::ZERO,
            my_id.clone(),
        );

        let router = Router::new(mixer.clone());
        let router_addr = router.start();
        let server = Server::new(my_id.socket_addr().unwrap(), router_addr);
        tokio::spawn(async move { server.listen().await.unwrap() });
        mixer
    }

    /// Reads a node's weight vector through its `pull` endpoint.
    async fn pull_weights(peer: &Peer) -> Vec<f64> {
        let probe = AveragingModel::new(2);
        let arg = probe.get_argument().unwrap();
        let response =
            client::oneshot(peer.socket_addr().unwrap(), Request::Pull(Pull { arg })).await.unwrap();
        match response {
            Some(Response::PullAck(PullAck { diff })) => {
                let diff: WeightsDiff = bincode::deserialize(&diff).unwrap();
                diff.weights
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn two_nodes_converge_over_the_wire() {
        let p1 = Peer::new("127.0.0.1", 29091);
        let p2 = Peer::new("127.0.0.1", 29092);
        let seeds = vec![p1.clone(), p2.clone()];

        let mixer_1 = spawn_node(29091, seeds.clone(), vec![vec![0.0, 0.0]]).await;
        let _mixer_2 = spawn_node(29092, seeds.clone(), vec![vec![2.0, 6.0]]).await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        // Kick node 1 over the wire.
        let response = client::oneshot(p1.socket_addr().unwrap(), Request::DoMix).await.unwrap();
        match response {
            Some(Response::MixAck(MixAck { done })) => assert!(done),
            other => panic!("unexpected response: {:?}", other),
        }
        assert_eq!(mixer_1.mix_count(), 1);

        // Both nodes now serve the merged weight vector.
        assert_eq!(pull_weights(&p1).await, vec![1.0, 3.0]);
        assert_eq!(pull_weights(&p2).await, vec![1.0, 3.0]);
    }

    #[actix_rt::test]
    async fn external_push_applies_diff_and_acks_zero() {
        let p1 = Peer::new("127.0.0.1", 29093);
        let mixer = spawn_node(29093, vec![p1.clone()], vec![vec![4.0, 4.0]]).await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        mixer.updated();
        assert_eq!(mixer.get_status()["push_mixer.count"], "1");

        let diff =
            bincode::serialize(&WeightsDiff { generation: 7, weights: vec![0.0, 2.0] }).unwrap();
        let response =
            client::oneshot(p1.socket_addr().unwrap(), Request::Push(Push { diff })).await.unwrap();
        match response {
            Some(Response::PushAck(PushAck { code })) => assert_eq!(code, 0),
            other => panic!("unexpected response: {:?}", other),
        }

        // The handler applied the diff and reset the update counter.
        assert_eq!(mixer.get_status()["push_mixer.count"], "0");
        assert_eq!(pull_weights(&p1).await, vec![2.0, 3.0]);
    }

    #[actix_rt::test]
    async fn get_pull_argument_round_trip() {
        let p1 = Peer::new("127.0.0.1", 29094);
        let _mixer = spawn_node(29094, vec![p1.clone()], vec![vec![1.0, 1.0]]).await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        let request = Request::GetPullArgument(crate::protocol::GetPullArgument { dummy: 0 });
        let response = client::oneshot(p1.socket_addr().unwrap(), request).await.unwrap();
        match response {
            Some(Response::PullArgumentAck(PullArgumentAck { arg })) => {
                let arg: crate::model::WeightsArgument = bincode::deserialize(&arg).unwrap();
                assert_eq!(arg.generation, 1);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn malformed_push_is_rejected_without_state_change() {
        let p1 = Peer::new("127.0.0.1", 29097);
        let mixer = spawn_node(29097, vec![p1.clone()], vec![vec![4.0, 4.0]]).await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        mixer.updated();
        let request = Request::Push(Push { diff: b"garbage".to_vec() });
        let response = client::oneshot(p1.socket_addr().unwrap(), request).await.unwrap();
        match response {
            Some(Response::Unknown) => (),
            other => panic!("unexpected response: {:?}", other),
        }

        // The failed push neither merged anything nor reset the counter.
        assert_eq!(mixer.get_status()["push_mixer.count"], "1");
        assert_eq!(pull_weights(&p1).await, vec![4.0, 4.0]);
    }

    #[actix_rt::test]
    async fn mix_against_unreachable_peer_leaves_state_unchanged() {
        let p1 = Peer::new("127.0.0.1", 29095);
        // The second seed has no listener behind it.
        let dead = Peer::new("127.0.0.1", 29096);
        let mixer = spawn_node(29095, vec![p1.clone(), dead], vec![vec![5.0, 5.0]]).await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        let response = client::oneshot(p1.socket_addr().unwrap(), Request::DoMix).await.unwrap();
        match response {
            Some(Response::MixAck(MixAck { done })) => assert!(!done),
            other => panic!("unexpected response: {:?}", other),
        }
        assert_eq!(mixer.mix_count(), 0);
        assert_eq!(pull_weights(&p1).await, vec![5.0, 5.0]);
    }
}
