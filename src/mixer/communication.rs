//! Per-call clients for the three mix RPCs against a single peer.

use std::future::Future;
use std::{pin::Pin, sync::Arc};

use tokio::time::Duration;

use crate::client;
use crate::peer::Peer;
use crate::protocol::{GetPullArgument, Pull, PullAck, PullArgumentAck, Push, PushAck, Request, Response};
use crate::{Error, Result};

type CallFuture<Out> = Pin<Box<dyn Send + Future<Output = Out>>>;

pub type BytesOutput = CallFuture<Result<Vec<u8>>>;
pub type AckOutput = CallFuture<Result<i32>>;

/// `Communication` represents an `async` trait for the three mix calls.
///
/// Each call is independent: it opens its own connection and any transport
/// failure fails that single call only. Implementations apply the per-call
/// timeout configured at construction.
pub trait Communication: Sync + Send {
    /// `== async fn pull(..) -> Result<Vec<u8>>`: her diff for my argument.
    fn pull(&self, peer: &Peer, arg: Vec<u8>) -> BytesOutput;

    /// `== async fn get_pull_argument(..) -> Result<Vec<u8>>`: her argument.
    fn get_pull_argument(&self, peer: &Peer) -> BytesOutput;

    /// `== async fn push(..) -> Result<i32>`: apply my diff on her node.
    fn push(&self, peer: &Peer, diff: Vec<u8>) -> AckOutput;
}

/// [Communication] over the wire protocol, one fresh connection per call.
pub struct RpcCommunication {
    timeout: Duration,
}

impl RpcCommunication {
    pub fn new(timeout: Duration) -> Arc<dyn Communication> {
        Arc::new(RpcCommunication { timeout })
    }
}

impl Communication for RpcCommunication {
    fn pull(&self, peer: &Peer, arg: Vec<u8>) -> BytesOutput {
        let peer = peer.clone();
        let delta = self.timeout;
        Box::pin(async move {
            let ip = peer.socket_addr()?;
            match client::oneshot_timeout(ip, Request::Pull(Pull { arg }), delta).await? {
                Some(Response::PullAck(PullAck { diff })) => Ok(diff),
                Some(_) => Err(Error::InvalidResponse),
                None => Err(Error::EmptyResponse),
            }
        })
    }

    fn get_pull_argument(&self, peer: &Peer) -> BytesOutput {
        let peer = peer.clone();
        let delta = self.timeout;
        Box::pin(async move {
            let ip = peer.socket_addr()?;
            let request = Request::GetPullArgument(GetPullArgument { dummy: 0 });
            match client::oneshot_timeout(ip, request, delta).await? {
                Some(Response::PullArgumentAck(PullArgumentAck { arg })) => Ok(arg),
                Some(_) => Err(Error::InvalidResponse),
                None => Err(Error::EmptyResponse),
            }
        })
    }

    fn push(&self, peer: &Peer, diff: Vec<u8>) -> AckOutput {
        let peer = peer.clone();
        let delta = self.timeout;
        Box::pin(async move {
            let ip = peer.socket_addr()?;
            match client::oneshot_timeout(ip, Request::Push(Push { diff }), delta).await? {
                Some(Response::PushAck(PushAck { code })) => Ok(code),
                Some(_) => Err(Error::InvalidResponse),
                None => Err(Error::EmptyResponse),
            }
        })
    }
}
