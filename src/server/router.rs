use crate::mixer::PushMixer;
use crate::protocol::{
    GetPullArgument, MixAck, Pull, PullAck, PullArgumentAck, Push, PushAck, Request, Response,
};

use tracing::{debug, error, info};

use actix::{Actor, Context, Handler, ResponseFuture};

use std::sync::Arc;

/// Dispatches inbound protocol requests into the local mixer.
pub struct Router {
    mixer: Arc<PushMixer>,
}

impl Router {
    pub fn new(mixer: Arc<PushMixer>) -> Self {
        Router { mixer }
    }
}

impl Actor for Router {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Context<Self>) {
        debug!("router> started");
    }
}

impl Handler<Request> for Router {
    type Result = ResponseFuture<Response>;

    fn handle(&mut self, msg: Request, _ctx: &mut Context<Self>) -> Self::Result {
        let mixer = self.mixer.clone();
        Box::pin(async move {
            match msg {
                Request::Pull(Pull { arg }) => {
                    info!("routing Pull -> PushMixer");
                    match mixer.handle_pull(arg).await {
                        Ok(diff) => Response::PullAck(PullAck { diff }),
                        Err(err) => {
                            error!("pull failed: {}", err);
                            Response::Unknown
                        }
                    }
                }
                Request::GetPullArgument(GetPullArgument { .. }) => {
                    info!("routing GetPullArgument -> PushMixer");
                    match mixer.handle_get_pull_argument().await {
                        Ok(arg) => Response::PullArgumentAck(PullArgumentAck { arg }),
                        Err(err) => {
                            error!("get_pull_argument failed: {}", err);
                            Response::Unknown
                        }
                    }
                }
                Request::Push(Push { diff }) => {
                    info!("routing Push -> PushMixer");
                    match mixer.handle_push(diff).await {
                        Ok(code) => Response::PushAck(PushAck { code }),
                        Err(err) => {
                            error!("push failed: {}", err);
                            Response::Unknown
                        }
                    }
                }
                Request::DoMix => {
                    info!("routing DoMix -> PushMixer");
                    let done = mixer.do_mix().await;
                    Response::MixAck(MixAck { done })
                }
            }
        })
    }
}
