use crate::channel::Channel;
use crate::protocol::{Request, Response};
use crate::{Error, Result};

use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

use std::net::SocketAddr;

/// Send a request to a node and wait for its response over a fresh connection.
/// * `ip` - address of the node
/// * `request` - request to send
///
/// Every call opens its own connection; there is no pooling. A `None` response
/// means the peer closed the stream without answering.
pub async fn oneshot(ip: SocketAddr, request: Request) -> Result<Option<Response>> {
    let socket = TcpStream::connect(&ip).await.map_err(Error::IO)?;
    let channel: Channel<Request, Response> = Channel::wrap(socket);
    let (mut sender, mut receiver) = channel.split();
    let () = sender.send(request).await?;
    let response = receiver.recv().await?;
    Ok(response)
}

/// [oneshot] bounded by `delta`. Elapsing the bound fails the call with
/// [Error::Timeout]; the connection is dropped.
pub async fn oneshot_timeout(
    ip: SocketAddr,
    request: Request,
    delta: Duration,
) -> Result<Option<Response>> {
    match timeout(delta, oneshot(ip, request)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout),
    }
}
