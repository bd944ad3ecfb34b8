use futures::prelude::*;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::io::{ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio_serde::formats::*;
use tokio_serde::Framed;
use tokio_util::codec::{FramedRead, FramedWrite, LengthDelimitedCodec};

/// Errors raised while framing, encoding or decoding channel items.
#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    ReadError(std::io::Error),
    WriteError(std::io::Error),
}

pub type Reader<I, O> =
    Framed<FramedRead<ReadHalf<TcpStream>, LengthDelimitedCodec>, O, I, Bincode<O, I>>;

pub type Writer<I, O> =
    Framed<FramedWrite<WriteHalf<TcpStream>, LengthDelimitedCodec>, O, I, Bincode<O, I>>;

pub struct Receiver<I, O> {
    reader: Reader<I, O>,
}

impl<I, O> Receiver<I, O>
where
    I: for<'de> Deserialize<'de> + Serialize,
    O: for<'de> Deserialize<'de> + Serialize,
    Reader<I, O>: TryStream<Ok = O, Error = std::io::Error> + Unpin,
{
    pub async fn recv(&mut self) -> Result<Option<O>, Error> {
        self.reader.try_next().await.map_err(Error::ReadError)
    }
}

pub struct Sender<I, O> {
    writer: Writer<I, O>,
}

impl<I, O> Sender<I, O>
where
    I: for<'de> Deserialize<'de> + Serialize,
    O: for<'de> Deserialize<'de> + Serialize,
    Writer<I, O>: Sink<I, Error = std::io::Error> + Unpin,
{
    pub async fn send(&mut self, item: I) -> Result<(), Error> {
        self.writer.send(item).await.map_err(Error::WriteError)
    }
}

/// A typed duplex channel sending `I` and receiving `O` over one socket.
pub struct Channel<I, O> {
    socket: TcpStream,
    ghost: std::marker::PhantomData<(I, O)>,
}

impl<I, O> Channel<I, O>
where
    I: for<'de> Deserialize<'de> + Serialize,
    O: for<'de> Deserialize<'de> + Serialize,
{
    pub async fn connect(address: &SocketAddr) -> Result<Channel<I, O>, Error> {
        let socket = TcpStream::connect(address).await.map_err(Error::IO)?;
        Ok(Channel { socket, ghost: Default::default() })
    }

    pub fn wrap(socket: TcpStream) -> Channel<I, O> {
        Channel { socket, ghost: Default::default() }
    }

    pub fn split(self) -> (Sender<I, O>, Receiver<I, O>) {
        let (reader, writer) = tokio::io::split(self.socket);

        let reader: FramedRead<ReadHalf<_>, LengthDelimitedCodec> =
            FramedRead::new(reader, LengthDelimitedCodec::new());
        let reader = Framed::new(reader, Bincode::default());

        let writer: FramedWrite<WriteHalf<_>, LengthDelimitedCodec> =
            FramedWrite::new(writer, LengthDelimitedCodec::new());
        let writer = Framed::new(writer, Bincode::default());

        (Sender { writer }, Receiver { reader })
    }
}
