//! # Mixer
//!
//! Mixer is an ensemble of components for reconciling the mutable models of a
//! distributed online learning service without a central coordinator.
//!
//! ## Registry
//!
//! The registry components query an external coordination service for the set
//! of live nodes registered under a `(type, name)` pair and cache them in a
//! membership view.
//!
//! ## Mixer
//!
//! The mixer components run a background worker which wakes on update-count or
//! time thresholds and exchanges model diffs with selected peers over a
//! three-call protocol (`pull`, `get_pull_argument`, `push`).
//!
//! ## Server
//!
//! The server components accept peer connections and route the mix protocol
//! requests into the local mixer.

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate actix_derive;
extern crate colored;

pub mod channel;
pub mod client;
pub mod peer;
pub mod protocol;
pub mod server;
pub mod util;

pub mod mixer;
pub mod model;
pub mod registry;

mod integration_test;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),

    // client errors
    InvalidResponse,
    EmptyResponse,
    Timeout,

    // channel errors
    ChannelError(String),

    // actor errors
    ActixMailboxError,

    /// Error when parsing a peer description `host:port`
    PeerParseError,

    /// Coordination service failure while listing cluster nodes
    Registry(String),

    /// Malformed argument or diff payload
    Serialization(String),

    /// Failure raised by the model behind the mixable adapter
    Model(String),
}

impl std::error::Error for Error {}

impl std::convert::From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO(error)
    }
}

impl std::convert::From<actix::MailboxError> for Error {
    fn from(_error: actix::MailboxError) -> Self {
        Error::ActixMailboxError
    }
}

impl std::convert::From<Box<bincode::ErrorKind>> for Error {
    fn from(error: Box<bincode::ErrorKind>) -> Self {
        Error::Serialization(format!("{:?}", error))
    }
}

impl std::convert::From<channel::Error> for Error {
    fn from(error: channel::Error) -> Self {
        match error {
            channel::Error::IO(io_err) => Error::IO(io_err),
            channel::Error::ReadError(err) => {
                let s = format!("{:?}", err);
                Error::ChannelError(s)
            }
            channel::Error::WriteError(err) => {
                let s = format!("{:?}", err);
                Error::ChannelError(s)
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
