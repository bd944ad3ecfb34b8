//! The mix protocol core: the background worker, the per-peer exchange and
//! the bridges to the model and the network.
mod candidate;
mod communication;
mod constants;
mod mixable;
mod push_mixer;

pub use candidate::*;
pub use communication::*;
pub use constants::*;
pub use mixable::*;
pub use push_mixer::*;
