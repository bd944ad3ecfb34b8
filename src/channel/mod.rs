//! Typed channels over length-prefixed bincode frames.
mod asymmetric;

pub use asymmetric::*;
