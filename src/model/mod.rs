//! Models implementing the mixable interface.
mod average;

pub use average::*;
