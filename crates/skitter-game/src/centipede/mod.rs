//! Centipede actors
//!
//! A steerable head trailed by a growable chain of body segments and a tail.

mod chain;
mod config;

pub use chain::SegmentChain;
pub use config::CentipedeConfig;
