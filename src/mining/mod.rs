//! Block assembly and mining
//!
//! The miner turns pending transactions into real transactions against the
//! current chain and searches for a proof-of-work.

pub mod miner;

pub use miner::{Miner, MinerConfig};
