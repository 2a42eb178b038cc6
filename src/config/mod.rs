//! Configuration management
//!
//! This module handles the settings of a ledger process: where the mempool
//! lives, who receives mining rewards and how hard mining is.

pub mod settings;

pub use settings::Config;
