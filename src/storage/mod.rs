//! Data storage and persistence
//!
//! This module manages the sled database handle and the durable mempool of
//! pending transactions.

pub mod database;
pub mod memory_pool;

pub use database::{close_db, open_db};
pub use memory_pool::{Mempool, MempoolIter, MempoolSession, PendingTransaction};
