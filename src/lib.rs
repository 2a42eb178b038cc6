//! # Dome Chain - a single-node educational ledger
//!
//! A linear chain of blocks extended by one trusted local miner. There is no
//! networking, no signatures and no fork choice: just the moving parts of a
//! UTXO ledger.
//!
//! ## What's Here
//! - **Blockchain**: validates and appends blocks, keeps the live UTXO index
//! - **Coin Selection**: randomized branch and bound with a random-draw fallback
//! - **Mempool**: durable queue of pending payments on sled
//! - **Miner**: turns pending payments into a block and searches a proof-of-work
//!
//! ## How the Code Is Organized
//! - `core/`: transactions, blocks, blockchain, coin selection, proof-of-work
//! - `storage/`: the sled handle and the mempool
//! - `mining/`: block assembly
//! - `config/`: settings from defaults, TOML and environment
//! - `utils/`: content hashing, address generation, bincode helpers
//! - `cli/`: command-line interface for the demo binary
//!
//! Mining and appending are separate steps: `Miner::mine` hands back a block and
//! the caller decides whether to `Blockchain::add_block` it.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod mining;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::Config;
pub use core::{
    select_coins, validate_prefix, Block, Blockchain, ProofOfWork, Transaction,
    TransactionInput, TransactionOutput, Utxo,
};
pub use error::{BlockchainError, Result};
pub use mining::{Miner, MinerConfig};
pub use storage::{Mempool, MempoolSession, PendingTransaction};
pub use utils::{generate_address, zero_hash, HashEncoder};
