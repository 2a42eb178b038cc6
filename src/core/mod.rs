//! Core ledger functionality
//!
//! This module contains the ledger entities (transactions, UTXOs, blocks), the
//! blockchain with its live UTXO index, coin selection and proof-of-work.

pub mod block;
pub mod blockchain;
pub mod coin_selection;
pub mod monetary;
pub mod proof_of_work;
pub mod transaction;

pub use block::Block;
pub use blockchain::{Blockchain, OutPoint};
pub use coin_selection::{select_coins, select_coins_with, DEFAULT_SELECTION_ATTEMPTS};
pub use monetary::{BLOCK_REWARD, DEFAULT_HASH_PREFIX, SATOSHIS_PER_COIN};
pub use proof_of_work::{validate_prefix, ProofOfWork};
pub use transaction::{Transaction, TransactionInput, TransactionOutput, Utxo};
