//! Utility functions and helpers
//!
//! This module contains content hashing, address generation
//! and the bincode helpers used by the mempool.

pub mod address;
pub mod encoding;
pub mod serialization;

pub use address::generate_address;
pub use encoding::{short_hash, zero_hash, HashEncoder, HEX_DIGEST_LENGTH};
pub use serialization::{deserialize, serialize};
