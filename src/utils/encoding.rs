// Content hashing for every entity in the ledger
// Transactions, blocks and pending transactions all get their identity by feeding
// their fields, in a fixed order, through a HashEncoder

use data_encoding::HEXLOWER;
use ring::digest::{Context, SHA512};

/// Number of bits produced by the digest
pub const DIGEST_BITS: usize = 512;

/// Length of a hex encoded digest
pub const HEX_DIGEST_LENGTH: usize = DIGEST_BITS / 4;

/// Incremental digest over an ordered sequence of typed fields.
///
/// Integers are written as 8 big-endian bytes and strings as their UTF-8 bytes,
/// so the same fields in the same order always produce the same digest.
pub struct HashEncoder {
    context: Context,
}

impl Default for HashEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HashEncoder {
    pub fn new() -> HashEncoder {
        HashEncoder {
            context: Context::new(&SHA512),
        }
    }

    pub fn add_int(&mut self, integer: u64) -> &mut Self {
        self.context.update(&integer.to_be_bytes());
        self
    }

    pub fn add_str(&mut self, string: &str) -> &mut Self {
        self.context.update(string.as_bytes());
        self
    }

    /// Consume the encoder and return the lowercase hex digest
    pub fn digest(self) -> String {
        HEXLOWER.encode(self.context.finish().as_ref())
    }
}

/// The all-zero digest, used as the parent of the genesis block
pub fn zero_hash() -> String {
    "0".repeat(HEX_DIGEST_LENGTH)
}

/// First eight characters of a digest for display, or the whole string if shorter
pub fn short_hash(hash: &str) -> &str {
    hash.get(..8).unwrap_or(hash)
}
