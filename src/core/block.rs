use crate::core::monetary::{BLOCK_REWARD, GENESIS_PROOF, GENESIS_REWARD_RECIPIENT};
use crate::core::Transaction;
use crate::utils::{short_hash, zero_hash, HashEncoder};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BlockFields")]
pub struct Block {
    hash: String,
    height: usize,
    proof: u64,
    transactions: Vec<Transaction>,
    previous: String,
}

// Serialized form of a block; any stored hash is ignored and recomputed
#[derive(Deserialize)]
struct BlockFields {
    height: usize,
    proof: u64,
    transactions: Vec<Transaction>,
    previous: String,
}

impl From<BlockFields> for Block {
    fn from(fields: BlockFields) -> Self {
        Block::new(
            fields.height,
            fields.proof,
            fields.transactions,
            &fields.previous,
        )
    }
}

impl Block {
    pub fn new(height: usize, proof: u64, transactions: Vec<Transaction>, previous: &str) -> Block {
        let hash = Self::compute_hash(height, proof, previous, &transactions);
        Block {
            hash,
            height,
            proof,
            transactions,
            previous: previous.to_string(),
        }
    }

    /// The fixed first block of every chain.
    ///
    /// Its proof is recorded as a constant and is never checked against the
    /// mining prefix; the genesis block is trusted by construction.
    pub fn genesis() -> Block {
        let coinbase = Transaction::new_coinbase(0, GENESIS_REWARD_RECIPIENT, BLOCK_REWARD);
        Block::new(0, GENESIS_PROOF, vec![coinbase], &zero_hash())
    }

    /// Digest over height, proof, previous and then every transaction hash in order
    pub(crate) fn compute_hash(
        height: usize,
        proof: u64,
        previous: &str,
        transactions: &[Transaction],
    ) -> String {
        let mut encoder = HashEncoder::new();
        encoder.add_int(height as u64);
        encoder.add_int(proof);
        encoder.add_str(previous);

        for transaction in transactions {
            encoder.add_str(transaction.get_hash());
        }

        encoder.digest()
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn get_height(&self) -> usize {
        self.height
    }

    pub fn get_proof(&self) -> u64 {
        self.proof
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_previous(&self) -> &str {
        self.previous.as_str()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {} @ {}", short_hash(&self.hash), self.height)
    }
}
