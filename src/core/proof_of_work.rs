use crate::core::{Block, Transaction};
use crate::error::{BlockchainError, Result};
use crate::utils::zero_hash;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};

// How often the search reports progress
const PROGRESS_INTERVAL: u64 = 100_000;

/// Nonce search over a fixed block body.
///
/// Everything except the proof is decided up front; `run` tries proofs from zero
/// upward until the block hash starts with the required hex prefix.
pub struct ProofOfWork {
    height: usize,
    transactions: Vec<Transaction>,
    previous: String,
    prefix: String,
}

impl ProofOfWork {
    pub fn new_proof_of_work(
        height: usize,
        transactions: Vec<Transaction>,
        previous: &str,
        prefix: &str,
    ) -> ProofOfWork {
        ProofOfWork {
            height,
            transactions,
            previous: previous.to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// Check that a block's hash carries the prefix
    pub fn validate(block: &Block, prefix: &str) -> bool {
        block.get_hash().starts_with(prefix)
    }

    /// Search until a proof is found. Never returns early.
    pub fn run(self) -> Block {
        self.log_start();
        let mut proof: u64 = 0;
        while !self.accepts(proof) {
            proof = proof.wrapping_add(1);
        }
        self.into_block(proof)
    }

    /// Search until a proof is found or `stop` is raised.
    ///
    /// The flag is checked between iterations, so a caller on another thread can
    /// bound the search with its own timeout.
    pub fn run_until(self, stop: &AtomicBool) -> Result<Block> {
        self.log_start();
        let mut proof: u64 = 0;
        loop {
            if stop.load(Ordering::Relaxed) {
                info!("Proof-of-work stopped after {proof} attempts");
                return Err(BlockchainError::MiningInterrupted);
            }
            if self.accepts(proof) {
                return Ok(self.into_block(proof));
            }
            proof = proof.wrapping_add(1);
        }
    }

    fn log_start(&self) {
        info!(
            "Starting proof-of-work for block at height {} (prefix {:?})",
            self.height, self.prefix
        );
    }

    fn accepts(&self, proof: u64) -> bool {
        let hash = Block::compute_hash(self.height, proof, &self.previous, &self.transactions);
        if proof > 0 && proof % PROGRESS_INTERVAL == 0 {
            debug!("Tried {proof} proofs, last hash {hash}");
        }
        hash.starts_with(&self.prefix)
    }

    fn into_block(self, proof: u64) -> Block {
        let block = Block::new(self.height, proof, self.transactions, &self.previous);
        info!("Proof-of-work completed with proof {proof}: {}", block.get_hash());
        block
    }

    /// Mine a genesis block paying `reward` to `recipient`
    pub fn mine_genesis(recipient: &str, reward: u64, prefix: &str) -> Block {
        let coinbase = Transaction::new_coinbase(0, recipient, reward);
        ProofOfWork::new_proof_of_work(0, vec![coinbase], &zero_hash(), prefix).run()
    }
}

/// A difficulty prefix must be made of hex digits, otherwise no hash can match it
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(BlockchainError::Config(format!(
            "hash prefix \"{prefix}\" is invalid. it must be a lowercase hexadecimal string."
        )))
    }
}
