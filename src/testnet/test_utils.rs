//! Test utilities for ledger testing

use crate::core::{Block, Blockchain, Transaction};
use crate::error::{BlockchainError, Result};
use crate::mining::{Miner, MinerConfig};
use crate::storage::Mempool;
use tempfile::TempDir;

/// Difficulty prefix used by tests that only need *a* proof, not a slow one
pub const TEST_HASH_PREFIX: &str = "0";

/// Create a temporary directory for testing
pub fn create_temp_dir() -> Result<TempDir> {
    tempfile::tempdir().map_err(|e| BlockchainError::Io(e.to_string()))
}

/// Create a closed mempool backed by temporary storage
pub fn create_test_mempool() -> Result<(Mempool, TempDir)> {
    let temp_dir = create_temp_dir()?;
    let mempool = Mempool::new(temp_dir.path().join("mempool"));
    Ok((mempool, temp_dir))
}

/// A miner with the default reward and an easy difficulty
pub fn fast_miner(address: &str) -> Miner {
    Miner::with_config(
        address,
        MinerConfig {
            hash_prefix: TEST_HASH_PREFIX.to_string(),
            ..MinerConfig::default()
        },
    )
}

/// Append a block whose only transaction is a coinbase paying `amount` to `recipient`
pub fn append_coinbase(chain: &mut Blockchain, recipient: &str, amount: u64) -> Result<()> {
    let height = chain.len();
    let block = Block::new(
        height,
        0,
        vec![Transaction::new_coinbase(height, recipient, amount)],
        chain.get_tip_hash(),
    );
    chain.add_block(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::generate_address;

    #[test]
    fn test_create_test_mempool() {
        let (mut mempool, _temp_dir) = create_test_mempool().unwrap();
        assert!(!mempool.is_open());
        assert!(mempool.open().unwrap().is_empty().unwrap());
    }

    #[test]
    fn test_append_coinbase() {
        let alice = generate_address();
        let mut chain = Blockchain::new();

        append_coinbase(&mut chain, &alice, 12).unwrap();
        append_coinbase(&mut chain, &alice, 30).unwrap();

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.balance(&alice), 42);
    }
}
