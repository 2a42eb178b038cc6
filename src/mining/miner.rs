use crate::core::monetary::{BLOCK_REWARD, DEFAULT_HASH_PREFIX};
use crate::core::{
    Block, Blockchain, OutPoint, ProofOfWork, Transaction, TransactionOutput, Utxo,
};
use crate::error::{BlockchainError, Result};
use crate::storage::{Mempool, PendingTransaction};
use log::{debug, info};
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;

/// Reward and difficulty used when mining
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerConfig {
    pub reward: u64,
    pub hash_prefix: String,
}

impl Default for MinerConfig {
    fn default() -> Self {
        MinerConfig {
            reward: BLOCK_REWARD,
            hash_prefix: DEFAULT_HASH_PREFIX.to_string(),
        }
    }
}

pub struct Miner {
    address: String, // receives the coinbase reward
    config: MinerConfig,
}

impl Miner {
    pub fn new(address: &str) -> Miner {
        Self::with_config(address, MinerConfig::default())
    }

    pub fn with_config(address: &str, config: MinerConfig) -> Miner {
        Miner {
            address: address.to_string(),
            config,
        }
    }

    pub fn get_address(&self) -> &str {
        self.address.as_str()
    }

    pub fn get_config(&self) -> &MinerConfig {
        &self.config
    }

    /// Build and mine the next block from everything currently in the mempool.
    ///
    /// Pending transactions whose sender cannot cover the amount are left in the
    /// mempool for a later round; the ones that made it into the block are deleted.
    /// The block is returned, not appended: call `Blockchain::add_block` with it.
    pub fn mine(&self, mempool: &Mempool, blockchain: &Blockchain) -> Result<Block> {
        self.mine_until(mempool, blockchain, &AtomicBool::new(false))
    }

    /// Same as [`Miner::mine`], but gives up with `MiningInterrupted` once `stop`
    /// is raised. An interrupted round leaves the mempool untouched.
    pub fn mine_until(
        &self,
        mempool: &Mempool,
        blockchain: &Blockchain,
        stop: &AtomicBool,
    ) -> Result<Block> {
        let pending_transactions = mempool.iter()?.collect::<Result<Vec<_>>>()?;
        let height = blockchain.len();

        let (transactions, included) =
            self.build_transaction_set(&pending_transactions, blockchain, height)?;

        let block = ProofOfWork::new_proof_of_work(
            height,
            transactions,
            blockchain.get_tip_hash(),
            &self.config.hash_prefix,
        )
        .run_until(stop)?;

        for transaction in &included {
            mempool.delete_transaction(transaction)?;
        }

        info!(
            "Mined {block}: {} of {} pending transactions included",
            included.len(),
            pending_transactions.len()
        );
        Ok(block)
    }

    fn build_transaction_set(
        &self,
        pending_transactions: &[PendingTransaction],
        blockchain: &Blockchain,
        height: usize,
    ) -> Result<(Vec<Transaction>, Vec<PendingTransaction>)> {
        // coinbase comes first
        let mut transactions = vec![Transaction::new_coinbase(
            height,
            &self.address,
            self.config.reward,
        )];
        let mut included = vec![];
        // coins already spent by an earlier transaction in this block
        let mut claimed: HashSet<OutPoint> = HashSet::new();

        for pending in pending_transactions {
            let utxos = match blockchain.find_utxos_excluding(
                pending.get_sender(),
                pending.get_amount(),
                &claimed,
            ) {
                Ok(utxos) => utxos,
                Err(BlockchainError::InsufficientFunds { .. }) => {
                    debug!("Skipping {pending}: sender has insufficient funds");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let Some(transaction) = Self::build_payment(pending, &utxos, height) else {
                debug!("Skipping {pending}: change does not fit in a single output");
                continue;
            };
            claimed.extend(utxos.iter().map(Utxo::key));
            transactions.push(transaction);
            included.push(pending.clone());
        }

        Ok((transactions, included))
    }

    // Pay the recipient from the selected coins and return any change to the sender.
    // The selected total may exceed u64; only the change has to fit in an output.
    fn build_payment(
        pending: &PendingTransaction,
        utxos: &[Utxo],
        height: usize,
    ) -> Option<Transaction> {
        let selected: u128 = utxos.iter().map(|utxo| u128::from(utxo.get_amount())).sum();
        let change = u64::try_from(selected.checked_sub(u128::from(pending.get_amount()))?).ok()?;

        let mut outputs = vec![TransactionOutput::new(
            pending.get_recipient(),
            pending.get_amount(),
        )];
        if change > 0 {
            outputs.push(TransactionOutput::new(pending.get_sender(), change));
        }

        Some(Transaction::new(
            height,
            utxos.iter().map(Utxo::to_input).collect(),
            outputs,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testnet::{append_coinbase, create_test_mempool, fast_miner};
    use crate::utils::generate_address;

    #[test]
    fn test_mine_empty_mempool() {
        let (mut pool, _temp_dir) = create_test_mempool().unwrap();
        let session = pool.open().unwrap();
        let mut chain = Blockchain::new();
        let miner = fast_miner(&generate_address());

        let block = miner.mine(&session, &chain).unwrap();

        assert_eq!(block.get_height(), 1);
        assert_eq!(block.get_previous(), chain.get_tip_hash());
        assert!(ProofOfWork::validate(&block, &miner.get_config().hash_prefix));
        assert_eq!(block.get_transactions().len(), 1);
        assert!(block.get_transactions()[0].is_coinbase());

        // mining does not touch the chain
        assert_eq!(chain.len(), 1);
        chain.add_block(block).unwrap();
        assert_eq!(chain.balance(miner.get_address()), BLOCK_REWARD);
    }

    #[test]
    fn test_mine_with_default_difficulty() {
        let (mut pool, _temp_dir) = create_test_mempool().unwrap();
        let session = pool.open().unwrap();
        let chain = Blockchain::new();
        let miner = Miner::new(&generate_address());

        let block = miner.mine(&session, &chain).unwrap();
        assert!(block.get_hash().starts_with(DEFAULT_HASH_PREFIX));
    }

    #[test]
    fn test_mine_pending_payment_with_change() {
        let (mut pool, _temp_dir) = create_test_mempool().unwrap();
        let session = pool.open().unwrap();
        let mut chain = Blockchain::new();
        let wallet = generate_address();
        let friend = generate_address();
        let miner = fast_miner(&wallet);

        let block = miner.mine(&session, &chain).unwrap();
        chain.add_block(block).unwrap();

        session
            .create_transaction(&wallet, &friend, 20_00000000)
            .unwrap();
        let block = miner.mine(&session, &chain).unwrap();

        let payment = &block.get_transactions()[1];
        assert_eq!(block.get_transactions().len(), 2);
        assert_eq!(payment.get_inputs().len(), 1);
        assert_eq!(
            payment.get_outputs(),
            &[
                TransactionOutput::new(&friend, 20_00000000),
                TransactionOutput::new(&wallet, 30_00000000),
            ]
        );
        assert!(session.is_empty().unwrap());

        chain.add_block(block).unwrap();
        assert_eq!(chain.balance(&friend), 20_00000000);
        assert_eq!(chain.balance(&wallet), 30_00000000 + BLOCK_REWARD);
    }

    #[test]
    fn test_exact_payment_has_no_change_output() {
        let (mut pool, _temp_dir) = create_test_mempool().unwrap();
        let session = pool.open().unwrap();
        let mut chain = Blockchain::new();
        let wallet = generate_address();
        let friend = generate_address();
        let miner = fast_miner(&wallet);

        chain.add_block(miner.mine(&session, &chain).unwrap()).unwrap();
        session
            .create_transaction(&wallet, &friend, BLOCK_REWARD)
            .unwrap();

        let block = miner.mine(&session, &chain).unwrap();
        assert_eq!(
            block.get_transactions()[1].get_outputs(),
            &[TransactionOutput::new(&friend, BLOCK_REWARD)]
        );
    }

    #[test]
    fn test_unfunded_sender_stays_in_mempool() {
        let (mut pool, _temp_dir) = create_test_mempool().unwrap();
        let session = pool.open().unwrap();
        let chain = Blockchain::new();
        let miner = fast_miner(&generate_address());

        let broke = session
            .create_transaction(&generate_address(), &generate_address(), 10)
            .unwrap();
        let block = miner.mine(&session, &chain).unwrap();

        assert_eq!(block.get_transactions().len(), 1);
        let remaining: Vec<PendingTransaction> =
            session.iter().unwrap().map(|tx| tx.unwrap()).collect();
        assert_eq!(remaining, vec![broke]);
    }

    #[test]
    fn test_same_coin_is_not_claimed_twice() {
        let (mut pool, _temp_dir) = create_test_mempool().unwrap();
        let session = pool.open().unwrap();
        let mut chain = Blockchain::new();
        let wallet = generate_address();
        let miner = fast_miner(&wallet);

        chain.add_block(miner.mine(&session, &chain).unwrap()).unwrap();

        // wallet holds a single 50 coin output, enough for only one of these
        session
            .create_transaction(&wallet, &generate_address(), 30_00000000)
            .unwrap();
        session
            .create_transaction(&wallet, &generate_address(), 30_00000000)
            .unwrap();

        let block = miner.mine(&session, &chain).unwrap();
        assert_eq!(block.get_transactions().len(), 2);
        assert_eq!(session.len().unwrap(), 1);

        chain.add_block(block).unwrap();
        assert_eq!(chain.balance(&wallet), 20_00000000 + BLOCK_REWARD);
    }

    #[test]
    fn test_interrupted_mining_keeps_mempool() {
        let (mut pool, _temp_dir) = create_test_mempool().unwrap();
        let session = pool.open().unwrap();
        let mut chain = Blockchain::new();
        let wallet = generate_address();
        let miner = fast_miner(&wallet);
        chain.add_block(miner.mine(&session, &chain).unwrap()).unwrap();

        session
            .create_transaction(&wallet, &generate_address(), 1)
            .unwrap();

        let stop = AtomicBool::new(true);
        assert_eq!(
            miner.mine_until(&session, &chain, &stop).unwrap_err(),
            BlockchainError::MiningInterrupted
        );
        assert_eq!(session.len().unwrap(), 1);
    }

    #[test]
    fn test_mining_on_closed_mempool() {
        let (pool, _temp_dir) = create_test_mempool().unwrap();
        let chain = Blockchain::new();
        let miner = fast_miner(&generate_address());

        assert_eq!(
            miner.mine(&pool, &chain).unwrap_err(),
            BlockchainError::MempoolClosed
        );
    }

    #[test]
    fn test_payment_from_coins_summing_past_u64() {
        let (mut pool, _temp_dir) = create_test_mempool().unwrap();
        let session = pool.open().unwrap();
        let mut chain = Blockchain::new();
        let alice = generate_address();
        let bob = generate_address();
        let miner = fast_miner(&generate_address());

        append_coinbase(&mut chain, &alice, u64::MAX / 2 + 1).unwrap();
        append_coinbase(&mut chain, &alice, u64::MAX / 2 + 1).unwrap();
        session.create_transaction(&alice, &bob, u64::MAX).unwrap();

        let block = miner.mine(&session, &chain).unwrap();
        assert_eq!(block.get_transactions().len(), 2);
        assert_eq!(
            block.get_transactions()[1].get_outputs(),
            &[
                TransactionOutput::new(&bob, u64::MAX),
                TransactionOutput::new(&alice, 1),
            ]
        );
        assert!(session.is_empty().unwrap());

        chain.add_block(block).unwrap();
        assert_eq!(chain.balance(&bob), u64::MAX);
        assert_eq!(chain.balance(&alice), 1);
    }
}
