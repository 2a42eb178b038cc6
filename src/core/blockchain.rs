// This is the core ledger - an append-only chain of blocks plus the live UTXO index
// The UTXO map is maintained incrementally by add_block and never rebuilt from scratch
// Every Blockchain is an ordinary owned value, so tests can run many independent chains

use crate::core::coin_selection::{select_coins_with, DEFAULT_SELECTION_ATTEMPTS};
use crate::core::{Block, Transaction, Utxo};
use crate::error::{BlockchainError, Result};
use log::{debug, info};
use std::collections::{HashMap, HashSet};

/// Key of a live output: (transaction hash, output index)
pub type OutPoint = (String, usize);

pub struct Blockchain {
    blocks: Vec<Block>,              // index 0 is always genesis
    utxos: HashMap<OutPoint, Utxo>,  // every output not yet spent by an appended block
    selection_attempts: usize,       // budget handed to coin selection
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    // A new chain holds only the genesis block and the genesis UTXO
    pub fn new() -> Blockchain {
        Self::with_selection_attempts(DEFAULT_SELECTION_ATTEMPTS)
    }

    pub fn with_selection_attempts(selection_attempts: usize) -> Blockchain {
        let genesis = Block::genesis();
        let mut utxos = HashMap::new();
        Self::insert_outputs(&mut utxos, &genesis);

        Blockchain {
            blocks: vec![genesis],
            utxos,
            selection_attempts,
        }
    }

    pub fn head(&self) -> &Block {
        // blocks starts with genesis and only ever grows
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.head().get_height() + 1
    }

    /// Always false: a chain holds at least its genesis block
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get_tip_hash(&self) -> &str {
        self.head().get_hash()
    }

    pub fn get_best_height(&self) -> usize {
        self.head().get_height()
    }

    pub fn get_blocks(&self) -> &[Block] {
        self.blocks.as_slice()
    }

    pub fn get_utxo(&self, transaction: &str, output_index: usize) -> Option<&Utxo> {
        self.utxos.get(&(transaction.to_string(), output_index))
    }

    /// Append a block to the head of the chain.
    ///
    /// The block must point at the current head, carry the next height and only
    /// spend live UTXOs. Nothing changes unless every check passes.
    pub fn add_block(&mut self, block: Block) -> Result<()> {
        self.validate_block_params(&block)?;
        self.validate_block_transactions(&block)?;
        self.update_utxos(&block);

        info!(
            "Appended {block} with {} transactions",
            block.get_transactions().len()
        );
        self.blocks.push(block);
        Ok(())
    }

    /// Lazily walk the live UTXO set. Call again to start over.
    pub fn iter_utxos(&self) -> impl Iterator<Item = &Utxo> + '_ {
        self.utxos.values()
    }

    /// Find UTXOs owned by `address` worth at least `amount` in total.
    pub fn find_utxos(&self, address: &str, amount: u64) -> Result<Vec<Utxo>> {
        self.find_utxos_excluding(address, amount, &HashSet::new())
    }

    /// Same as [`Blockchain::find_utxos`] but never picks an outpoint in `excluded`.
    pub fn find_utxos_excluding(
        &self,
        address: &str,
        amount: u64,
        excluded: &HashSet<OutPoint>,
    ) -> Result<Vec<Utxo>> {
        let available: Vec<Utxo> = self
            .utxos
            .iter()
            .filter(|(key, utxo)| {
                utxo.get_output().is_paid_to(address) && !excluded.contains(*key)
            })
            .map(|(_, utxo)| utxo.clone())
            .collect();

        let selected = select_coins_with(
            amount,
            &available,
            self.selection_attempts,
            &mut rand::thread_rng(),
        );

        if selected.is_empty() {
            let balance = available
                .iter()
                .fold(0u64, |total, utxo| total.saturating_add(utxo.get_amount()));
            debug!("{address} has insufficient funds: required {amount}, available {balance}");
            return Err(BlockchainError::InsufficientFunds {
                required: amount,
                available: balance,
            });
        }

        Ok(selected)
    }

    /// Sum of live UTXOs paid to `address`, saturating at `u64::MAX`
    pub fn balance(&self, address: &str) -> u64 {
        self.iter_utxos()
            .filter(|utxo| utxo.get_output().is_paid_to(address))
            .fold(0u64, |total, utxo| total.saturating_add(utxo.get_amount()))
    }

    /// Total of live UTXOs per recipient address, each saturating at `u64::MAX`
    pub fn balances(&self) -> HashMap<String, u64> {
        let mut balances: HashMap<String, u64> = HashMap::new();
        for utxo in self.iter_utxos() {
            let balance = balances
                .entry(utxo.get_output().get_recipient().to_string())
                .or_default();
            *balance = balance.saturating_add(utxo.get_amount());
        }
        balances
    }

    fn validate_block_params(&self, block: &Block) -> Result<()> {
        if block.get_previous() != self.head().get_hash() {
            return Err(BlockchainError::ChainMismatch(format!(
                "{block} must have {} as its parent.",
                self.head()
            )));
        }

        if block.get_height() != self.len() {
            return Err(BlockchainError::ChainMismatch(format!(
                "{block} must have height {}",
                self.len()
            )));
        }

        Ok(())
    }

    // Every input must name a live UTXO, and no UTXO may be spent twice inside the block
    fn validate_block_transactions(&self, block: &Block) -> Result<()> {
        let mut spent: HashSet<OutPoint> = HashSet::new();
        for transaction in block.get_transactions() {
            self.validate_transaction(transaction, &mut spent)?;
        }
        Ok(())
    }

    fn validate_transaction(
        &self,
        transaction: &Transaction,
        spent: &mut HashSet<OutPoint>,
    ) -> Result<()> {
        for input in transaction.get_inputs() {
            let key = input.outpoint();
            if !self.utxos.contains_key(&key) || !spent.insert(key) {
                return Err(BlockchainError::TransactionInvalid(format!(
                    "{transaction} output #{} is already spent.",
                    input.get_output_index()
                )));
            }
        }
        Ok(())
    }

    fn update_utxos(&mut self, block: &Block) {
        for transaction in block.get_transactions() {
            for input in transaction.get_inputs() {
                self.utxos.remove(&input.outpoint());
            }
        }
        Self::insert_outputs(&mut self.utxos, block);
    }

    fn insert_outputs(utxos: &mut HashMap<OutPoint, Utxo>, block: &Block) {
        for transaction in block.get_transactions() {
            for output_index in 0..transaction.get_outputs().len() {
                if let Some(utxo) = Utxo::from_transaction(transaction, output_index) {
                    utxos.insert(utxo.key(), utxo);
                }
            }
        }
    }
}
