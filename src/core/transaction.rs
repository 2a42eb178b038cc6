// This file implements the transaction model - how value moves through the ledger
// Each transaction consumes previous outputs (by reference) and creates new ones
// A transaction's identity is the digest of its own fields, nothing else

use crate::utils::{short_hash, HashEncoder};
use serde::{Deserialize, Serialize};
use std::fmt;

// A reference to an output of an earlier transaction
// Think of it as "I want to spend output #2 from transaction ABC123"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionInput {
    transaction: String, // Hash of the transaction holding the output
    output_index: usize, // Position of the output in that transaction
}

impl TransactionInput {
    pub fn new(transaction: &str, output_index: usize) -> TransactionInput {
        TransactionInput {
            transaction: transaction.to_string(),
            output_index,
        }
    }

    pub fn get_transaction(&self) -> &str {
        self.transaction.as_str()
    }

    pub fn get_output_index(&self) -> usize {
        self.output_index
    }

    /// Key of the UTXO this input consumes
    pub fn outpoint(&self) -> (String, usize) {
        (self.transaction.clone(), self.output_index)
    }
}

// A payment to an address that can be spent later
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionOutput {
    recipient: String,
    amount: u64,
}

impl TransactionOutput {
    pub fn new(recipient: &str, amount: u64) -> TransactionOutput {
        TransactionOutput {
            recipient: recipient.to_string(),
            amount,
        }
    }

    pub fn get_recipient(&self) -> &str {
        self.recipient.as_str()
    }

    pub fn get_amount(&self) -> u64 {
        self.amount
    }

    pub fn is_paid_to(&self, address: &str) -> bool {
        self.recipient == address
    }
}

// The transaction itself - a list of spent references and a list of new outputs
// height records which block the transaction was built for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TransactionFields")]
pub struct Transaction {
    hash: String,
    height: usize,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

// Serialized form of a transaction; the hash is always derived from these fields
#[derive(Deserialize)]
struct TransactionFields {
    height: usize,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl From<TransactionFields> for Transaction {
    fn from(fields: TransactionFields) -> Self {
        Transaction::new(fields.height, fields.inputs, fields.outputs)
    }
}

impl Transaction {
    pub fn new(
        height: usize,
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Transaction {
        let hash = Self::compute_hash(height, &inputs, &outputs);
        Transaction {
            hash,
            height,
            inputs,
            outputs,
        }
    }

    // When I mint new value: no inputs, a single output paying the reward
    pub fn new_coinbase(height: usize, recipient: &str, reward: u64) -> Transaction {
        Self::new(height, vec![], vec![TransactionOutput::new(recipient, reward)])
    }

    fn compute_hash(
        height: usize,
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
    ) -> String {
        let mut encoder = HashEncoder::new();
        encoder.add_int(height as u64);

        for input in inputs {
            encoder.add_str(&input.transaction);
            encoder.add_int(input.output_index as u64);
        }

        for output in outputs {
            encoder.add_str(&output.recipient);
            encoder.add_int(output.amount);
        }

        encoder.digest()
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn get_height(&self) -> usize {
        self.height
    }

    pub fn get_inputs(&self) -> &[TransactionInput] {
        self.inputs.as_slice()
    }

    pub fn get_outputs(&self) -> &[TransactionOutput] {
        self.outputs.as_slice()
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Sum of all output amounts, or `None` if it does not fit in a u64
    pub fn total_output(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |total, output| total.checked_add(output.amount))
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transaction {} @ height {}", short_hash(&self.hash), self.height)
    }
}

/// An unspent output: where it came from plus what it is worth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Utxo {
    transaction: String,
    output_index: usize,
    output: TransactionOutput,
}

impl Utxo {
    /// Build the UTXO for output `output_index` of `transaction`.
    /// Returns `None` when the transaction has no such output.
    pub fn from_transaction(transaction: &Transaction, output_index: usize) -> Option<Utxo> {
        transaction.outputs.get(output_index).map(|output| Utxo {
            transaction: transaction.hash.clone(),
            output_index,
            output: output.clone(),
        })
    }

    pub fn get_transaction(&self) -> &str {
        self.transaction.as_str()
    }

    pub fn get_output_index(&self) -> usize {
        self.output_index
    }

    pub fn get_output(&self) -> &TransactionOutput {
        &self.output
    }

    pub fn get_amount(&self) -> u64 {
        self.output.amount
    }

    pub fn key(&self) -> (String, usize) {
        (self.transaction.clone(), self.output_index)
    }

    /// Input that spends this output
    pub fn to_input(&self) -> TransactionInput {
        TransactionInput::new(&self.transaction, self.output_index)
    }
}

impl fmt::Display for Utxo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UTXO for output #{} of transaction {} ({})",
            self.output_index,
            short_hash(&self.transaction),
            self.output.amount
        )
    }
}
