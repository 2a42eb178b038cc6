// The mempool is where requested payments wait until a miner turns them into real
// transactions. It lives in a sled database so pending payments survive restarts,
// and it must be opened before use - a closed pool refuses every operation.

use crate::error::{BlockchainError, Result};
use crate::storage::database::{close_db, open_db};
use crate::utils::{deserialize, serialize, HashEncoder};
use log::{error, info};
use sled::{Db, IVec};
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A payment request that does not reference any coins yet.
///
/// The record layout on disk is (sender, recipient, amount, uid).
#[derive(Debug, Clone, PartialEq, Eq, Hash, bincode::Encode, bincode::Decode)]
pub struct PendingTransaction {
    sender: String,
    recipient: String,
    amount: u64,
    uid: String,
}

impl PendingTransaction {
    pub fn new(sender: &str, recipient: &str, amount: u64) -> PendingTransaction {
        PendingTransaction {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
            uid: Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_recipient(&self) -> &str {
        self.recipient.as_str()
    }

    pub fn get_amount(&self) -> u64 {
        self.amount
    }

    pub fn get_uid(&self) -> &str {
        self.uid.as_str()
    }

    /// Digest over uid, sender, recipient and amount; also the storage key
    pub fn hash(&self) -> String {
        let mut encoder = HashEncoder::new();
        encoder
            .add_str(&self.uid)
            .add_str(&self.sender)
            .add_str(&self.recipient)
            .add_int(self.amount);
        encoder.digest()
    }
}

impl fmt::Display for PendingTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} +{}", self.sender, self.recipient, self.amount)
    }
}

/// ( K -> pending transaction hash, V -> bincode encoded PendingTransaction )
pub struct Mempool {
    path: PathBuf,
    db: Option<Db>,
}

impl Mempool {
    /// Create a closed mempool backed by the database directory at `path`
    pub fn new(path: impl AsRef<Path>) -> Mempool {
        Mempool {
            path: path.as_ref().to_path_buf(),
            db: None,
        }
    }

    /// Open the underlying store for the lifetime of the returned session.
    ///
    /// Dropping the session closes the store again, whether the scope ends
    /// normally or through an early `?` return.
    pub fn open(&mut self) -> Result<MempoolSession<'_>> {
        if self.db.is_none() {
            self.db = Some(open_db(&self.path)?);
            info!("Opened mempool at {}", self.path.display());
        }
        Ok(MempoolSession { mempool: self })
    }

    /// Flush and release the store. Closing a closed mempool does nothing.
    pub fn close(&mut self) -> Result<()> {
        if let Some(db) = self.db.take() {
            close_db(db)?;
            info!("Closed mempool at {}", self.path.display());
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    pub fn get_path(&self) -> &Path {
        self.path.as_path()
    }

    fn db(&self) -> Result<&Db> {
        self.db.as_ref().ok_or(BlockchainError::MempoolClosed)
    }

    /// Record a new payment request with a fresh uid and return it
    pub fn create_transaction(
        &self,
        sender: &str,
        recipient: &str,
        amount: u64,
    ) -> Result<PendingTransaction> {
        let db = self.db()?;
        let transaction = PendingTransaction::new(sender, recipient, amount);
        let data = serialize(&transaction)?;
        db.insert(transaction.hash().as_bytes(), data)
            .map_err(|e| BlockchainError::Database(format!("Failed to store transaction: {e}")))?;
        info!("Queued pending transaction {transaction}");
        Ok(transaction)
    }

    /// Remove a pending transaction; removing one that is not there is fine
    pub fn delete_transaction(&self, transaction: &PendingTransaction) -> Result<()> {
        let db = self.db()?;
        db.remove(transaction.hash().as_bytes())
            .map_err(|e| BlockchainError::Database(format!("Failed to remove transaction: {e}")))?;
        Ok(())
    }

    /// Iterate over a snapshot of every pending transaction.
    ///
    /// The raw records are captured when this is called; creates and deletes made
    /// afterwards do not show up in (or disturb) the returned iterator.
    pub fn iter(&self) -> Result<MempoolIter> {
        let db = self.db()?;
        let records = db
            .iter()
            .values()
            .collect::<std::result::Result<Vec<IVec>, sled::Error>>()
            .map_err(|e| BlockchainError::Database(format!("Failed to scan mempool: {e}")))?;
        Ok(MempoolIter {
            records: records.into_iter(),
        })
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.db()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.db()?.is_empty())
    }
}

/// An open mempool. Closes the store when dropped.
pub struct MempoolSession<'a> {
    mempool: &'a mut Mempool,
}

impl Deref for MempoolSession<'_> {
    type Target = Mempool;

    fn deref(&self) -> &Mempool {
        &*self.mempool
    }
}

impl Drop for MempoolSession<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.mempool.close() {
            error!("Failed to close mempool: {e}");
        }
    }
}

/// Point-in-time view over the mempool, decoded lazily
pub struct MempoolIter {
    records: std::vec::IntoIter<IVec>,
}

impl Iterator for MempoolIter {
    type Item = Result<PendingTransaction>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records
            .next()
            .map(|data| deserialize::<PendingTransaction>(data.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}
