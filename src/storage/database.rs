use crate::error::{BlockchainError, Result};
use log::debug;
use sled::Db;
use std::path::Path;

/// Open (creating if missing) the sled database at `path`.
///
/// The handle is released when the returned `Db` and all its clones are dropped,
/// so callers tie its lifetime to a scope.
pub fn open_db(path: &Path) -> Result<Db> {
    let db = sled::open(path).map_err(|e| {
        BlockchainError::Database(format!(
            "Failed to open database at {}: {e}",
            path.display()
        ))
    })?;
    debug!("Opened database at {}", path.display());
    Ok(db)
}

/// Flush pending writes and release the handle
pub fn close_db(db: Db) -> Result<()> {
    db.flush()
        .map_err(|e| BlockchainError::Database(format!("Failed to flush database: {e}")))?;
    drop(db);
    Ok(())
}
