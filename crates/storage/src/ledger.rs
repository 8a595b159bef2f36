//! LedgerStore trait definition

use crate::Result;

/// LedgerStore trait - byte-oriented key-value interface to the ledger
///
/// This trait allows different ledger backends (in-memory, file snapshot,
/// a host-provided world state) to be swapped without changing the business
/// logic. Every operation is synchronous.
pub trait LedgerStore {
    /// Get the value stored under `key`
    ///
    /// # Returns
    /// The stored bytes, or `None` if the key is absent
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Check whether `key` holds a non-empty value
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some_and(|value| !value.is_empty()))
    }

    /// All entries whose key starts with `prefix`, in key order
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;
}
