//! Buffered write overlay
//!
//! A [`Transaction`] stages every put and delete in memory. Reads see the
//! staged writes first, then the base ledger. Nothing reaches the base until
//! [`Transaction::commit`]; dropping the transaction discards the writes.

use std::collections::BTreeMap;

use tracing::debug;

use crate::ledger::LedgerStore;
use crate::Result;

/// All-or-nothing view over a base ledger
pub struct Transaction<'a> {
    base: &'a mut dyn LedgerStore,
    /// `None` marks a staged delete
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl<'a> Transaction<'a> {
    /// Begin a transaction over `base`
    pub fn begin(base: &'a mut dyn LedgerStore) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Apply every staged write to the base ledger
    pub fn commit(self) -> Result<()> {
        let count = self.writes.len();
        for (key, value) in self.writes {
            match value {
                Some(bytes) => self.base.put(&key, bytes)?,
                None => self.base.delete(&key)?,
            }
        }
        debug!(writes = count, "Transaction committed");
        Ok(())
    }
}

impl LedgerStore for Transaction<'_> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.writes.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.base.get(key),
        }
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.writes.insert(key.to_string(), None);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let mut merged: BTreeMap<String, Vec<u8>> =
            self.base.scan_prefix(prefix)?.into_iter().collect();

        for (key, staged) in self
            .writes
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
        {
            match staged {
                Some(bytes) => {
                    merged.insert(key.clone(), bytes.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedger;

    #[test]
    fn test_reads_see_staged_writes() {
        let mut base = InMemoryLedger::new();
        base.put("account:a", b"old".to_vec()).unwrap();

        let mut tx = Transaction::begin(&mut base);
        tx.put("account:a", b"new".to_vec()).unwrap();
        tx.put("account:b", b"b".to_vec()).unwrap();

        assert_eq!(tx.get("account:a").unwrap(), Some(b"new".to_vec()));
        assert_eq!(tx.get("account:b").unwrap(), Some(b"b".to_vec()));
    }

    #[test]
    fn test_drop_discards_writes() {
        let mut base = InMemoryLedger::new();
        base.put("account:a", b"old".to_vec()).unwrap();

        {
            let mut tx = Transaction::begin(&mut base);
            tx.put("account:a", b"new".to_vec()).unwrap();
            tx.delete("account:a").unwrap();
        }

        assert_eq!(base.get("account:a").unwrap(), Some(b"old".to_vec()));
    }

    #[test]
    fn test_commit_applies_puts_and_deletes() {
        let mut base = InMemoryLedger::new();
        base.put("security:OLD", b"x".to_vec()).unwrap();

        let mut tx = Transaction::begin(&mut base);
        tx.delete("security:OLD").unwrap();
        tx.put("security:NEW", b"y".to_vec()).unwrap();
        tx.commit().unwrap();

        assert!(!base.exists("security:OLD").unwrap());
        assert!(base.exists("security:NEW").unwrap());
    }

    #[test]
    fn test_scan_merges_staged_writes() {
        let mut base = InMemoryLedger::new();
        base.put("orderIndex:1", b"a".to_vec()).unwrap();
        base.put("orderIndex:2", b"b".to_vec()).unwrap();

        let mut tx = Transaction::begin(&mut base);
        tx.delete("orderIndex:1").unwrap();
        tx.put("orderIndex:2", b"B".to_vec()).unwrap();
        tx.put("orderIndex:3", b"c".to_vec()).unwrap();
        tx.put("order:3", b"ignored".to_vec()).unwrap();

        let scanned = tx.scan_prefix("orderIndex:").unwrap();
        assert_eq!(
            scanned,
            vec![
                ("orderIndex:2".to_string(), b"B".to_vec()),
                ("orderIndex:3".to_string(), b"c".to_vec()),
            ]
        );
    }
}
