//! Typed JSON documents on top of the byte-oriented ledger

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::ledger::LedgerStore;
use crate::Result;

/// JSON helpers available on every [`LedgerStore`]
pub trait LedgerExt: LedgerStore {
    /// Read and decode the document stored under `key`
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(bytes) if !bytes.is_empty() => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StorageError::Serialization {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
            _ => Ok(None),
        }
    }

    /// Encode `value` and store it under `key`
    fn put_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| StorageError::Serialization {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.put(key, bytes)
    }

    /// Decode every document under `prefix`, in key order
    fn scan_json<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<(String, T)>> {
        self.scan_prefix(prefix)?
            .into_iter()
            .map(|(key, bytes)| {
                serde_json::from_slice(&bytes)
                    .map(|value| (key.clone(), value))
                    .map_err(|e| StorageError::Serialization {
                        key,
                        message: e.to_string(),
                    })
            })
            .collect()
    }
}

impl<L: LedgerStore + ?Sized> LedgerExt for L {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedger;
    use assert_matches::assert_matches;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        n: u64,
    }

    #[test]
    fn test_json_documents() {
        let mut ledger = InMemoryLedger::new();
        ledger.put_json("doc:1", &Doc { n: 1 }).unwrap();
        ledger.put_json("doc:2", &Doc { n: 2 }).unwrap();

        assert_eq!(ledger.get_json::<Doc>("doc:1").unwrap(), Some(Doc { n: 1 }));
        assert_eq!(ledger.get_json::<Doc>("doc:9").unwrap(), None);
        assert_eq!(ledger.scan_json::<Doc>("doc:").unwrap().len(), 2);
    }

    #[test]
    fn test_undecodable_document() {
        let mut ledger = InMemoryLedger::new();
        ledger.put("doc:1", b"{broken".to_vec()).unwrap();

        assert_matches!(
            ledger.get_json::<Doc>("doc:1"),
            Err(StorageError::Serialization { key, .. }) if key == "doc:1"
        );
    }
}
