//! Order persistence on the ledger
//!
//! `order:<key>` holds the authoritative [`OrderRecord`]. `orderIndex:<key>`
//! mirrors the record's commitment for cheap existence checks; it is a
//! derived cache and can be regenerated with [`OrderLedger::rebuild_index`].

use common::{OrderKey, Result};
use storage::{keys, LedgerExt, LedgerStore, TxContext};
use tracing::{debug, info};

use crate::commitment::Commitment;
use crate::types::OrderRecord;

/// Reads and writes order slots, the order index and the key sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderLedger;

impl OrderLedger {
    /// Assign the next free sequence key and advance the counter
    ///
    /// Keys already taken by caller-supplied orders are skipped.
    pub fn next_key(ctx: &mut TxContext<'_>) -> Result<OrderKey> {
        let mut sequence: u64 = ctx
            .ledger()
            .get_json(keys::ORDER_SEQUENCE)?
            .unwrap_or(0);

        let key = loop {
            sequence += 1;
            let candidate = OrderKey::from_sequence(sequence);
            if !ctx.ledger().exists(&keys::order(candidate.as_str()))? {
                break candidate;
            }
        };

        ctx.ledger_mut().put_json(keys::ORDER_SEQUENCE, &sequence)?;
        debug!(order_key = %key, "Order key assigned");
        Ok(key)
    }

    /// Load the record stored at `key`
    pub fn load(ctx: &TxContext<'_>, key: &OrderKey) -> Result<Option<OrderRecord>> {
        Ok(ctx.ledger().get_json(&keys::order(key.as_str()))?)
    }

    /// Write `record` to its slot and mirror its commitment into the index
    pub fn save(ctx: &mut TxContext<'_>, record: &OrderRecord) -> Result<()> {
        let key = record.order.order_key.as_str();
        ctx.ledger_mut().put_json(&keys::order(key), record)?;
        ctx.ledger_mut()
            .put_json(&keys::order_index(key), &record.commitment)?;
        Ok(())
    }

    /// Commitment recorded in the index for `key`
    pub fn index_entry(ctx: &TxContext<'_>, key: &OrderKey) -> Result<Option<Commitment>> {
        Ok(ctx.ledger().get_json(&keys::order_index(key.as_str()))?)
    }

    /// Every index entry in key order
    pub fn index(ctx: &TxContext<'_>) -> Result<Vec<(OrderKey, Commitment)>> {
        ctx.ledger()
            .scan_json::<Commitment>(keys::ORDER_INDEX_PREFIX)?
            .into_iter()
            .map(|(key, commitment)| -> Result<(OrderKey, Commitment)> {
                let suffix = keys::suffix(&key, keys::ORDER_INDEX_PREFIX).unwrap_or(key.as_str());
                Ok((OrderKey::new(suffix)?, commitment))
            })
            .collect()
    }

    /// Every stored order record in key order
    pub fn records(ctx: &TxContext<'_>) -> Result<Vec<OrderRecord>> {
        Ok(ctx
            .ledger()
            .scan_json::<OrderRecord>(keys::ORDER_PREFIX)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    /// Regenerate the index from the order records
    ///
    /// Returns the number of index entries written.
    pub fn rebuild_index(ctx: &mut TxContext<'_>) -> Result<usize> {
        let stale: Vec<String> = ctx
            .ledger()
            .scan_prefix(keys::ORDER_INDEX_PREFIX)?
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        for key in &stale {
            ctx.ledger_mut().delete(key)?;
        }

        let records = Self::records(ctx)?;
        for record in &records {
            ctx.ledger_mut().put_json(
                &keys::order_index(record.order.order_key.as_str()),
                &record.commitment,
            )?;
        }

        info!(removed = stale.len(), written = records.len(), "Order index rebuilt");
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Order;
    use common::{HolderId, Side};
    use storage::InMemoryLedger;

    fn owner() -> HolderId {
        HolderId::derive("alice").unwrap()
    }

    fn record(key: OrderKey) -> OrderRecord {
        OrderRecord::new(Order::placed(key, Side::Sell, "ACME", 1, 1, 0, owner()))
    }

    #[test]
    fn test_next_key_skips_taken_slots() {
        let mut ledger = InMemoryLedger::new();
        let mut ctx = TxContext::new(&mut ledger, owner());

        OrderLedger::save(&mut ctx, &record(OrderKey::new("2").unwrap())).unwrap();

        assert_eq!(OrderLedger::next_key(&mut ctx).unwrap().as_str(), "1");
        assert_eq!(OrderLedger::next_key(&mut ctx).unwrap().as_str(), "3");
    }

    #[test]
    fn test_save_mirrors_index() {
        let mut ledger = InMemoryLedger::new();
        let mut ctx = TxContext::new(&mut ledger, owner());

        let rec = record(OrderKey::from_sequence(1));
        OrderLedger::save(&mut ctx, &rec).unwrap();

        let key = OrderKey::from_sequence(1);
        assert_eq!(OrderLedger::load(&ctx, &key).unwrap(), Some(rec.clone()));
        assert_eq!(OrderLedger::index_entry(&ctx, &key).unwrap(), Some(rec.commitment));
    }

    #[test]
    fn test_rebuild_index_from_records() {
        let mut ledger = InMemoryLedger::new();
        let mut ctx = TxContext::new(&mut ledger, owner());

        let rec = record(OrderKey::from_sequence(1));
        OrderLedger::save(&mut ctx, &rec).unwrap();

        // Desynchronise the index: drop the real entry, add a stray one
        ctx.ledger_mut().delete(&keys::order_index("1")).unwrap();
        ctx.ledger_mut()
            .put_json(&keys::order_index("99"), &rec.commitment)
            .unwrap();

        assert_eq!(OrderLedger::rebuild_index(&mut ctx).unwrap(), 1);
        let index = OrderLedger::index(&ctx).unwrap();
        assert_eq!(index, vec![(OrderKey::from_sequence(1), rec.commitment)]);
    }
}
