//! Per-invocation transaction context

use common::{DomainEvent, HolderId};

use crate::ledger::LedgerStore;
use crate::transaction::Transaction;
use crate::Result;

/// Everything one operation may touch: the caller, a transaction over the
/// ledger, and the events raised so far.
///
/// Events are buffered here and only returned by [`TxContext::commit`], so
/// an operation that fails publishes nothing.
pub struct TxContext<'a> {
    caller: HolderId,
    ledger: Transaction<'a>,
    events: Vec<DomainEvent>,
}

impl<'a> TxContext<'a> {
    pub fn new(base: &'a mut dyn LedgerStore, caller: HolderId) -> Self {
        Self {
            caller,
            ledger: Transaction::begin(base),
            events: Vec::new(),
        }
    }

    /// Holder identifier of the calling principal
    pub fn caller(&self) -> &HolderId {
        &self.caller
    }

    pub fn ledger(&self) -> &Transaction<'a> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Transaction<'a> {
        &mut self.ledger
    }

    /// Queue an event for publication after commit
    pub fn emit(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    /// Events queued so far
    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    /// Commit the staged writes and hand back the queued events
    pub fn commit(self) -> Result<Vec<DomainEvent>> {
        self.ledger.commit()?;
        Ok(self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryLedger;

    fn caller() -> HolderId {
        HolderId::derive("alice").unwrap()
    }

    #[test]
    fn test_commit_returns_events_and_persists() {
        let mut base = InMemoryLedger::new();
        let mut ctx = TxContext::new(&mut base, caller());
        ctx.ledger_mut().put("security:ACME", b"{}".to_vec()).unwrap();
        ctx.emit(DomainEvent::SecurityCreated {
            symbol: "ACME".to_string(),
            name: "Acme".to_string(),
            quantity: 1,
        });

        let events = ctx.commit().unwrap();
        assert_eq!(events.len(), 1);
        assert!(base.exists("security:ACME").unwrap());
    }

    #[test]
    fn test_abandoned_context_leaves_ledger_untouched() {
        let mut base = InMemoryLedger::new();
        {
            let mut ctx = TxContext::new(&mut base, caller());
            ctx.ledger_mut().put("security:ACME", b"{}".to_vec()).unwrap();
        }
        assert!(base.is_empty());
    }
}
