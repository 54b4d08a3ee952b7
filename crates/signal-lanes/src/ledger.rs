use std::collections::HashMap;

use crate::types::MessageId;

/// Result of an endorsement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endorsement {
    /// Counter incremented; carries the new count
    Counted(u64),
    /// Message unknown or already evicted; nothing changed
    Stale,
}

/// Endorsement counters keyed by message id.
#[derive(Debug, Default)]
pub struct InteractionLedger {
    counts: HashMap<MessageId, u64>,
}

impl InteractionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `id` at zero. Existing counts are left alone.
    pub fn track(&mut self, id: MessageId) {
        self.counts.entry(id).or_insert(0);
    }

    pub fn endorse(&mut self, id: MessageId) -> Endorsement {
        match self.counts.get_mut(&id) {
            Some(count) => {
                *count += 1;
                Endorsement::Counted(*count)
            }
            None => Endorsement::Stale,
        }
    }

    pub fn count(&self, id: MessageId) -> u64 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn forget(&mut self, id: MessageId) {
        self.counts.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endorse_counts_up() {
        let mut ledger = InteractionLedger::new();
        ledger.track(MessageId(3));
        for n in 1..=5 {
            assert_eq!(ledger.endorse(MessageId(3)), Endorsement::Counted(n));
        }
        assert_eq!(ledger.count(MessageId(3)), 5);
    }

    #[test]
    fn test_unknown_id_is_stale_noop() {
        let mut ledger = InteractionLedger::new();
        ledger.track(MessageId(1));
        ledger.endorse(MessageId(1));
        assert_eq!(ledger.endorse(MessageId(99)), Endorsement::Stale);
        assert_eq!(ledger.count(MessageId(1)), 1);
        assert_eq!(ledger.count(MessageId(99)), 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_forgotten_id_becomes_stale() {
        let mut ledger = InteractionLedger::new();
        ledger.track(MessageId(7));
        ledger.endorse(MessageId(7));
        ledger.forget(MessageId(7));
        assert_eq!(ledger.endorse(MessageId(7)), Endorsement::Stale);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_track_does_not_reset() {
        let mut ledger = InteractionLedger::new();
        ledger.track(MessageId(2));
        ledger.endorse(MessageId(2));
        ledger.track(MessageId(2));
        assert_eq!(ledger.count(MessageId(2)), 1);
    }
}
