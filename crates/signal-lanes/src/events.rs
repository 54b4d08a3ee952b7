use crate::catalog::CatalogEntry;
use crate::ledger::Endorsement;
use crate::types::{MessageId, MessageSource};

/// Discrete state transitions over (registry, ledger).
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Seed the initial feed from an ordered catalog (once)
    SeedBatch(Vec<CatalogEntry>),
    /// User submission; blank text is declined
    SubmitLive { origin: String, text: String },
    /// User endorsement; unknown ids are ignored
    Endorse(MessageId),
    /// Drop expired messages and enforce capacity
    Evict,
    /// Timer-driven synthetic message
    Ambient,
}

impl std::fmt::Display for FeedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedEvent::SeedBatch(_) => write!(f, "seed_batch"),
            FeedEvent::SubmitLive { .. } => write!(f, "submit_live"),
            FeedEvent::Endorse(_) => write!(f, "endorse"),
            FeedEvent::Evict => write!(f, "evict"),
            FeedEvent::Ambient => write!(f, "ambient"),
        }
    }
}

/// A single message admitted outside the seeded batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    pub id: MessageId,
    pub source: MessageSource,
    /// Messages dropped to make room under the capacity cap
    pub displaced: Vec<MessageId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Eviction {
    pub expired: Vec<MessageId>,
    pub over_capacity: Vec<MessageId>,
}

impl Eviction {
    pub fn total(&self) -> usize {
        self.expired.len() + self.over_capacity.len()
    }
}

/// What applying a [`FeedEvent`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Seeded(usize),
    Admitted(Admission),
    Declined,
    Endorsed(Endorsement),
    Evicted(Eviction),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_display() {
        assert_eq!(FeedEvent::SeedBatch(vec![]).to_string(), "seed_batch");
        assert_eq!(
            FeedEvent::SubmitLive {
                origin: String::new(),
                text: "hi".into()
            }
            .to_string(),
            "submit_live"
        );
        assert_eq!(FeedEvent::Endorse(MessageId(1)).to_string(), "endorse");
        assert_eq!(FeedEvent::Evict.to_string(), "evict");
        assert_eq!(FeedEvent::Ambient.to_string(), "ambient");
    }

    #[test]
    fn test_eviction_total() {
        let eviction = Eviction {
            expired: vec![MessageId(1), MessageId(2)],
            over_capacity: vec![MessageId(5)],
        };
        assert_eq!(eviction.total(), 3);
        assert_eq!(Eviction::default().total(), 0);
    }
}
