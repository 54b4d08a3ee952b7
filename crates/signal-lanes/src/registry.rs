use crate::types::{Message, MessageId};

/// Time-ordered store of scheduled messages. All mutations go through
/// methods; messages are kept in id order.
#[derive(Debug, Default)]
pub struct FeedRegistry {
    messages: Vec<Message>,
    next_id: u64,
}

impl FeedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next message id. Ids are never handed out twice.
    pub fn next_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    /// True once any id has been reserved, even if the message is gone.
    pub fn has_issued_ids(&self) -> bool {
        self.next_id > 0
    }

    pub(crate) fn add_batch(&mut self, batch: Vec<Message>) {
        for message in batch {
            self.add_live(message);
        }
    }

    /// Ids must arrive in increasing order; lookups binary-search on them.
    pub(crate) fn add_live(&mut self, message: Message) {
        debug_assert!(
            self.messages.last().map_or(true, |last| last.id < message.id),
            "message {} added out of id order",
            message.id
        );
        self.messages.push(message);
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages
            .binary_search_by_key(&id, |m| m.id)
            .ok()
            .map(|idx| &self.messages[idx])
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Messages visible at `now`, in id order.
    pub fn list_active(&self, now: f64) -> impl Iterator<Item = &Message> + '_ {
        self.messages.iter().filter(move |m| m.is_active_at(now))
    }

    /// Latest end time per lane, derived from stored messages. Lanes with no
    /// messages report 0.
    pub fn lane_free_at(&self, lane_count: usize) -> Vec<f64> {
        let mut free_at = vec![0.0; lane_count];
        for m in &self.messages {
            if let Some(slot) = free_at.get_mut(m.lane) {
                *slot = f64::max(*slot, m.end_at());
            }
        }
        free_at
    }

    /// Drop messages that ended more than `grace_secs` before `now`.
    pub fn evict_expired(&mut self, now: f64, grace_secs: f64) -> Vec<MessageId> {
        let mut evicted = Vec::new();
        self.messages.retain(|m| {
            if m.end_at() + grace_secs < now {
                evicted.push(m.id);
                false
            } else {
                true
            }
        });
        evicted
    }

    /// Shrink to `max` messages, dropping those that end earliest first.
    pub fn enforce_capacity(&mut self, max: usize) -> Vec<MessageId> {
        if self.messages.len() <= max {
            return Vec::new();
        }
        let excess = self.messages.len() - max;
        let mut by_end: Vec<(f64, MessageId)> =
            self.messages.iter().map(|m| (m.end_at(), m.id)).collect();
        by_end.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let mut doomed: Vec<MessageId> =
            by_end.into_iter().take(excess).map(|(_, id)| id).collect();
        doomed.sort();
        self.messages.retain(|m| doomed.binary_search(&m.id).is_err());
        doomed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_message;

    fn registry_with(messages: Vec<Message>) -> FeedRegistry {
        let mut registry = FeedRegistry::new();
        for _ in &messages {
            registry.next_id();
        }
        registry.add_batch(messages);
        registry
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut registry = FeedRegistry::new();
        assert_eq!(registry.next_id(), MessageId(0));
        assert_eq!(registry.next_id(), MessageId(1));
        assert_eq!(registry.next_id(), MessageId(2));
    }

    #[test]
    fn test_add_batch_preserves_order() {
        let registry = registry_with(vec![
            test_message(0, 1, 0.0, 5.0),
            test_message(1, 0, 1.0, 5.0),
            test_message(2, 1, 6.0, 5.0),
        ]);
        let ids: Vec<u64> = registry.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(registry.get(MessageId(1)).unwrap().lane, 0);
        assert!(registry.get(MessageId(9)).is_none());
    }

    #[test]
    fn test_list_active_uses_stored_fields() {
        let registry = registry_with(vec![
            test_message(0, 0, 0.0, 5.0),
            test_message(1, 1, 3.0, 5.0),
            test_message(2, 0, 5.0, 5.0),
        ]);
        let at = |now: f64| registry.list_active(now).map(|m| m.id.0).collect::<Vec<_>>();
        assert_eq!(at(0.0), vec![0]);
        assert_eq!(at(4.0), vec![0, 1]);
        assert_eq!(at(5.0), vec![1, 2]);
        assert_eq!(at(10.0), Vec::<u64>::new());
    }

    #[test]
    fn test_lane_free_at() {
        let registry = registry_with(vec![
            test_message(0, 0, 0.0, 5.0),
            test_message(1, 2, 3.0, 5.0),
            test_message(2, 0, 5.0, 4.0),
        ]);
        assert_eq!(registry.lane_free_at(4), vec![9.0, 0.0, 8.0, 0.0]);
    }

    #[test]
    fn test_evict_expired_respects_grace() {
        let mut registry = registry_with(vec![
            test_message(0, 0, 0.0, 5.0),
            test_message(1, 1, 0.0, 10.0),
        ]);
        assert!(registry.evict_expired(7.0, 3.0).is_empty());
        // exactly at the grace boundary the message is kept
        assert!(registry.evict_expired(8.0, 3.0).is_empty());
        assert_eq!(registry.evict_expired(8.5, 3.0), vec![MessageId(0)]);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(MessageId(1)));
    }

    #[test]
    fn test_has_issued_ids_survives_eviction() {
        assert!(!FeedRegistry::new().has_issued_ids());

        let mut registry = registry_with(vec![test_message(0, 0, 0.0, 1.0)]);
        registry.evict_expired(100.0, 0.0);
        assert!(registry.is_empty());
        assert!(registry.has_issued_ids());
    }

    #[test]
    #[should_panic(expected = "out of id order")]
    #[cfg(debug_assertions)]
    fn test_out_of_order_add_is_caught() {
        let mut registry = FeedRegistry::new();
        registry.add_live(test_message(3, 0, 0.0, 1.0));
        registry.add_live(test_message(1, 0, 0.0, 1.0));
    }

    #[test]
    fn test_evicted_ids_are_not_reused() {
        let mut registry = registry_with(vec![test_message(0, 0, 0.0, 1.0)]);
        registry.evict_expired(100.0, 0.0);
        assert!(registry.is_empty());
        assert_eq!(registry.next_id(), MessageId(1));
    }

    #[test]
    fn test_enforce_capacity_drops_earliest_ending() {
        let mut registry = registry_with(vec![
            test_message(0, 0, 0.0, 20.0),
            test_message(1, 1, 0.0, 5.0),
            test_message(2, 2, 0.0, 5.0),
            test_message(3, 3, 0.0, 8.0),
        ]);
        assert_eq!(registry.enforce_capacity(2), vec![MessageId(1), MessageId(2)]);
        let ids: Vec<u64> = registry.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![0, 3]);
        assert!(registry.enforce_capacity(2).is_empty());
    }
}
