use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::allocator::{
    sample_between, AllocationContext, Assignment, LaneAllocator, SlotRequest, Stagger,
};
use crate::catalog::{self, CatalogEntry};
use crate::clock::Clock;
use crate::config::{DurationRange, FeedConfig, LivePlacement};
use crate::events::{Admission, EventOutcome, Eviction, FeedEvent};
use crate::ledger::{Endorsement, InteractionLedger};
use crate::registry::FeedRegistry;
use crate::types::{ColorTag, FeedEntry, Message, MessageId, MessageSource};
use crate::{Error, Result};

/// Orchestrates batch seeding, live/ambient injection, endorsement and
/// eviction over one registry and ledger.
pub struct FeedController {
    config: FeedConfig,
    allocator: LaneAllocator,
    stagger: Stagger,
    registry: FeedRegistry,
    ledger: InteractionLedger,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    seeded: bool,
}

impl FeedController {
    /// Fails with [`Error::Config`] if the configuration is unusable.
    pub fn new(config: FeedConfig, clock: Arc<dyn Clock>, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let allocator = LaneAllocator::new(&config.lanes)?;
        let stagger = Stagger::new(config.stagger.clone());
        Ok(Self {
            config,
            allocator,
            stagger,
            registry: FeedRegistry::new(),
            ledger: InteractionLedger::new(),
            clock,
            rng,
            seeded: false,
        })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &InteractionLedger {
        &self.ledger
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Apply one event. Only seeding can fail.
    pub fn apply(&mut self, event: FeedEvent) -> Result<EventOutcome> {
        let outcome = match event {
            FeedEvent::SeedBatch(entries) => {
                EventOutcome::Seeded(self.seed_initial_feed(&entries)?)
            }
            FeedEvent::SubmitLive { origin, text } => match self.submit_live(&origin, &text) {
                Some(admission) => EventOutcome::Admitted(admission),
                None => EventOutcome::Declined,
            },
            FeedEvent::Endorse(id) => EventOutcome::Endorsed(self.endorse(id)),
            FeedEvent::Evict => EventOutcome::Evicted(self.evict()),
            FeedEvent::Ambient => EventOutcome::Admitted(self.inject_ambient()),
        };
        Ok(outcome)
    }

    /// Build, batch-allocate and store the preset feed. Allowed once, and
    /// only before any live or ambient message has been admitted.
    pub fn seed_initial_feed(&mut self, entries: &[CatalogEntry]) -> Result<usize> {
        if self.seeded {
            return Err(Error::AlreadySeeded);
        }
        if self.registry.has_issued_ids() {
            return Err(Error::SeedAfterAdmission);
        }

        let admitted_at = self.clock.now();
        let range = self.config.preset_duration;
        let requests: Vec<SlotRequest> = (0..entries.len())
            .map(|index| SlotRequest {
                start_secs: self.stagger.start_offset(index, &mut self.rng),
                duration_secs: sample_between(&mut self.rng, range.min_secs, range.max_secs),
            })
            .collect();

        let mut tracker = self.allocator.tracker();
        let mut ctx = AllocationContext::new(self.clock.as_ref(), &mut self.rng);
        let assignments = self.allocator.allocate_batch(&mut tracker, &requests, &mut ctx);

        let mut batch = Vec::with_capacity(entries.len());
        for (index, (entry, assignment)) in entries.iter().zip(assignments).enumerate() {
            let id = self.registry.next_id();
            self.ledger.track(id);
            batch.push(Message {
                id,
                origin_label: entry.origin.to_string(),
                action_label: entry.action.to_string(),
                recency_label: entry.recency.to_string(),
                color_tag: ColorTag::from_index(index),
                source: MessageSource::Preset,
                admitted_at_secs: admitted_at,
                start_delay_secs: assignment.start_delay_secs,
                duration_secs: assignment.duration_secs,
                lane: assignment.lane,
                vertical_offset: assignment.vertical_offset,
            });
        }

        let count = batch.len();
        self.registry.add_batch(batch);
        self.seeded = true;

        info!(
            messages = count,
            lanes = self.allocator.lane_count(),
            horizon_secs = tracker.free_at().iter().cloned().fold(0.0, f64::max),
            "initial feed seeded"
        );
        Ok(count)
    }

    /// Admit one user message. Blank text is declined with `None`.
    pub fn submit_live_message(&mut self, origin: &str, text: &str) -> Option<MessageId> {
        self.submit_live(origin, text).map(|admission| admission.id)
    }

    fn submit_live(&mut self, origin: &str, text: &str) -> Option<Admission> {
        let text = text.trim();
        if text.is_empty() {
            debug!("declined blank live submission");
            return None;
        }
        let origin = match origin.trim() {
            "" => catalog::DEFAULT_LIVE_ORIGIN,
            o => o,
        };

        let range = self.config.live_duration;
        let assignment = match self.config.live_placement {
            LivePlacement::Random => {
                let duration = self.sample_duration(range);
                let mut ctx = AllocationContext::new(self.clock.as_ref(), &mut self.rng);
                self.allocator.allocate_live(duration, &mut ctx)
            }
            LivePlacement::EarliestFree => self.strict_assignment(range),
        };
        let color = ColorTag::from_index(self.rng.random_range(0..ColorTag::ALL.len()));

        let admission = self.admit(
            origin,
            text,
            catalog::LIVE_RECENCY,
            color,
            MessageSource::Live,
            assignment,
        );
        debug!(id = %admission.id, lane = assignment.lane, "live message admitted");
        Some(admission)
    }

    /// Synthesise one catalog message with strict placement.
    pub fn inject_ambient(&mut self) -> Admission {
        let entry = catalog::random_entry(&mut self.rng);
        let assignment = self.strict_assignment(self.config.ambient.duration);
        let color = ColorTag::from_index(self.rng.random_range(0..ColorTag::ALL.len()));
        self.admit(
            entry.origin,
            entry.action,
            entry.recency,
            color,
            MessageSource::Ambient,
            assignment,
        )
    }

    /// Fire-and-forget endorsement; stale ids are ignored.
    pub fn endorse(&mut self, id: MessageId) -> Endorsement {
        let result = self.ledger.endorse(id);
        if result == Endorsement::Stale {
            debug!(id = %id, "endorsement for unknown message ignored");
        }
        result
    }

    pub fn endorsement_count(&self, id: MessageId) -> u64 {
        self.ledger.count(id)
    }

    /// Evict messages past the grace window, then enforce the capacity cap.
    pub fn evict(&mut self) -> Eviction {
        let now = self.clock.now();
        let expired = self.registry.evict_expired(now, self.config.eviction_grace_secs);
        let over_capacity = self.registry.enforce_capacity(self.config.max_messages);
        for id in expired.iter().chain(over_capacity.iter()) {
            self.ledger.forget(*id);
        }
        if !over_capacity.is_empty() {
            warn!(
                dropped = over_capacity.len(),
                max = self.config.max_messages,
                "feed over capacity"
            );
        }
        Eviction {
            expired,
            over_capacity,
        }
    }

    /// Everything the renderer needs, in id order.
    pub fn feed_snapshot(&self) -> Vec<FeedEntry> {
        self.registry
            .iter()
            .map(|m| FeedEntry::new(m, self.ledger.count(m.id)))
            .collect()
    }

    /// Snapshot restricted to messages visible at `now`.
    pub fn active_snapshot(&self, now: f64) -> Vec<FeedEntry> {
        self.registry
            .list_active(now)
            .map(|m| FeedEntry::new(m, self.ledger.count(m.id)))
            .collect()
    }

    fn sample_duration(&mut self, range: DurationRange) -> f64 {
        sample_between(&mut self.rng, range.min_secs, range.max_secs)
    }

    fn strict_assignment(&mut self, range: DurationRange) -> Assignment {
        let duration = self.sample_duration(range);
        let free_at = self.registry.lane_free_at(self.allocator.lane_count());
        let mut ctx = AllocationContext::new(self.clock.as_ref(), &mut self.rng);
        self.allocator.allocate_after(&free_at, duration, &mut ctx)
    }

    fn admit(
        &mut self,
        origin: &str,
        action: &str,
        recency: &str,
        color_tag: ColorTag,
        source: MessageSource,
        assignment: Assignment,
    ) -> Admission {
        // Room for the newcomer is made before it is stored
        let displaced = self
            .registry
            .enforce_capacity(self.config.max_messages.saturating_sub(1));
        for id in &displaced {
            self.ledger.forget(*id);
        }

        let id = self.registry.next_id();
        self.ledger.track(id);
        self.registry.add_live(Message {
            id,
            origin_label: origin.to_string(),
            action_label: action.to_string(),
            recency_label: recency.to_string(),
            color_tag,
            source,
            admitted_at_secs: self.clock.now(),
            start_delay_secs: assignment.start_delay_secs,
            duration_secs: assignment.duration_secs,
            lane: assignment.lane,
            vertical_offset: assignment.vertical_offset,
        });

        Admission {
            id,
            source,
            displaced,
        }
    }
}
