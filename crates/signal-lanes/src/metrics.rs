use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};

use crate::events::EventOutcome;
use crate::ledger::Endorsement;

pub struct FeedMetrics {
    pub registry: Registry,
    pub messages_admitted: IntCounterVec,
    pub submissions_declined: IntCounter,
    pub endorsements: IntCounterVec,
    pub messages_evicted: IntCounterVec,
    pub registry_size: IntGauge,
}

impl FeedMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let messages_admitted = IntCounterVec::new(
            Opts::new("signal_messages_admitted_total", "Messages placed on a lane"),
            &["source"],
        )
        .unwrap();

        let submissions_declined = IntCounter::new(
            "signal_submissions_declined_total",
            "Live submissions declined for blank text",
        )
        .unwrap();

        let endorsements = IntCounterVec::new(
            Opts::new("signal_endorsements_total", "Endorsement requests"),
            &["outcome"],
        )
        .unwrap();

        let messages_evicted = IntCounterVec::new(
            Opts::new("signal_messages_evicted_total", "Messages dropped from the registry"),
            &["reason"],
        )
        .unwrap();

        let registry_size =
            IntGauge::new("signal_registry_size", "Messages currently stored").unwrap();

        registry.register(Box::new(messages_admitted.clone())).unwrap();
        registry.register(Box::new(submissions_declined.clone())).unwrap();
        registry.register(Box::new(endorsements.clone())).unwrap();
        registry.register(Box::new(messages_evicted.clone())).unwrap();
        registry.register(Box::new(registry_size.clone())).unwrap();

        Self {
            registry,
            messages_admitted,
            submissions_declined,
            endorsements,
            messages_evicted,
            registry_size,
        }
    }

    /// Record one applied event and the registry size after it.
    pub fn observe(&self, outcome: &EventOutcome, registry_len: usize) {
        match outcome {
            EventOutcome::Seeded(count) => {
                self.messages_admitted
                    .with_label_values(&["preset"])
                    .inc_by(*count as u64);
            }
            EventOutcome::Admitted(admission) => {
                let source = admission.source.to_string();
                self.messages_admitted
                    .with_label_values(&[source.as_str()])
                    .inc();
                if !admission.displaced.is_empty() {
                    self.messages_evicted
                        .with_label_values(&["capacity"])
                        .inc_by(admission.displaced.len() as u64);
                }
            }
            EventOutcome::Declined => self.submissions_declined.inc(),
            EventOutcome::Endorsed(Endorsement::Counted(_)) => {
                self.endorsements.with_label_values(&["counted"]).inc();
            }
            EventOutcome::Endorsed(Endorsement::Stale) => {
                self.endorsements.with_label_values(&["stale"]).inc();
            }
            EventOutcome::Evicted(eviction) => {
                self.messages_evicted
                    .with_label_values(&["expired"])
                    .inc_by(eviction.expired.len() as u64);
                self.messages_evicted
                    .with_label_values(&["capacity"])
                    .inc_by(eviction.over_capacity.len() as u64);
            }
        }
        self.registry_size.set(registry_len as i64);
    }

    /// Prometheus text exposition.
    pub fn encode(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        if encoder.encode(&self.registry.gather(), &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

impl Default for FeedMetrics {
    fn default() -> Self {
        Self::new()
    }
}
