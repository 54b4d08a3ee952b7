use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controller::FeedController;
use crate::events::{EventOutcome, FeedEvent};
use crate::metrics::FeedMetrics;
use crate::types::{FeedEntry, MessageId};
use crate::{Error, Result};

/// Requests accepted by the runner's queue.
enum Command {
    Submit {
        origin: String,
        text: String,
        reply: oneshot::Sender<Option<MessageId>>,
    },
    Endorse(MessageId),
    Snapshot {
        reply: oneshot::Sender<Vec<FeedEntry>>,
    },
    Active {
        reply: oneshot::Sender<Vec<FeedEntry>>,
    },
}

/// Cheap, cloneable handle for request handlers. Every call is queued and
/// applied by the single runner task in arrival order.
#[derive(Clone)]
pub struct FeedHandle {
    tx: mpsc::Sender<Command>,
}

impl FeedHandle {
    /// Submit a live message. `Ok(None)` means the text was blank.
    pub async fn submit(
        &self,
        origin: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<Option<MessageId>> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Submit {
            origin: origin.into(),
            text: text.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| Error::Closed)
    }

    /// Fire-and-forget. Never reports an error, even if the runner is gone.
    pub async fn endorse(&self, id: MessageId) {
        if self.send(Command::Endorse(id)).await.is_err() {
            debug!(id = %id, "endorsement dropped, runner closed");
        }
    }

    pub async fn snapshot(&self) -> Result<Vec<FeedEntry>> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| Error::Closed)
    }

    /// Entries visible right now.
    pub async fn active(&self) -> Result<Vec<FeedEntry>> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Active { reply }).await?;
        rx.await.map_err(|_| Error::Closed)
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).await.map_err(|_| Error::Closed)
    }
}

/// Owns the controller and serialises every state transition: queued
/// commands, eviction ticks and ambient ticks are handled one at a time.
pub struct FeedRunner {
    controller: FeedController,
    metrics: Arc<FeedMetrics>,
    rx: mpsc::Receiver<Command>,
    shutdown: CancellationToken,
}

impl FeedRunner {
    pub fn new(
        controller: FeedController,
        metrics: Arc<FeedMetrics>,
        queue_depth: usize,
    ) -> (Self, FeedHandle) {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        metrics.registry_size.set(controller.registry().len() as i64);
        let runner = Self {
            controller,
            metrics,
            rx,
            shutdown: CancellationToken::new(),
        };
        (runner, FeedHandle { tx })
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run until shutdown or until every handle is dropped. Returns the
    /// controller so callers can inspect the final state.
    pub async fn run(self) -> FeedController {
        let FeedRunner {
            mut controller,
            metrics,
            mut rx,
            shutdown,
        } = self;

        let config = controller.config().clone();
        let mut evict_tick = periodic(config.eviction_interval_secs);
        let mut ambient_tick = config
            .ambient
            .enabled
            .then(|| periodic(config.ambient.interval_secs));

        info!(
            lanes = config.lanes.count,
            messages = controller.registry().len(),
            ambient = config.ambient.enabled,
            "feed runner started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("feed runner received shutdown");
                    break;
                }
                command = rx.recv() => match command {
                    Some(command) => handle_command(&mut controller, &metrics, command),
                    None => {
                        info!("all feed handles dropped");
                        break;
                    }
                },
                _ = evict_tick.tick() => {
                    let outcome = apply(&mut controller, &metrics, FeedEvent::Evict);
                    if let Some(EventOutcome::Evicted(eviction)) = outcome {
                        if eviction.total() > 0 {
                            debug!(
                                evicted = eviction.total(),
                                remaining = controller.registry().len(),
                                "eviction pass"
                            );
                        }
                    }
                }
                _ = tick_optional(&mut ambient_tick) => {
                    apply(&mut controller, &metrics, FeedEvent::Ambient);
                }
            }
        }

        controller
    }
}

fn periodic(period_secs: f64) -> Interval {
    let period = Duration::from_secs_f64(period_secs);
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn tick_optional(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn apply(
    controller: &mut FeedController,
    metrics: &FeedMetrics,
    event: FeedEvent,
) -> Option<EventOutcome> {
    let name = event.to_string();
    match controller.apply(event) {
        Ok(outcome) => {
            metrics.observe(&outcome, controller.registry().len());
            Some(outcome)
        }
        Err(e) => {
            warn!(event = %name, error = %e, "feed event rejected");
            None
        }
    }
}

fn handle_command(controller: &mut FeedController, metrics: &FeedMetrics, command: Command) {
    match command {
        Command::Submit { origin, text, reply } => {
            let id = match apply(controller, metrics, FeedEvent::SubmitLive { origin, text }) {
                Some(EventOutcome::Admitted(admission)) => Some(admission.id),
                _ => None,
            };
            let _ = reply.send(id);
        }
        Command::Endorse(id) => {
            apply(controller, metrics, FeedEvent::Endorse(id));
        }
        Command::Snapshot { reply } => {
            let _ = reply.send(controller.feed_snapshot());
        }
        Command::Active { reply } => {
            let _ = reply.send(controller.active_snapshot(controller.now()));
        }
    }
}
