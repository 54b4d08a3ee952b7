//! signal-lanes: lane scheduling for the ephemeral signal feed.
//!
//! Messages are admitted either as a seeded batch or one at a time (live and
//! ambient injection). The allocator assigns each one a lane and an effective
//! start so that messages sharing a lane do not overlap in time; the registry
//! stores the result and the ledger tracks endorsements per message.

pub mod allocator;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod ledger;
pub mod metrics;
pub mod registry;
pub mod runner;
pub mod types;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use allocator::{AllocationContext, Assignment, LaneAllocator, LaneTracker, Stagger};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FeedConfig;
pub use controller::FeedController;
pub use events::{EventOutcome, FeedEvent};
pub use ledger::{Endorsement, InteractionLedger};
pub use registry::FeedRegistry;
pub use runner::{FeedHandle, FeedRunner};
pub use types::{ColorTag, FeedEntry, Message, MessageId, MessageSource};
