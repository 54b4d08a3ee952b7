//! Lane allocation.
//!
//! Batch admission runs the greedy earliest-free-lane heuristic over a
//! fixed number of lanes: each candidate, in presentation order, goes to the
//! lane whose last occupant finishes first (ties to the lowest index). If
//! even that lane is still busy at the candidate's tentative start, the
//! candidate waits for it, so same-lane intervals never overlap.
//!
//! Live admission skips the bookkeeping and picks a lane uniformly at
//! random; [`LaneAllocator::allocate_after`] is the strict alternative that
//! consults a `free_at` view rebuilt from the registry.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::Clock;
use crate::config::{LaneConfig, StaggerConfig};
use crate::Result;

/// Explicit time and randomness for one allocation call.
pub struct AllocationContext<'a, R: Rng> {
    pub clock: &'a dyn Clock,
    pub rng: &'a mut R,
}

impl<'a, R: Rng> AllocationContext<'a, R> {
    pub fn new(clock: &'a dyn Clock, rng: &'a mut R) -> Self {
        Self { clock, rng }
    }
}

/// Uniform sample from `[min, max)`; collapses to `min` for empty ranges.
pub fn sample_between<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Vertical position inside a lane's band: `lane * height + jitter`, with
/// jitter in `[0, jitter_max)` derived from `seed` alone.
pub fn vertical_offset(lane: usize, height: f64, jitter_max: f64, seed: u64) -> f64 {
    let fraction: f64 = StdRng::seed_from_u64(seed).random();
    lane as f64 * height + fraction * jitter_max
}

/// A message waiting for a lane: tentative start (relative to the batch
/// origin) and how long it stays visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRequest {
    pub start_secs: f64,
    pub duration_secs: f64,
}

/// Lane and effective interval chosen for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneSlot {
    pub lane: usize,
    pub start_secs: f64,
    pub end_secs: f64,
}

/// Final placement handed back to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    pub lane: usize,
    pub start_delay_secs: f64,
    pub duration_secs: f64,
    pub vertical_offset: f64,
}

/// Per-lane "free at" times.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneTracker {
    free_at: Vec<f64>,
}

impl LaneTracker {
    pub fn new(lane_count: usize) -> Self {
        Self {
            free_at: vec![0.0; lane_count],
        }
    }

    pub fn from_free_at(free_at: Vec<f64>) -> Self {
        Self { free_at }
    }

    pub fn free_at(&self) -> &[f64] {
        &self.free_at
    }

    /// Lane that frees up first, lowest index on ties.
    pub fn earliest_lane(&self) -> usize {
        let mut best = 0;
        for (lane, &t) in self.free_at.iter().enumerate().skip(1) {
            if t < self.free_at[best] {
                best = lane;
            }
        }
        best
    }

    pub fn place(&mut self, start_secs: f64, duration_secs: f64) -> LaneSlot {
        let lane = self.earliest_lane();
        let start = start_secs.max(self.free_at[lane]);
        let end = start + duration_secs;
        self.free_at[lane] = end;
        LaneSlot {
            lane,
            start_secs: start,
            end_secs: end,
        }
    }
}

/// Group-staggered arrival offsets for a seeded batch.
#[derive(Debug, Clone)]
pub struct Stagger {
    config: StaggerConfig,
}

impl Stagger {
    pub fn new(config: StaggerConfig) -> Self {
        Self { config }
    }

    /// Tentative start for the `index`-th message of a batch.
    pub fn start_offset<R: Rng>(&self, index: usize, rng: &mut R) -> f64 {
        let group = index / self.config.group_size;
        let within = index % self.config.group_size;
        group as f64 * self.config.group_delay_secs
            + within as f64 * self.config.in_group_step_secs
            + sample_between(rng, 0.0, self.config.jitter_max_secs)
    }
}

#[derive(Debug, Clone)]
pub struct LaneAllocator {
    lanes: LaneConfig,
}

impl LaneAllocator {
    pub fn new(lanes: &LaneConfig) -> Result<Self> {
        lanes.validate()?;
        Ok(Self {
            lanes: lanes.clone(),
        })
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.count
    }

    /// Empty `free_at` bookkeeping sized for this allocator.
    pub fn tracker(&self) -> LaneTracker {
        LaneTracker::new(self.lanes.count)
    }

    /// Place every request in order against `tracker`.
    pub fn allocate_batch<R: Rng>(
        &self,
        tracker: &mut LaneTracker,
        requests: &[SlotRequest],
        ctx: &mut AllocationContext<'_, R>,
    ) -> Vec<Assignment> {
        requests
            .iter()
            .map(|req| {
                let slot = tracker.place(req.start_secs, req.duration_secs);
                self.assignment(slot, req.duration_secs, ctx.rng)
            })
            .collect()
    }

    /// Constant-time live placement: random lane, immediate start.
    pub fn allocate_live<R: Rng>(
        &self,
        duration_secs: f64,
        ctx: &mut AllocationContext<'_, R>,
    ) -> Assignment {
        let lane = ctx.rng.random_range(0..self.lanes.count);
        let slot = LaneSlot {
            lane,
            start_secs: 0.0,
            end_secs: duration_secs,
        };
        self.assignment(slot, duration_secs, ctx.rng)
    }

    /// Strict live placement against absolute `free_at` times (one entry per
    /// lane). The returned start delay is relative to `ctx.clock.now()`.
    pub fn allocate_after<R: Rng>(
        &self,
        free_at: &[f64],
        duration_secs: f64,
        ctx: &mut AllocationContext<'_, R>,
    ) -> Assignment {
        let now = ctx.clock.now();
        let mut relative: Vec<f64> = free_at.iter().map(|&t| (t - now).max(0.0)).collect();
        relative.resize(self.lanes.count, 0.0);
        let mut tracker = LaneTracker::from_free_at(relative);
        let slot = tracker.place(0.0, duration_secs);
        self.assignment(slot, duration_secs, ctx.rng)
    }

    fn assignment<R: Rng>(&self, slot: LaneSlot, duration_secs: f64, rng: &mut R) -> Assignment {
        let seed: u64 = rng.random();
        Assignment {
            lane: slot.lane,
            start_delay_secs: slot.start_secs,
            duration_secs,
            vertical_offset: vertical_offset(
                slot.lane,
                self.lanes.height,
                self.lanes.jitter_max,
                seed,
            ),
        }
    }
}
