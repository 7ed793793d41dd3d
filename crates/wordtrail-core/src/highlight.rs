use crate::position::Position;
use std::time::{Duration, Instant};

/// Timed flash on a single cell, polled once per frame.
///
/// A new request replaces the one in flight instead of queueing behind it.
#[derive(Debug, Clone)]
pub struct HighlightTimer {
    duration: Duration,
    position: Option<Position>,
    started_at: Option<Instant>,
}

impl HighlightTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            position: None,
            started_at: None,
        }
    }

    /// Flash `position` starting at `now`, superseding any running flash
    pub fn start(&mut self, position: Position, now: Instant) {
        if let Some(previous) = self.position {
            if previous != position {
                log::debug!("highlight on {} superseded by {}", previous, position);
            }
        }
        self.position = Some(position);
        self.started_at = Some(now);
    }

    pub fn cancel(&mut self) {
        self.position = None;
        self.started_at = None;
    }

    /// Expire the flash once its duration has passed
    pub fn tick(&mut self, now: Instant) {
        if self.active_at(now).is_none() {
            self.cancel();
        }
    }

    /// The flashing cell, if the flash is still running at `now`
    pub fn active_at(&self, now: Instant) -> Option<Position> {
        let started = self.started_at?;
        if now.saturating_duration_since(started) < self.duration {
            self.position
        } else {
            None
        }
    }

    /// Fraction of the flash elapsed at `now`, in `[0, 1]`
    pub fn progress(&self, now: Instant) -> Option<f32> {
        self.active_at(now)?;
        let started = self.started_at?;
        if self.duration.is_zero() {
            return Some(1.0);
        }
        let elapsed = now.saturating_duration_since(started).as_secs_f32();
        Some((elapsed / self.duration.as_secs_f32()).min(1.0))
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.active_at(now).is_some()
    }
}
