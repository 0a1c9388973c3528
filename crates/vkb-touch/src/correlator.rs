//! Double-click correlation across taps.
//!
//! Touch screens report every tap as an independent touch, so a double
//! click has to be reconstructed: a tap that lands close enough, soon
//! enough after the previous tap also produces a `dblclick`.
//!
//! Only the immediately preceding tap is compared. A triple tap yields two
//! `dblclick`s (taps 1+2 and 2+3), since each tap becomes the new baseline.

use vkb_core::{GestureConfig, Millis, Point};

/// The most recently completed tap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickRecord {
    pub time: Millis,
    pub at: Point,
}

/// Holds the last-tap record for one engine.
#[derive(Debug, Clone)]
pub struct DoubleClickCorrelator {
    window_ms: Millis,
    max_distance: f64,
    last: Option<ClickRecord>,
}

impl DoubleClickCorrelator {
    pub fn new(window_ms: Millis, max_distance: f64) -> Self {
        Self {
            window_ms,
            max_distance,
            last: None,
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(
            config.double_click_window_ms,
            config.double_click_distance_threshold,
        )
    }

    /// Record a completed tap at `(at, time)` and report whether it pairs
    /// with the previous one into a double click.
    ///
    /// The record is replaced whatever the outcome.
    pub fn record_and_check(&mut self, at: Point, time: Millis) -> bool {
        let is_double = self.last.is_some_and(|prev| {
            time.abs_diff(prev.time) <= self.window_ms && prev.at.distance(at) <= self.max_distance
        });
        self.last = Some(ClickRecord { time, at });
        is_double
    }

    pub fn last(&self) -> Option<ClickRecord> {
        self.last
    }
}
