//! Touch input abstraction.
//!
//! Normalizes the host's touch callbacks (and timer ticks) into a single
//! `TouchInput` enum, so recorded traces can be replayed through
//! `TouchEngine::handle`.

use crate::session::TouchId;
use serde::{Deserialize, Serialize};
use vkb_core::{Millis, Point};

/// One inbound sample from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TouchInput {
    /// Finger contact (`touchstart`).
    Start { id: i64, x: f64, y: f64, t: Millis },

    /// Finger moved (`touchmove`).
    Move { id: i64, x: f64, y: f64, t: Millis },

    /// Finger lifted (`touchend`).
    End { id: i64, x: f64, y: f64, t: Millis },

    /// Contact aborted by the platform (`touchcancel`).
    Cancel { id: i64 },

    /// Clock tick: run timers due at or before `t`.
    Advance { t: Millis },
}

impl TouchInput {
    pub fn start(id: TouchId, at: Point, t: Millis) -> Self {
        Self::Start {
            id: id.0,
            x: at.x,
            y: at.y,
            t,
        }
    }

    pub fn moved(id: TouchId, at: Point, t: Millis) -> Self {
        Self::Move {
            id: id.0,
            x: at.x,
            y: at.y,
            t,
        }
    }

    pub fn end(id: TouchId, at: Point, t: Millis) -> Self {
        Self::End {
            id: id.0,
            x: at.x,
            y: at.y,
            t,
        }
    }
}
