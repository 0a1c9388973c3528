//! Per-touch session state.

use crate::timer::{TimerHandle, TimerQueue};
use serde::{Deserialize, Serialize};
use std::fmt;
use vkb_core::{GestureConfig, Millis, Point};

/// Platform touch identifier (`Touch.identifier`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TouchId(pub i64);

impl fmt::Display for TouchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "touch#{}", self.0)
    }
}

/// What a touch has been classified as.
///
/// Starts as `Pending`; every other mode is terminal for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchMode {
    Pending,
    /// Quick swipe: pointer moves with no button held.
    Move,
    /// Hold then move: pointer moves with the primary button held.
    Drag,
    /// Long press: the context menu sequence has been emitted.
    RightClick,
}

impl TouchMode {
    /// Classify a pending touch that just crossed the move threshold.
    ///
    /// | Elapsed | Mode |
    /// |---------|------|
    /// | `<= drag` | `Move` |
    /// | `(drag, right_click]` | `Drag` |
    /// | `> right_click` | `Move` (right-click timer ran late) |
    pub fn classify_motion(elapsed: Millis, config: &GestureConfig) -> Self {
        if elapsed <= config.drag_threshold_time_ms {
            Self::Move
        } else if elapsed <= config.right_click_threshold_time_ms {
            Self::Drag
        } else {
            Self::Move
        }
    }
}

/// Which of a session's timers an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    DragAvailable,
    RightClick,
    Vibrate,
}

/// Queue payload: the session and timer an entry fires for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTask {
    pub touch: TouchId,
    pub kind: TimerKind,
}

/// The up-to-three timers a session owns.
#[derive(Debug, Default)]
pub struct SessionTimers {
    pub drag_available: Option<TimerHandle>,
    pub right_click: Option<TimerHandle>,
    pub vibrate: Option<TimerHandle>,
}

impl SessionTimers {
    fn slot(&mut self, kind: TimerKind) -> &mut Option<TimerHandle> {
        match kind {
            TimerKind::DragAvailable => &mut self.drag_available,
            TimerKind::RightClick => &mut self.right_click,
            TimerKind::Vibrate => &mut self.vibrate,
        }
    }

    /// Whether `handle` is the live timer of this kind.
    pub fn owns(&self, kind: TimerKind, handle: TimerHandle) -> bool {
        let slot = match kind {
            TimerKind::DragAvailable => self.drag_available,
            TimerKind::RightClick => self.right_click,
            TimerKind::Vibrate => self.vibrate,
        };
        slot == Some(handle)
    }

    /// Forget a timer that just fired.
    pub fn clear(&mut self, kind: TimerKind) {
        self.slot(kind).take();
    }

    pub fn set(&mut self, kind: TimerKind, handle: TimerHandle) {
        *self.slot(kind) = Some(handle);
    }

    /// Remove one timer from the queue.
    pub fn cancel(&mut self, kind: TimerKind, queue: &mut TimerQueue<TimerTask>) {
        if let Some(handle) = self.slot(kind).take() {
            queue.cancel(handle);
        }
    }

    /// Remove every timer from the queue.
    pub fn cancel_all(&mut self, queue: &mut TimerQueue<TimerTask>) {
        for kind in [
            TimerKind::DragAvailable,
            TimerKind::RightClick,
            TimerKind::Vibrate,
        ] {
            self.cancel(kind, queue);
        }
    }
}

/// Live state for one touch, from touch-start to touch-end/cancel.
#[derive(Debug)]
pub struct TouchSession<T> {
    pub id: TouchId,
    pub start_time: Millis,
    pub start: Point,
    /// Most recent sample position.
    pub last: Point,
    pub mode: TouchMode,
    pub has_moved: bool,
    pub has_vibrated: bool,
    /// Element under the touch at start. Every emission of the session
    /// goes here, like mouse capture.
    pub target: Option<T>,
    pub timers: SessionTimers,
}

impl<T> TouchSession<T> {
    pub fn new(id: TouchId, at: Point, time: Millis, target: Option<T>) -> Self {
        Self {
            id,
            start_time: time,
            start: at,
            last: at,
            mode: TouchMode::Pending,
            has_moved: false,
            has_vibrated: false,
            target,
            timers: SessionTimers::default(),
        }
    }

    /// Distance from the start position to `at`.
    pub fn displacement(&self, at: Point) -> f64 {
        self.start.distance(at)
    }

    /// Milliseconds since touch-start, saturating for out-of-order samples.
    pub fn elapsed(&self, now: Millis) -> Millis {
        now.saturating_sub(self.start_time)
    }
}
