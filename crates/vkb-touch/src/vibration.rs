//! Long-press haptic feedback.
//!
//! One short pulse per session, fired while the finger is still held
//! still. Any movement cancels it for good.

use crate::host::PointerHost;
use crate::session::{TimerKind, TimerTask, TouchMode, TouchSession};
use crate::timer::TimerQueue;
use vkb_core::{GestureConfig, Millis};

#[derive(Debug, Clone)]
pub struct VibrationScheduler {
    enabled: bool,
    delay_ms: Millis,
    duration_ms: Millis,
}

impl VibrationScheduler {
    pub fn new(enabled: bool, delay_ms: Millis, duration_ms: Millis) -> Self {
        Self {
            enabled,
            delay_ms,
            duration_ms,
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(
            config.vibration_enabled,
            config.vibrate_threshold_time_ms,
            config.vibrate_duration_ms,
        )
    }

    /// Schedule the pulse at `start_time + delay`.
    pub fn arm<T>(&self, session: &mut TouchSession<T>, queue: &mut TimerQueue<TimerTask>) {
        if !self.enabled || session.has_vibrated {
            return;
        }
        session.timers.cancel(TimerKind::Vibrate, queue);
        let handle = queue.schedule(
            session.start_time.saturating_add(self.delay_ms),
            TimerTask {
                touch: session.id,
                kind: TimerKind::Vibrate,
            },
        );
        session.timers.set(TimerKind::Vibrate, handle);
    }

    pub fn cancel<T>(&self, session: &mut TouchSession<T>, queue: &mut TimerQueue<TimerTask>) {
        session.timers.cancel(TimerKind::Vibrate, queue);
    }

    /// Run the scheduled pulse. Returns whether a pulse was requested.
    ///
    /// A denied request still marks the session as vibrated so the
    /// platform is not asked again.
    pub fn fire<H: PointerHost>(
        &self,
        session: &mut TouchSession<H::Target>,
        host: &mut H,
    ) -> bool {
        if session.has_vibrated
            || session.has_moved
            || !matches!(session.mode, TouchMode::Pending | TouchMode::RightClick)
        {
            return false;
        }
        if let Err(err) = host.vibrate(self.duration_ms) {
            log::warn!("{}: {err}", session.id);
        }
        session.has_vibrated = true;
        true
    }
}
