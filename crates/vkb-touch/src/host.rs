//! The engine's view of its embedding.
//!
//! A `PointerHost` resolves elements, realizes synthetic events, and
//! drives haptics. It also supplies modifier snapshots, queried fresh for
//! every emitted event.

use thiserror::Error;
use vkb_core::{Millis, ModifierStateProvider, Point, SyntheticEventSpec};

/// A haptic request the platform did not honor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HapticError {
    #[error("haptic feedback is not supported on this platform")]
    Unsupported,

    #[error("haptic feedback request was denied: {0}")]
    Denied(String),
}

/// Collaborator that realizes the engine's output.
pub trait PointerHost: ModifierStateProvider {
    /// Handle to a dispatch target (a DOM element, a widget id, ...).
    type Target: Clone;

    /// The element under `at`, if any.
    fn element_at(&self, at: Point) -> Option<Self::Target>;

    /// Whether `target` can still receive events. Detached targets are
    /// skipped for that one emission.
    fn is_attached(&self, _target: &Self::Target) -> bool {
        true
    }

    /// Construct and dispatch the concrete event.
    fn dispatch(&mut self, target: &Self::Target, event: SyntheticEventSpec);

    /// Request one haptic pulse.
    fn vibrate(&mut self, duration_ms: Millis) -> Result<(), HapticError>;
}
