//! Trace replay for debugging gesture recognition off-device.
//!
//! A trace is a JSON document with optional config and modifier overrides
//! and a list of samples:
//!
//! ```json
//! {
//!   "config": { "dragThresholdTimeMs": 300 },
//!   "modifiers": { "ctrl": false, "alt": false, "shift": true, "meta": false },
//!   "samples": [
//!     { "kind": "start", "id": 0, "x": 10, "y": 10, "t": 0 },
//!     { "kind": "end", "id": 0, "x": 10, "y": 10, "t": 120 }
//!   ]
//! }
//! ```
//!
//! Targets are named after the grid cell under the touch, so traces can be
//! checked without a real element tree.

use crate::engine::TouchEngine;
use crate::host::{HapticError, PointerHost};
use crate::input::TouchInput;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use vkb_core::{
    ConfigError, GestureConfig, Millis, ModifierSnapshot, ModifierStateProvider, Point,
    SyntheticEventSpec,
};

/// Side of a grid cell in the replay host.
pub const DEFAULT_CELL_SIZE: f64 = 50.0;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid trace JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A recorded touch session script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Trace {
    pub config: GestureConfig,
    pub modifiers: ModifierSnapshot,
    pub samples: Vec<TouchInput>,
}

impl Trace {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let trace: Self = serde_json::from_str(json)?;
        trace.config.validate()?;
        Ok(trace)
    }
}

/// One realized event and where it went.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatched {
    pub target: String,
    #[serde(flatten)]
    pub event: SyntheticEventSpec,
}

/// Host that resolves points to named grid cells and records output.
#[derive(Debug)]
pub struct GridHost {
    cell_size: f64,
    pub modifiers: ModifierSnapshot,
    /// Cells treated as removed from the document.
    pub detached: HashSet<String>,
    pub haptics_supported: bool,
    pub dispatched: Vec<Dispatched>,
    pub pulses: Vec<Millis>,
}

impl Default for GridHost {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl GridHost {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            modifiers: ModifierSnapshot::NONE,
            detached: HashSet::new(),
            haptics_supported: true,
            dispatched: Vec::new(),
            pulses: Vec::new(),
        }
    }

    /// Name of the cell containing `at`, or `None` off-grid (negative).
    pub fn cell_name(&self, at: Point) -> Option<String> {
        if at.x < 0.0 || at.y < 0.0 {
            return None;
        }
        let col = (at.x / self.cell_size).floor() as u64;
        let row = (at.y / self.cell_size).floor() as u64;
        Some(format!("cell-{col}-{row}"))
    }
}

impl ModifierStateProvider for GridHost {
    fn snapshot(&self) -> ModifierSnapshot {
        self.modifiers
    }
}

impl PointerHost for GridHost {
    type Target = String;

    fn element_at(&self, at: Point) -> Option<String> {
        self.cell_name(at)
    }

    fn is_attached(&self, target: &String) -> bool {
        !self.detached.contains(target)
    }

    fn dispatch(&mut self, target: &String, event: SyntheticEventSpec) {
        self.dispatched.push(Dispatched {
            target: target.clone(),
            event,
        });
    }

    fn vibrate(&mut self, duration_ms: Millis) -> Result<(), HapticError> {
        if !self.haptics_supported {
            return Err(HapticError::Unsupported);
        }
        self.pulses.push(duration_ms);
        Ok(())
    }
}

/// Run every sample of `trace` through a fresh engine.
///
/// Timers still pending after the last sample are run, so a trace that
/// ends with a held finger still produces its context menu.
pub fn run_trace(trace: &Trace, host: &mut GridHost) -> Vec<Dispatched> {
    host.modifiers = trace.modifiers;
    let mut engine = TouchEngine::new(trace.config.clone());
    for sample in &trace.samples {
        engine.handle(host, *sample);
    }
    let mut flushed = 0;
    while let Some(deadline) = engine.next_deadline() {
        flushed += engine.advance(host, deadline).len();
    }
    log::debug!(
        "replayed {} samples: {} events ({flushed} from trailing timers)",
        trace.samples.len(),
        host.dispatched.len(),
    );
    host.dispatched.clone()
}
