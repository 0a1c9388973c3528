//! Gesture thresholds for touch-to-mouse emulation.
//!
//! Loaded from the toolkit's JSON options using the same camelCase names
//! the host page uses. Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Milliseconds on the host's touch-event clock.
pub type Millis = u64;

// ─── Config ───────────────────────────────────────────────────────────────

/// Timing and distance thresholds for the gesture translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GestureConfig {
    /// Displacement above which a touch counts as moved. Default: **10**.
    pub move_threshold_distance: f64,

    /// Hold time after which a moving touch becomes a drag. Default: **400ms**.
    pub drag_threshold_time_ms: Millis,

    /// Hold time after which a stationary touch becomes a right click. Default: **800ms**.
    pub right_click_threshold_time_ms: Millis,

    /// Maximum gap between two taps that form a double click. Default: **500ms**.
    pub double_click_window_ms: Millis,

    /// Maximum distance between two taps that form a double click. Default: **10**.
    pub double_click_distance_threshold: f64,

    /// Hold time before the long-press haptic pulse. Default: **500ms**.
    pub vibrate_threshold_time_ms: Millis,

    /// Length of the haptic pulse. Default: **30ms**.
    pub vibrate_duration_ms: Millis,

    pub vibration_enabled: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            move_threshold_distance: 10.0,
            drag_threshold_time_ms: 400,
            right_click_threshold_time_ms: 800,
            double_click_window_ms: 500,
            double_click_distance_threshold: 10.0,
            vibrate_threshold_time_ms: 500,
            vibrate_duration_ms: 30,
            vibration_enabled: true,
        }
    }
}

/// Errors from loading a [`GestureConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid gesture config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid gesture config: `{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl GestureConfig {
    /// Parse and validate a JSON options object.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!("loaded gesture config: {config:?}");
        Ok(config)
    }

    /// Check that thresholds are usable.
    ///
    /// The drag window is `(drag, right_click]`, so the drag threshold must
    /// sit strictly below the right-click threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.move_threshold_distance.is_finite() && self.move_threshold_distance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "moveThresholdDistance",
                reason: "must be a finite, non-negative distance",
            });
        }
        if !(self.double_click_distance_threshold.is_finite()
            && self.double_click_distance_threshold >= 0.0)
        {
            return Err(ConfigError::Invalid {
                field: "doubleClickDistanceThreshold",
                reason: "must be a finite, non-negative distance",
            });
        }
        if self.drag_threshold_time_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "dragThresholdTimeMs",
                reason: "must be greater than zero",
            });
        }
        if self.right_click_threshold_time_ms <= self.drag_threshold_time_ms {
            return Err(ConfigError::Invalid {
                field: "rightClickThresholdTimeMs",
                reason: "must be greater than dragThresholdTimeMs",
            });
        }
        if self.vibration_enabled && self.vibrate_duration_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "vibrateDurationMs",
                reason: "must be greater than zero when vibration is enabled",
            });
        }
        Ok(())
    }
}
