//! Synthetic pointer events.
//!
//! `SyntheticEventSpec` is the dispatch-ready description of a mouse event
//! the engine wants realized. It carries plain data only; turning it into a
//! platform event object is the dispatcher's job.

use crate::modifiers::ModifierSnapshot;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `MouseEvent.button` for the primary (left) button.
pub const BUTTON_PRIMARY: i16 = 0;
/// `MouseEvent.button` for the secondary (right) button.
pub const BUTTON_SECONDARY: i16 = 2;

/// `MouseEvent.buttons` bitmask values.
pub const BUTTONS_NONE: u16 = 0;
pub const BUTTONS_PRIMARY: u16 = 1;
pub const BUTTONS_SECONDARY: u16 = 2;

/// The DOM event type of a synthetic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    MouseDown,
    MouseUp,
    MouseMove,
    Click,
    DblClick,
    ContextMenu,
}

impl EventKind {
    /// The DOM event type string (`"mousedown"`, `"dblclick"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::ContextMenu => "contextmenu",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dispatch-ready mouse event descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticEventSpec {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub x: f64,
    pub y: f64,
    /// Button that changed state (`MouseEvent.button`).
    pub button: i16,
    /// Buttons held after this event (`MouseEvent.buttons`).
    pub buttons: u16,
    /// Click count (`UIEvent.detail`).
    pub detail: i32,
    pub modifiers: ModifierSnapshot,
}

impl SyntheticEventSpec {
    /// Primary-button event at `at` with no buttons held and `detail = 0`.
    pub fn new(kind: EventKind, at: Point, modifiers: ModifierSnapshot) -> Self {
        Self {
            kind,
            x: at.x,
            y: at.y,
            button: BUTTON_PRIMARY,
            buttons: BUTTONS_NONE,
            detail: 0,
            modifiers,
        }
    }

    pub fn with_button(mut self, button: i16, buttons: u16) -> Self {
        self.button = button;
        self.buttons = buttons;
        self
    }

    pub fn with_detail(mut self, detail: i32) -> Self {
        self.detail = detail;
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
