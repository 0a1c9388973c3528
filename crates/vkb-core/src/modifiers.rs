//! Modifier and toggle key state for the virtual keyboard.
//!
//! The on-screen keyboard has no physical keys to hold down, so modifiers
//! are sticky: tapping Shift latches it for the next key, tapping it again
//! locks it, and a third tap releases it.
//!
//! | Tap # | State | Effect |
//! |-------|-------|--------|
//! | 1 | `Latched` | active for the next non-modifier key only |
//! | 2 | `Locked` | active until tapped again |
//! | 3 | `Off` | inactive |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Point-in-time modifier state attached to every synthetic event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierSnapshot {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl ModifierSnapshot {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.meta
    }
}

/// Supplies the current modifier state on demand.
///
/// Queried once per emitted event; implementations must not assume the
/// caller caches the result.
pub trait ModifierStateProvider {
    fn snapshot(&self) -> ModifierSnapshot;
}

impl ModifierStateProvider for ModifierSnapshot {
    fn snapshot(&self) -> ModifierSnapshot {
        *self
    }
}

/// A virtual keyboard key with modifier or toggle behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    Ctrl,
    Alt,
    Shift,
    Meta,
    CapsLock,
}

impl FromStr for ModifierKey {
    type Err = String;

    /// Parse a `KeyboardEvent.key` spelling (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "control" | "ctrl" => Ok(Self::Ctrl),
            "alt" | "option" => Ok(Self::Alt),
            "shift" => Ok(Self::Shift),
            "meta" | "os" | "super" | "command" => Ok(Self::Meta),
            "capslock" => Ok(Self::CapsLock),
            _ => Err(format!("not a modifier key: {s:?}")),
        }
    }
}

/// Sticky state of a single modifier key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    #[default]
    Off,
    Latched,
    Locked,
}

impl KeyState {
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Off)
    }

    fn cycle(self) -> Self {
        match self {
            Self::Off => Self::Latched,
            Self::Latched => Self::Locked,
            Self::Locked => Self::Off,
        }
    }
}

/// Modifier/toggle key state owned by the virtual keyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualModifiers {
    pub ctrl: KeyState,
    pub alt: KeyState,
    pub shift: KeyState,
    pub meta: KeyState,
    pub caps_lock: bool,
}

impl VirtualModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a tap on a modifier key. Returns whether the key is now active.
    pub fn tap(&mut self, key: ModifierKey) -> bool {
        let state = match key {
            ModifierKey::Ctrl => &mut self.ctrl,
            ModifierKey::Alt => &mut self.alt,
            ModifierKey::Shift => &mut self.shift,
            ModifierKey::Meta => &mut self.meta,
            ModifierKey::CapsLock => {
                self.caps_lock = !self.caps_lock;
                return self.caps_lock;
            }
        };
        *state = state.cycle();
        state.is_active()
    }

    /// State of a modifier key. CapsLock reports `Locked` when on.
    pub fn state(&self, key: ModifierKey) -> KeyState {
        match key {
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
            ModifierKey::Shift => self.shift,
            ModifierKey::Meta => self.meta,
            ModifierKey::CapsLock if self.caps_lock => KeyState::Locked,
            ModifierKey::CapsLock => KeyState::Off,
        }
    }

    /// Release latched modifiers after a regular key was emitted.
    pub fn consume_latched(&mut self) {
        for state in [
            &mut self.ctrl,
            &mut self.alt,
            &mut self.shift,
            &mut self.meta,
        ] {
            if *state == KeyState::Latched {
                *state = KeyState::Off;
            }
        }
    }

    /// Clear every modifier and toggle key.
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

impl ModifierStateProvider for VirtualModifiers {
    fn snapshot(&self) -> ModifierSnapshot {
        ModifierSnapshot {
            ctrl: self.ctrl.is_active(),
            alt: self.alt.is_active(),
            shift: self.shift.is_active(),
            meta: self.meta.is_active(),
        }
    }
}
