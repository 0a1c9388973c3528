pub mod config;
pub mod event;
pub mod modifiers;

pub use config::{ConfigError, GestureConfig, Millis};
pub use event::{EventKind, SyntheticEventSpec};
pub use modifiers::{
    KeyState, ModifierKey, ModifierSnapshot, ModifierStateProvider, VirtualModifiers,
};

// Re-export kurbo's point so downstream crates don't need a direct dependency
pub use kurbo::Point;
