pub mod correlator;
pub mod engine;
pub mod host;
pub mod input;
pub mod replay;
pub mod session;
pub mod timer;
pub mod vibration;

pub use correlator::{ClickRecord, DoubleClickCorrelator};
pub use engine::{Emitted, TouchEngine};
pub use host::{HapticError, PointerHost};
pub use input::TouchInput;
pub use session::{TouchId, TouchMode, TouchSession};
pub use timer::{TimerHandle, TimerQueue};
pub use vibration::VibrationScheduler;
