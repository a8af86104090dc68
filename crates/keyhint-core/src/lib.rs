// Keyhint Core Library
// Gesture detection, event logging and suggestion injection

pub mod action;
pub mod charmap;
pub mod config;
pub mod event_log;
pub mod history;
pub mod input;
pub mod key;
pub mod modifier;
pub mod output;
pub mod session;
pub mod special;
pub mod suggestion;

// Capture loop needs evdev
#[cfg(feature = "pure-rust")]
pub mod event;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use event_log::{EventLog, EventLogError, DEFAULT_LOG_FILE};
pub use history::{EventHistory, HistorySummary};
pub use input::{
    is_keyboard, is_pointer, is_shutdown_key, is_virtual_device, matches_device_filter,
    DeviceCapabilities, InputEvent, KeyEvent, MouseButton, MouseButtonEvent,
};
pub use key::{Side, VirtualKey};
pub use modifier::{ModifierState, ModifierStateTracker};
pub use output::{InjectionError, InjectionReport, KeySink, RecordingSink, TextInjector};
pub use session::{Control, Session, SessionError};
pub use special::{
    special_key_label, Gesture, GestureOutcome, GestureRouter, SpecialAction,
    SpecialKeyStateMachine,
};
pub use suggestion::{
    AcceptOutcome, GeneratorConfig, GeneratorError, LogOverlay, ProcessGenerator,
    SuggestionCoordinator, SuggestionGenerator, SuggestionOverlay,
};

#[cfg(feature = "pure-rust")]
pub use event::{DeviceInfo, DeviceKind, EventLoop, EventLoopError, EventLoopResult};
#[cfg(feature = "pure-rust")]
pub use output::{VirtualDevice, VIRTUAL_DEVICE_NAME};
