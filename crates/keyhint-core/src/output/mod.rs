// Keyhint Output Layer
// Synthetic key output and text injection

mod injector;
mod sink;
mod state;

#[cfg(feature = "pure-rust")]
mod uinput;

pub use injector::{InjectionReport, TextInjector, DEFAULT_KEY_DELAY};
pub use sink::{InjectionError, KeySink, RecordingSink};
pub use state::PressedKeyState;

#[cfg(feature = "pure-rust")]
pub use uinput::{VirtualDevice, VIRTUAL_DEVICE_NAME};
