// Keyhint Event Handling
// evdev capture loop

#[cfg(feature = "pure-rust")]
pub mod r#loop;

#[cfg(feature = "pure-rust")]
pub use r#loop::{DeviceInfo, DeviceKind, EventLoop, EventLoopError, EventLoopResult};
