// Keyhint Input Layer
// Normalized events, OS boundary translation and device selection

mod device;
mod event;
mod filter;
pub mod translate;

pub use device::{is_keyboard, is_pointer, is_virtual_device, DeviceCapabilities};
pub use event::{is_shutdown_key, InputEvent, KeyEvent, MouseButton, MouseButtonEvent};
pub use filter::matches_device_filter;
pub use translate::{
    evdev_from_virtual_key, mouse_button_from_evdev, virtual_key_from_evdev, CursorTracker,
};
