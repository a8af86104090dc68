// Keyhint Pure Rust uinput Output Layer
// Virtual keyboard that receives injected text

use evdev::uinput::VirtualDeviceBuilder;
use evdev::{AttributeSet, EventType, InputEvent};

use super::sink::{InjectionError, KeySink};
use super::state::PressedKeyState;
use crate::input::evdev_from_virtual_key;
use crate::{Action, VirtualKey};

/// Name the capture side uses to skip our own events
pub const VIRTUAL_DEVICE_NAME: &str = "Keyhint (virtual) Keyboard";

/// Virtual uinput keyboard
pub struct VirtualDevice {
    device: evdev::uinput::VirtualDevice,
    pressed_keys: PressedKeyState,
}

impl VirtualDevice {
    /// Create a new virtual uinput device
    pub fn new() -> Result<Self, InjectionError> {
        // Advertise all standard keyboard keys (0-255)
        let mut keys = AttributeSet::new();
        for code in 0..256u16 {
            keys.insert(evdev::Key::new(code));
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(|e: std::io::Error| InjectionError::DeviceCreation(e.to_string()))?
            .name(VIRTUAL_DEVICE_NAME)
            .with_keys(&keys)
            .map_err(|e: std::io::Error| InjectionError::DeviceCreation(e.to_string()))?
            .build()
            .map_err(|e: std::io::Error| InjectionError::DeviceCreation(e.to_string()))?;

        Ok(Self {
            device,
            pressed_keys: PressedKeyState::new(),
        })
    }

    fn write_key_event(&mut self, key: VirtualKey, action: Action) -> Result<(), InjectionError> {
        let code = evdev_from_virtual_key(key).ok_or(InjectionError::UnmappedKey(key))?;
        let key_event = InputEvent::new(EventType::KEY, code, action.to_i32());
        // SYN event is required for the kernel to process the key event
        let syn_event = InputEvent::new(EventType::SYNCHRONIZATION, 0, 0);

        self.device
            .emit(&[key_event, syn_event])
            .map_err(|e: std::io::Error| InjectionError::WriteError(e.to_string()))?;

        match action {
            Action::Press => self.pressed_keys.add(key),
            Action::Release => self.pressed_keys.remove(key),
            Action::Repeat => {}
        }
        Ok(())
    }

    pub fn is_key_pressed(&self, key: VirtualKey) -> bool {
        self.pressed_keys.is_pressed(key)
    }

    /// Release held keys and close the device
    pub fn close(mut self) -> Result<(), InjectionError> {
        self.release_all()
    }
}

impl KeySink for VirtualDevice {
    fn send_key(&mut self, key: VirtualKey, action: Action) -> Result<(), InjectionError> {
        self.write_key_event(key, action)
    }

    fn release_all(&mut self) -> Result<(), InjectionError> {
        for key in self.pressed_keys.get_all().into_iter().rev() {
            self.write_key_event(key, Action::Release)?;
        }
        Ok(())
    }
}
