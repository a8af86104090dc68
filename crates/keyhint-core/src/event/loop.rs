// Keyhint Pure Rust Event Loop
// Non-grabbing evdev capture of keyboards and pointers

use std::os::unix::io::AsRawFd;
use std::time::Instant;

use evdev::{Device, EventType, LedType, RelativeAxisType};

use crate::input::{
    is_keyboard, is_pointer, is_virtual_device, matches_device_filter, mouse_button_from_evdev,
    virtual_key_from_evdev, CursorTracker, DeviceCapabilities, InputEvent, KeyEvent,
    MouseButtonEvent,
};
use crate::output::VIRTUAL_DEVICE_NAME;
use crate::Action;

/// Result type for event loop operations
pub type EventLoopResult<T> = Result<T, EventLoopError>;

/// Errors that can occur in event loop
#[derive(Debug, thiserror::Error)]
pub enum EventLoopError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Kind of capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum DeviceKind {
    Keyboard,
    Pointer,
}

/// Device information for listing devices
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub path: Option<String>,
    pub kind: DeviceKind,
}

fn capabilities(device: &Device) -> DeviceCapabilities {
    let has_ev_key = device.supported_events().contains(EventType::KEY);
    let supported_keys = device
        .supported_keys()
        .map(|keys| keys.iter().map(|k| k.code()).collect())
        .unwrap_or_default();
    DeviceCapabilities::new(has_ev_key, supported_keys)
}

fn device_kind(device: &Device) -> Option<DeviceKind> {
    let caps = capabilities(device);
    if is_keyboard(&caps) {
        Some(DeviceKind::Keyboard)
    } else if is_pointer(&caps) {
        Some(DeviceKind::Pointer)
    } else {
        None
    }
}

/// Observes keyboards and pointers without grabbing them, so input still
/// reaches the focused application.
///
/// Raw evdev events are normalized here: key codes become virtual keys
/// with a side, pointer motion updates the tracked cursor and every event
/// gets a monotonic microsecond timestamp.
pub struct EventLoop {
    devices: Vec<Device>,
    poll_fds: Vec<libc::pollfd>,
    cursor: CursorTracker,
    epoch: Instant,
}

impl EventLoop {
    /// Capture every keyboard and pointer device
    pub fn new() -> EventLoopResult<Self> {
        Self::new_filtered(&[])
    }

    /// Capture devices honoring explicit filter names/paths
    pub fn new_filtered(filter_names: &[String]) -> EventLoopResult<Self> {
        let devices = Self::find_devices(filter_names)?;
        let poll_fds = Self::create_poll_fds(&devices);
        Ok(Self {
            devices,
            poll_fds,
            cursor: CursorTracker::default(),
            epoch: Instant::now(),
        })
    }

    /// Clamp tracked cursor positions to a screen size
    pub fn with_screen_size(mut self, width: i32, height: i32) -> Self {
        self.cursor = CursorTracker::new(width, height);
        self
    }

    fn create_poll_fds(devices: &[Device]) -> Vec<libc::pollfd> {
        devices
            .iter()
            .map(|d| libc::pollfd {
                fd: d.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            })
            .collect()
    }

    /// List keyboards and pointers that would be captured
    pub fn list_devices() -> EventLoopResult<Vec<DeviceInfo>> {
        let mut devices_info = Vec::new();

        for (path, device) in evdev::enumerate() {
            let name = device.name().unwrap_or("Unknown").to_string();
            if is_virtual_device(&name, VIRTUAL_DEVICE_NAME) {
                continue;
            }
            if let Some(kind) = device_kind(&device) {
                devices_info.push(DeviceInfo {
                    index: devices_info.len(),
                    name,
                    path: path.to_str().map(|s| s.to_string()),
                    kind,
                });
            }
        }

        if devices_info.is_empty() {
            return Err(EventLoopError::DeviceNotFound(
                "No keyboard or pointer devices found".to_string(),
            ));
        }

        Ok(devices_info)
    }

    fn find_devices(filter_names: &[String]) -> EventLoopResult<Vec<Device>> {
        let mut devices = Vec::new();

        for (path, device) in evdev::enumerate() {
            let device_name = device.name().unwrap_or("Unknown");
            let device_path = path.to_str().unwrap_or_default();
            let is_input_source = device_kind(&device).is_some();
            let is_virtual = is_virtual_device(device_name, VIRTUAL_DEVICE_NAME);

            if matches_device_filter(
                device_name,
                device_path,
                filter_names,
                is_input_source,
                is_virtual,
            ) {
                log::debug!("Capturing {} ({})", device_name, device_path);
                devices.push(device);
            }
        }

        if devices.is_empty() {
            return Err(EventLoopError::DeviceNotFound(
                "No keyboard or pointer devices found".to_string(),
            ));
        }

        Ok(devices)
    }

    /// Caps-lock indicator of any captured keyboard
    pub fn caps_lock_on(&self) -> bool {
        self.devices.iter().any(|device| {
            device
                .get_led_state()
                .map(|leds| leds.contains(LedType::LED_CAPSL))
                .unwrap_or(false)
        })
    }

    /// Microseconds since the loop was created
    fn timestamp(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }

    /// Normalize one raw evdev event.
    ///
    /// Returns `None` for events that are not logged (motion, sync, scroll,
    /// unknown buttons).
    pub fn translate(&mut self, event: &evdev::InputEvent) -> Option<InputEvent> {
        match event.event_type() {
            EventType::KEY => {
                let code = event.code();
                let value = event.value();
                let position = self.cursor.position();

                if let Some(button) = mouse_button_from_evdev(code) {
                    // Buttons do not auto-repeat
                    if value > 1 {
                        return None;
                    }
                    return Some(InputEvent::Mouse(MouseButtonEvent {
                        timestamp: self.timestamp(),
                        button,
                        is_button_up: value == 0,
                        cursor_position: position,
                    }));
                }
                if code >= 0x100 {
                    return None;
                }

                // Auto-repeat (2) is delivered as a key-down flagged as repeat
                let action = Action::from_i32(value)?;
                let (key, side) = virtual_key_from_evdev(code);
                Some(InputEvent::Keyboard(
                    KeyEvent::from_action(self.timestamp(), key, action)
                        .with_side(side)
                        .at(position),
                ))
            }
            EventType::RELATIVE => {
                match RelativeAxisType(event.code()) {
                    RelativeAxisType::REL_X => self.cursor.move_by(event.value(), 0),
                    RelativeAxisType::REL_Y => self.cursor.move_by(0, event.value()),
                    _ => {}
                }
                None
            }
            _ => None,
        }
    }

    /// Wait up to `timeout_ms` and return normalized events.
    ///
    /// EINTR is treated like a timeout so a signal handler can stop the
    /// caller's loop.
    pub fn poll_input_events(&mut self, timeout_ms: i32) -> EventLoopResult<Vec<InputEvent>> {
        let mut raw_events = Vec::new();

        let poll_result = unsafe {
            libc::poll(
                self.poll_fds.as_mut_ptr(),
                self.poll_fds.len() as libc::nfds_t,
                timeout_ms,
            )
        };

        if poll_result < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                return Ok(Vec::new());
            }
            return Err(EventLoopError::Io(err));
        }

        if poll_result == 0 {
            return Ok(Vec::new());
        }

        let closed = closed_fd_indices(&self.poll_fds);
        for (i, device) in self.devices.iter_mut().enumerate() {
            if closed.contains(&i) {
                continue;
            }
            if self.poll_fds[i].revents & libc::POLLIN != 0 {
                match device
                    .fetch_events()
                    .map(|device_events| raw_events.extend(device_events))
                {
                    Ok(()) => {}
                    Err(e) => log::warn!(
                        "Failed to read from {}: {}",
                        device.name().unwrap_or("Unknown"),
                        e
                    ),
                }
            }
        }

        for &i in closed.iter().rev() {
            let device = self.devices.remove(i);
            self.poll_fds.remove(i);
            log::warn!(
                "Input device {} disconnected, no longer capturing it",
                device.name().unwrap_or("Unknown")
            );
        }
        if !closed.is_empty() && self.devices.is_empty() {
            return Err(EventLoopError::DeviceNotFound(
                "all input devices disconnected".to_string(),
            ));
        }

        Ok(raw_events
            .iter()
            .filter_map(|event| self.translate(event))
            .collect())
    }

    pub fn device_names(&self) -> Vec<String> {
        self.devices
            .iter()
            .map(|d| d.name().unwrap_or("Unknown").to_string())
            .collect()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Build a loop with no devices, for translation tests
    #[cfg(test)]
    fn detached() -> Self {
        Self {
            devices: Vec::new(),
            poll_fds: Vec::new(),
            cursor: CursorTracker::new(100, 100),
            epoch: Instant::now(),
        }
    }
}

/// Indices of descriptors that hung up or failed; poll reports them forever
fn closed_fd_indices(poll_fds: &[libc::pollfd]) -> Vec<usize> {
    poll_fds
        .iter()
        .enumerate()
        .filter(|(_, fd)| fd.revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0)
        .map(|(i, _)| i)
        .collect()
}
