// Keyhint Output Layer - Key Sinks
// Where synthetic key transitions go

use std::sync::Arc;

use parking_lot::Mutex;

use super::state::PressedKeyState;
use crate::{Action, VirtualKey};

#[derive(Debug, thiserror::Error)]
pub enum InjectionError {
    #[error("Failed to create virtual device: {0}")]
    DeviceCreation(String),

    #[error("Failed to write event: {0}")]
    WriteError(String),

    #[error("No output key code for {0}")]
    UnmappedKey(VirtualKey),
}

/// Receives synthetic key transitions.
///
/// Implementations deliver one transition per call and report failure
/// immediately; callers stop at the first error.
pub trait KeySink {
    fn send_key(&mut self, key: VirtualKey, action: Action) -> Result<(), InjectionError>;

    /// Release everything still held. Default does nothing.
    fn release_all(&mut self) -> Result<(), InjectionError> {
        Ok(())
    }
}

impl<S: KeySink + ?Sized> KeySink for Box<S> {
    fn send_key(&mut self, key: VirtualKey, action: Action) -> Result<(), InjectionError> {
        (**self).send_key(key, action)
    }

    fn release_all(&mut self) -> Result<(), InjectionError> {
        (**self).release_all()
    }
}

#[derive(Debug, Default)]
struct Recording {
    events: Vec<(VirtualKey, Action)>,
    pressed: PressedKeyState,
    remaining_before_failure: Option<usize>,
}

/// In-memory sink. Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `count` transitions, then fail every following one
    pub fn failing_after(count: usize) -> Self {
        let sink = Self::new();
        sink.inner.lock().remaining_before_failure = Some(count);
        sink
    }

    pub fn events(&self) -> Vec<(VirtualKey, Action)> {
        self.inner.lock().events.clone()
    }

    pub fn held_keys(&self) -> Vec<VirtualKey> {
        self.inner.lock().pressed.get_all()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.events.clear();
        inner.pressed.clear();
    }
}

impl KeySink for RecordingSink {
    fn send_key(&mut self, key: VirtualKey, action: Action) -> Result<(), InjectionError> {
        let mut inner = self.inner.lock();
        if let Some(remaining) = inner.remaining_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(InjectionError::WriteError(format!(
                    "rejected {} {}",
                    key, action
                )));
            }
            *remaining -= 1;
        }
        match action {
            Action::Press => inner.pressed.add(key),
            Action::Release => inner.pressed.remove(key),
            Action::Repeat => {}
        }
        inner.events.push((key, action));
        Ok(())
    }

    fn release_all(&mut self) -> Result<(), InjectionError> {
        for key in self.held_keys().into_iter().rev() {
            self.send_key(key, Action::Release)?;
        }
        Ok(())
    }
}
