// Keyhint Session
// Owned processing context: every normalized event enters here

use std::time::Duration;

use crate::config::Config;
use crate::event_log::{EventLog, EventLogError};
use crate::history::{EventHistory, HistorySummary};
use crate::input::{is_shutdown_key, InputEvent, KeyEvent, MouseButtonEvent};
use crate::modifier::{ModifierState, ModifierStateTracker};
use crate::output::{KeySink, TextInjector};
use crate::special::{
    special_key_label, Gesture, GestureOutcome, GestureRouter, SpecialAction,
    SpecialKeyStateMachine,
};
use crate::suggestion::{
    AcceptOutcome, GenerationOutcome, ProcessGenerator, SuggestionCoordinator,
    SuggestionGenerator, SuggestionOverlay, LOG_FILE_ENV,
};

/// Generator for `config`, told where the event log lives.
///
/// Warns when the log is not in the directory the command runs in, since
/// scripts that read `input_events.txt` from their own directory would miss it.
pub fn process_generator(config: &Config) -> ProcessGenerator {
    let log_file = if config.log_file.is_absolute() {
        config.log_file.clone()
    } else {
        std::env::current_dir()
            .map(|dir| dir.join(&config.log_file))
            .unwrap_or_else(|_| config.log_file.clone())
    };

    let generator = ProcessGenerator::new(config.generator.clone());
    if let Some(run_dir) = generator.run_dir() {
        if log_file.parent() != Some(run_dir.as_path()) {
            log::warn!(
                "Event log {} is outside the generator directory {}; its path is exported as {}",
                log_file.display(),
                run_dir.display(),
                LOG_FILE_ENV
            );
        }
    }
    generator.with_log_file(log_file)
}

/// What the caller's loop should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    EventLog(#[from] EventLogError),

    #[error("Failed to start generation worker: {0}")]
    Worker(#[from] std::io::Error),
}

pub struct Session {
    modifiers: ModifierStateTracker,
    special_keys: SpecialKeyStateMachine,
    router: GestureRouter,
    coordinator: SuggestionCoordinator,
    event_log: EventLog,
    history: EventHistory,
}

impl Session {
    pub fn new(
        event_log: EventLog,
        special_keys: SpecialKeyStateMachine,
        coordinator: SuggestionCoordinator,
    ) -> Self {
        Self {
            modifiers: ModifierStateTracker::new(),
            special_keys,
            router: GestureRouter::with_defaults(),
            coordinator,
            event_log,
            history: EventHistory::new(),
        }
    }

    /// Build a session from configuration and clear the event log.
    ///
    /// The generator runs with the configured command; text goes to `sink`.
    pub fn from_config(
        config: &Config,
        sink: impl KeySink + Send + 'static,
        overlay: impl SuggestionOverlay + 'static,
    ) -> Result<Self, SessionError> {
        Self::with_generator(config, process_generator(config), sink, overlay)
    }

    pub fn with_generator(
        config: &Config,
        generator: impl SuggestionGenerator,
        sink: impl KeySink + Send + 'static,
        overlay: impl SuggestionOverlay + 'static,
    ) -> Result<Self, SessionError> {
        let event_log = EventLog::new(&config.log_file);
        event_log.clear()?;

        let injector = TextInjector::with_delay(sink, config.key_delay());
        let coordinator = SuggestionCoordinator::new(generator, overlay, injector)?;
        let special_keys = SpecialKeyStateMachine::with_keys(&config.special_keys);
        Ok(Self::new(event_log, special_keys, coordinator))
    }

    /// Seed caps-lock from the OS indicator
    pub fn with_caps_lock(mut self, caps_lock_on: bool) -> Self {
        self.modifiers = ModifierStateTracker::with_caps_lock(caps_lock_on);
        self
    }

    pub fn with_router(mut self, router: GestureRouter) -> Self {
        self.router = router;
        self
    }

    pub fn modifier_state(&self) -> ModifierState {
        self.modifiers.state()
    }

    pub fn special_keys(&self) -> &SpecialKeyStateMachine {
        &self.special_keys
    }

    pub fn coordinator(&self) -> &SuggestionCoordinator {
        &self.coordinator
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn history(&self) -> &EventHistory {
        &self.history
    }

    pub fn summary(&self) -> HistorySummary {
        self.history.summary()
    }

    /// Process one normalized event
    pub fn process(&mut self, event: InputEvent) -> Control {
        match event {
            InputEvent::Keyboard(key) => self.process_key(&key),
            InputEvent::Mouse(button) => {
                self.process_mouse_button(&button);
                Control::Continue
            }
        }
    }

    fn process_key(&mut self, event: &KeyEvent) -> Control {
        let modifiers = self.modifiers.update(event);

        if let Err(e) =
            self.event_log
                .log_keyboard(event.timestamp, event.virtual_key, event.is_key_up, &modifiers)
        {
            log::warn!("Dropping key event: {}", e);
        }
        let is_special = self.special_keys.is_special_key(event.virtual_key);
        self.history.record(&InputEvent::Keyboard(*event), is_special);

        if is_shutdown_key(event) {
            log::info!("Escape pressed, shutting down");
            return Control::Shutdown;
        }

        if !event.is_key_up {
            let is_accept_key = self.router.is_accept_key(event.virtual_key, event.side);
            self.coordinator.on_key_down(is_accept_key);
        }

        match self.special_keys.process(event) {
            Some(GestureOutcome::Fired(gesture)) => self.dispatch(&gesture),
            Some(GestureOutcome::Suppressed(gesture)) => {
                log::info!(
                    "{} used in a key combination, no action",
                    special_key_label(gesture.key)
                );
            }
            None => {}
        }

        Control::Continue
    }

    fn process_mouse_button(&mut self, event: &MouseButtonEvent) {
        if let Err(e) = self.event_log.log_mouse_button(
            event.timestamp,
            event.button,
            event.is_button_up,
            event.cursor_position,
        ) {
            log::warn!("Dropping mouse event: {}", e);
        }
        self.history.record(&InputEvent::Mouse(*event), false);
    }

    fn dispatch(&mut self, gesture: &Gesture) {
        let action = self.router.route(gesture);
        log::debug!(
            "{} ({}) tapped for {}ms -> {}",
            special_key_label(gesture.key),
            gesture.side,
            gesture.duration() / 1000,
            action
        );

        match action {
            SpecialAction::GenerateSuggestion => {
                self.coordinator.on_generate_gesture();
            }
            SpecialAction::AcceptSuggestion => match self.coordinator.on_accept_gesture() {
                Ok(AcceptOutcome::Injected(report)) => {
                    log::info!("Injected {} characters", report.typed);
                }
                Ok(AcceptOutcome::NothingPending) => {}
                Err(e) => log::error!("Failed to inject suggestion: {}", e),
            },
            SpecialAction::Placeholder => {
                log::info!(
                    "{} tapped alone, no action bound",
                    special_key_label(gesture.key)
                );
            }
        }
    }

    /// Apply a finished background generation, if any
    pub fn poll(&mut self) -> Option<GenerationOutcome> {
        self.coordinator.poll_completed()
    }

    /// Block up to `timeout` for a running generation
    pub fn wait_for_generation(&mut self, timeout: Duration) -> Option<GenerationOutcome> {
        self.coordinator.wait_completed(timeout)
    }

    /// Cancel background work and release any held output keys
    pub fn shutdown(&mut self) {
        self.coordinator.cancel();
        if let Err(e) = self.coordinator.injector().release_all() {
            log::warn!("Failed to release output keys: {}", e);
        }
    }
}
