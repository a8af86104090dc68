// Keyhint Suggestions - Workflow Coordinator
// Gesture -> background generation -> pending suggestion -> injection

use std::time::Duration;

use super::generator::{GeneratorError, SuggestionGenerator};
use super::overlay::{NoticeLevel, SuggestionOverlay};
use super::worker::{GenerationResult, GenerationWorker};
use crate::output::{InjectionError, InjectionReport, TextInjector};

/// Result of a generate gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    Submitted(u64),
    /// A generation is already running, or the worker is gone
    Rejected,
}

/// A finished generation as applied to the pending suggestion
#[derive(Debug)]
pub enum GenerationOutcome {
    Ready(String),
    Empty,
    Failed(GeneratorError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptOutcome {
    Injected(InjectionReport),
    NothingPending,
}

/// Holds at most one pending suggestion and at most one running
/// generation.
///
/// A new generate gesture is rejected while a generation is running. A
/// finished generation always replaces the pending suggestion, so the
/// latest result wins and failures leave nothing pending.
pub struct SuggestionCoordinator {
    worker: GenerationWorker,
    overlay: Box<dyn SuggestionOverlay>,
    injector: TextInjector,
    pending: Option<String>,
    in_flight: Option<u64>,
    next_id: u64,
    overlay_visible: bool,
}

impl SuggestionCoordinator {
    pub fn new(
        generator: impl SuggestionGenerator,
        overlay: impl SuggestionOverlay + 'static,
        injector: TextInjector,
    ) -> std::io::Result<Self> {
        Ok(Self {
            worker: GenerationWorker::spawn(generator)?,
            overlay: Box::new(overlay),
            injector,
            pending: None,
            in_flight: None,
            next_id: 1,
            overlay_visible: false,
        })
    }

    pub fn pending_suggestion(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn injector(&self) -> &TextInjector {
        &self.injector
    }

    pub fn on_generate_gesture(&mut self) -> GenerateOutcome {
        if let Some(id) = self.in_flight {
            log::info!("Generation #{} still running, ignoring request", id);
            self.overlay
                .notice(NoticeLevel::Info, "Suggestion is still being generated");
            return GenerateOutcome::Rejected;
        }

        let id = self.next_id;
        match self.worker.submit(id) {
            Ok(()) => {
                self.next_id += 1;
                self.in_flight = Some(id);
                log::info!("Generating suggestion #{}", id);
                GenerateOutcome::Submitted(id)
            }
            Err(e) => {
                log::error!("Cannot start generation: {}", e);
                self.overlay
                    .notice(NoticeLevel::Warning, "Suggestion generator is unavailable");
                GenerateOutcome::Rejected
            }
        }
    }

    /// Apply a finished generation if one is ready
    pub fn poll_completed(&mut self) -> Option<GenerationOutcome> {
        let result = self.worker.try_recv()?;
        Some(self.complete(result))
    }

    /// Block up to `timeout` for a running generation to finish
    pub fn wait_completed(&mut self, timeout: Duration) -> Option<GenerationOutcome> {
        let result = self.worker.recv_timeout(timeout)?;
        Some(self.complete(result))
    }

    fn complete(&mut self, result: GenerationResult) -> GenerationOutcome {
        if self.in_flight == Some(result.id) {
            self.in_flight = None;
        }
        log::debug!(
            "Generation #{} finished in {:?}",
            result.id,
            result.elapsed
        );

        match result.output {
            Err(e) => {
                self.pending = None;
                self.hide_overlay();
                self.overlay.notice(
                    NoticeLevel::Warning,
                    &format!("Suggestion generation failed: {}", e),
                );
                GenerationOutcome::Failed(e)
            }
            Ok(line) if line.is_empty() => {
                self.pending = None;
                self.hide_overlay();
                self.overlay
                    .notice(NoticeLevel::Info, "Generator returned no suggestion");
                GenerationOutcome::Empty
            }
            Ok(line) => {
                self.overlay.show(&line);
                self.overlay_visible = true;
                self.pending = Some(line.clone());
                GenerationOutcome::Ready(line)
            }
        }
    }

    /// Inject the pending suggestion, if any.
    ///
    /// The suggestion is consumed even when injection fails.
    pub fn on_accept_gesture(&mut self) -> Result<AcceptOutcome, InjectionError> {
        let Some(text) = self.pending.take() else {
            self.overlay
                .notice(NoticeLevel::Info, "No suggestion pending to accept");
            return Ok(AcceptOutcome::NothingPending);
        };
        self.hide_overlay();

        log::info!("Accepting suggestion ({} chars)", text.chars().count());
        match self.injector.send_text(&text) {
            Ok(report) => {
                if !report.is_complete() {
                    log::warn!("Skipped {} unmappable characters", report.skipped.len());
                }
                Ok(AcceptOutcome::Injected(report))
            }
            Err(e) => {
                self.overlay
                    .notice(NoticeLevel::Warning, &format!("Injection failed: {}", e));
                if let Err(release_err) = self.injector.release_all() {
                    log::error!("Failed to release held keys: {}", release_err);
                }
                Err(e)
            }
        }
    }

    /// Any key-down other than the accept key hides the overlay.
    /// The pending suggestion stays.
    pub fn on_key_down(&mut self, is_accept_key: bool) {
        if !is_accept_key {
            self.hide_overlay();
        }
    }

    fn hide_overlay(&mut self) {
        if self.overlay_visible {
            self.overlay.hide();
            self.overlay_visible = false;
        }
    }

    /// Stop a running generation; its result arrives as cancelled
    pub fn cancel(&mut self) {
        if let Some(id) = self.in_flight {
            log::info!("Cancelling generation #{}", id);
            self.worker.cancel();
        }
    }
}

impl std::fmt::Debug for SuggestionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionCoordinator")
            .field("pending", &self.pending)
            .field("in_flight", &self.in_flight)
            .field("overlay_visible", &self.overlay_visible)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::RecordingSink;
    use crate::{Action, VirtualKey};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    const WAIT: Duration = Duration::from_secs(5);

    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        Show(String),
        Hide,
        Notice(NoticeLevel),
    }

    #[derive(Clone, Default)]
    struct FakeOverlay(Arc<Mutex<Vec<Shown>>>);

    impl SuggestionOverlay for FakeOverlay {
        fn show(&mut self, text: &str) {
            self.0.lock().push(Shown::Show(text.to_string()));
        }
        fn hide(&mut self) {
            self.0.lock().push(Shown::Hide);
        }
        fn notice(&mut self, level: NoticeLevel, _message: &str) {
            self.0.lock().push(Shown::Notice(level));
        }
    }

    fn generator<F>(f: F) -> F
    where
        F: Fn(&AtomicBool) -> Result<String, GeneratorError> + Send + 'static,
    {
        f
    }

    /// Returns queued outputs in order, then empty lines
    fn scripted(outputs: Vec<Result<String, GeneratorError>>) -> impl SuggestionGenerator {
        let outputs = Mutex::new(outputs.into_iter());
        generator(move |_| outputs.lock().next().unwrap_or_else(|| Ok(String::new())))
    }

    fn coordinator(
        gen: impl SuggestionGenerator,
    ) -> (SuggestionCoordinator, RecordingSink, FakeOverlay) {
        let sink = RecordingSink::new();
        let overlay = FakeOverlay::default();
        let injector = TextInjector::with_delay(sink.clone(), Duration::ZERO);
        let coordinator = SuggestionCoordinator::new(gen, overlay.clone(), injector).unwrap();
        (coordinator, sink, overlay)
    }

    #[test]
    fn test_accept_with_nothing_pending_is_noop() {
        let (mut coordinator, sink, overlay) = coordinator(scripted(vec![]));
        assert_eq!(
            coordinator.on_accept_gesture().unwrap(),
            AcceptOutcome::NothingPending
        );
        assert!(sink.events().is_empty());
        assert_eq!(*overlay.0.lock(), vec![Shown::Notice(NoticeLevel::Info)]);
    }

    #[test]
    fn test_generate_then_accept() {
        let (mut coordinator, sink, overlay) =
            coordinator(scripted(vec![Ok("Hi".to_string())]));
        assert_eq!(coordinator.on_generate_gesture(), GenerateOutcome::Submitted(1));
        assert!(coordinator.is_generating());

        let outcome = coordinator.wait_completed(WAIT).unwrap();
        assert!(matches!(outcome, GenerationOutcome::Ready(ref s) if s == "Hi"));
        assert!(!coordinator.is_generating());
        assert_eq!(coordinator.pending_suggestion(), Some("Hi"));
        assert!(coordinator.is_overlay_visible());

        let AcceptOutcome::Injected(report) = coordinator.on_accept_gesture().unwrap() else {
            panic!("expected injection");
        };
        assert_eq!(report.typed, 2);
        assert_eq!(coordinator.pending_suggestion(), None);
        assert!(!coordinator.is_overlay_visible());
        assert_eq!(
            sink.events(),
            vec![
                (VirtualKey::SHIFT, Action::Press),
                (VirtualKey(0x48), Action::Press),
                (VirtualKey(0x48), Action::Release),
                (VirtualKey::SHIFT, Action::Release),
                (VirtualKey(0x49), Action::Press),
                (VirtualKey(0x49), Action::Release),
            ]
        );
        assert_eq!(
            *overlay.0.lock(),
            vec![Shown::Show("Hi".to_string()), Shown::Hide]
        );

        // Accepting again does nothing
        assert_eq!(
            coordinator.on_accept_gesture().unwrap(),
            AcceptOutcome::NothingPending
        );
    }

    #[test]
    fn test_empty_output_leaves_nothing_pending() {
        let (mut coordinator, _sink, overlay) = coordinator(scripted(vec![Ok(String::new())]));
        coordinator.on_generate_gesture();
        assert!(matches!(
            coordinator.wait_completed(WAIT),
            Some(GenerationOutcome::Empty)
        ));
        assert_eq!(coordinator.pending_suggestion(), None);
        assert_eq!(*overlay.0.lock(), vec![Shown::Notice(NoticeLevel::Info)]);
    }

    #[test]
    fn test_failure_clears_previous_suggestion() {
        let (mut coordinator, _sink, overlay) = coordinator(scripted(vec![
            Ok("first".to_string()),
            Err(GeneratorError::Failed(Some(1))),
        ]));
        coordinator.on_generate_gesture();
        coordinator.wait_completed(WAIT);
        assert_eq!(coordinator.pending_suggestion(), Some("first"));

        coordinator.on_generate_gesture();
        assert!(matches!(
            coordinator.wait_completed(WAIT),
            Some(GenerationOutcome::Failed(GeneratorError::Failed(Some(1))))
        ));
        assert_eq!(coordinator.pending_suggestion(), None);
        assert!(!coordinator.is_overlay_visible());
        assert_eq!(
            overlay.0.lock().last(),
            Some(&Shown::Notice(NoticeLevel::Warning))
        );
    }

    #[test]
    fn test_latest_result_wins() {
        let (mut coordinator, _sink, _overlay) = coordinator(scripted(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
        ]));
        coordinator.on_generate_gesture();
        coordinator.wait_completed(WAIT);
        coordinator.on_generate_gesture();
        coordinator.wait_completed(WAIT);
        assert_eq!(coordinator.pending_suggestion(), Some("two"));
    }

    #[test]
    fn test_generate_rejected_while_in_flight() {
        let release = Arc::new(AtomicBool::new(false));
        let gate = Arc::clone(&release);
        let (mut coordinator, _sink, _overlay) = coordinator(generator(move |_| {
            while !gate.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(1));
            }
            Ok("done".to_string())
        }));

        assert_eq!(coordinator.on_generate_gesture(), GenerateOutcome::Submitted(1));
        assert_eq!(coordinator.on_generate_gesture(), GenerateOutcome::Rejected);
        assert!(coordinator.poll_completed().is_none());

        release.store(true, Ordering::SeqCst);
        assert!(coordinator.wait_completed(WAIT).is_some());
        assert_eq!(coordinator.on_generate_gesture(), GenerateOutcome::Submitted(2));
    }

    #[test]
    fn test_generator_panic_is_reported_and_next_generate_runs() {
        let (mut coordinator, _sink, overlay) =
            coordinator(generator(|_| panic!("generator bug")));

        assert_eq!(coordinator.on_generate_gesture(), GenerateOutcome::Submitted(1));
        assert!(matches!(
            coordinator.wait_completed(WAIT),
            Some(GenerationOutcome::Failed(GeneratorError::Panicked(ref m))) if m == "generator bug"
        ));
        assert!(!coordinator.is_generating());
        assert_eq!(
            overlay.0.lock().last(),
            Some(&Shown::Notice(NoticeLevel::Warning))
        );

        assert_eq!(coordinator.on_generate_gesture(), GenerateOutcome::Submitted(2));
        assert!(coordinator.wait_completed(WAIT).is_some());
    }

    #[test]
    fn test_cancel_running_generation() {
        let (mut coordinator, _sink, _overlay) = coordinator(generator(|cancel| {
            while !cancel.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(1));
            }
            Err(GeneratorError::Cancelled)
        }));
        coordinator.on_generate_gesture();
        coordinator.cancel();
        assert!(matches!(
            coordinator.wait_completed(WAIT),
            Some(GenerationOutcome::Failed(GeneratorError::Cancelled))
        ));
        assert!(!coordinator.is_generating());
    }

    #[test]
    fn test_key_down_hides_overlay_but_keeps_suggestion() {
        let (mut coordinator, _sink, overlay) =
            coordinator(scripted(vec![Ok("keep".to_string())]));
        coordinator.on_generate_gesture();
        coordinator.wait_completed(WAIT);

        coordinator.on_key_down(true);
        assert!(coordinator.is_overlay_visible());

        coordinator.on_key_down(false);
        assert!(!coordinator.is_overlay_visible());
        assert_eq!(coordinator.pending_suggestion(), Some("keep"));

        coordinator.on_key_down(false);
        let hides = overlay.0.lock().iter().filter(|s| **s == Shown::Hide).count();
        assert_eq!(hides, 1);
    }

    #[test]
    fn test_injection_failure_consumes_suggestion() {
        let sink = RecordingSink::failing_after(1);
        let injector = TextInjector::with_delay(sink.clone(), Duration::ZERO);
        let mut coordinator = SuggestionCoordinator::new(
            scripted(vec![Ok("ab".to_string())]),
            FakeOverlay::default(),
            injector,
        )
        .unwrap();
        coordinator.on_generate_gesture();
        coordinator.wait_completed(WAIT);

        assert!(matches!(
            coordinator.on_accept_gesture(),
            Err(InjectionError::WriteError(_))
        ));
        assert_eq!(coordinator.pending_suggestion(), None);
    }
}
