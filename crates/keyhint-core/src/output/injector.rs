// Keyhint Output Layer - Text Injection
// Replays text as synthetic key-down/key-up pairs

use std::sync::OnceLock;
use std::time::Duration;

use parking_lot::Mutex;

use super::sink::{InjectionError, KeySink};
use crate::charmap::key_for_char;
use crate::{Action, VirtualKey};

/// Default pause between synthetic transitions
pub const DEFAULT_KEY_DELAY: Duration = Duration::from_millis(10);

/// What a successful `send_text` did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionReport {
    /// Characters typed
    pub typed: usize,
    /// Characters with no key mapping, in text order
    pub skipped: Vec<char>,
}

impl InjectionReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Types text through a `KeySink`.
///
/// The sink sits behind a mutex so at most one injection runs at a time.
/// The first sink failure aborts the rest of the call.
pub struct TextInjector {
    sink: Mutex<Box<dyn KeySink + Send>>,
    key_delay: Duration,
}

impl TextInjector {
    pub fn new(sink: impl KeySink + Send + 'static) -> Self {
        Self::with_delay(sink, DEFAULT_KEY_DELAY)
    }

    /// A zero delay disables pacing entirely
    pub fn with_delay(sink: impl KeySink + Send + 'static, key_delay: Duration) -> Self {
        Self {
            sink: Mutex::new(Box::new(sink)),
            key_delay,
        }
    }

    pub fn key_delay(&self) -> Duration {
        self.key_delay
    }

    fn debug_output_enabled() -> bool {
        static DEBUG_OUTPUT: OnceLock<bool> = OnceLock::new();
        *DEBUG_OUTPUT.get_or_init(|| {
            std::env::var("KEYHINT_DEBUG_OUTPUT")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes" | "on"))
                .unwrap_or(false)
        })
    }

    fn debug_output_log(message: &str) {
        if Self::debug_output_enabled() {
            eprintln!("[OUTPUT-DEBUG] {}", message);
        }
    }

    fn pause(&self) {
        if !self.key_delay.is_zero() {
            std::thread::sleep(self.key_delay);
        }
    }

    fn tap(
        &self,
        sink: &mut dyn KeySink,
        key: VirtualKey,
        needs_shift: bool,
    ) -> Result<(), InjectionError> {
        if needs_shift {
            sink.send_key(VirtualKey::SHIFT, Action::Press)?;
        }
        sink.send_key(key, Action::Press)?;
        self.pause();
        sink.send_key(key, Action::Release)?;
        if needs_shift {
            sink.send_key(VirtualKey::SHIFT, Action::Release)?;
        }
        self.pause();
        Ok(())
    }

    /// Type `text` one character at a time.
    ///
    /// Characters without a key mapping are skipped and listed in the
    /// report. Any sink error stops the call and is returned.
    pub fn send_text(&self, text: &str) -> Result<InjectionReport, InjectionError> {
        let mut sink = self.sink.lock();
        let mut report = InjectionReport::default();
        Self::debug_output_log(&format!(
            "send_text start len={} delay={:?}",
            text.len(),
            self.key_delay
        ));

        for (idx, ch) in text.chars().enumerate() {
            let Some((key, needs_shift)) = key_for_char(ch) else {
                log::warn!("No key mapping for character {:?}, skipping", ch);
                report.skipped.push(ch);
                continue;
            };
            if Self::debug_output_enabled() {
                Self::debug_output_log(&format!(
                    "send_text char[{}]={:?} key={} shift={}",
                    idx, ch, key, needs_shift
                ));
            }
            self.tap(&mut **sink, key, needs_shift)?;
            report.typed += 1;
        }

        Self::debug_output_log("send_text end");
        Ok(report)
    }

    /// Tap a single key
    pub fn send_key_press(&self, key: VirtualKey) -> Result<(), InjectionError> {
        let mut sink = self.sink.lock();
        self.tap(&mut **sink, key, false)
    }

    /// Tap each key in order, stopping at the first failure
    pub fn send_key_sequence(&self, keys: &[VirtualKey]) -> Result<(), InjectionError> {
        let mut sink = self.sink.lock();
        for &key in keys {
            self.tap(&mut **sink, key, false)?;
        }
        Ok(())
    }

    /// Release anything the sink still holds
    pub fn release_all(&self) -> Result<(), InjectionError> {
        self.sink.lock().release_all()
    }
}

impl std::fmt::Debug for TextInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextInjector")
            .field("key_delay", &self.key_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::RecordingSink;

    fn injector() -> (TextInjector, RecordingSink) {
        let sink = RecordingSink::new();
        (TextInjector::with_delay(sink.clone(), Duration::ZERO), sink)
    }

    #[test]
    fn test_send_text_event_order() {
        let (injector, sink) = injector();
        let report = injector.send_text("Ab1 ").unwrap();
        assert_eq!(report.typed, 4);
        assert!(report.is_complete());

        let a = VirtualKey(0x41);
        let b = VirtualKey(0x42);
        let one = VirtualKey(0x31);
        assert_eq!(
            sink.events(),
            vec![
                (VirtualKey::SHIFT, Action::Press),
                (a, Action::Press),
                (a, Action::Release),
                (VirtualKey::SHIFT, Action::Release),
                (b, Action::Press),
                (b, Action::Release),
                (one, Action::Press),
                (one, Action::Release),
                (VirtualKey::SPACE, Action::Press),
                (VirtualKey::SPACE, Action::Release),
            ]
        );
        assert!(sink.held_keys().is_empty());
    }

    #[test]
    fn test_shifted_symbols() {
        let (injector, sink) = injector();
        injector.send_text("!:").unwrap();
        assert_eq!(
            sink.events(),
            vec![
                (VirtualKey::SHIFT, Action::Press),
                (VirtualKey(0x31), Action::Press),
                (VirtualKey(0x31), Action::Release),
                (VirtualKey::SHIFT, Action::Release),
                (VirtualKey::SHIFT, Action::Press),
                (VirtualKey::OEM_1, Action::Press),
                (VirtualKey::OEM_1, Action::Release),
                (VirtualKey::SHIFT, Action::Release),
            ]
        );
    }

    #[test]
    fn test_unmapped_characters_are_skipped() {
        let (injector, sink) = injector();
        let report = injector.send_text("aé€b").unwrap();
        assert_eq!(report.typed, 2);
        assert_eq!(report.skipped, vec!['é', '€']);
        assert!(!report.is_complete());
        assert_eq!(sink.events().len(), 4);
    }

    #[test]
    fn test_empty_text() {
        let (injector, sink) = injector();
        assert_eq!(injector.send_text("").unwrap(), InjectionReport::default());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_failure_aborts_remaining_characters() {
        // Three transitions succeed: 'a' down, 'a' up, then 'b' down fails
        let sink = RecordingSink::failing_after(2);
        let injector = TextInjector::with_delay(sink.clone(), Duration::ZERO);
        let result = injector.send_text("abc");
        assert!(matches!(result, Err(InjectionError::WriteError(_))));
        assert_eq!(
            sink.events(),
            vec![
                (VirtualKey(0x41), Action::Press),
                (VirtualKey(0x41), Action::Release),
            ]
        );
    }

    #[test]
    fn test_send_key_press_and_sequence() {
        let (injector, sink) = injector();
        injector.send_key_press(VirtualKey::RETURN).unwrap();
        injector
            .send_key_sequence(&[VirtualKey::HOME, VirtualKey::END])
            .unwrap();
        assert_eq!(
            sink.events(),
            vec![
                (VirtualKey::RETURN, Action::Press),
                (VirtualKey::RETURN, Action::Release),
                (VirtualKey::HOME, Action::Press),
                (VirtualKey::HOME, Action::Release),
                (VirtualKey::END, Action::Press),
                (VirtualKey::END, Action::Release),
            ]
        );
    }

    #[test]
    fn test_newline_types_enter() {
        let (injector, sink) = injector();
        injector.send_text("\n").unwrap();
        assert_eq!(sink.events()[0], (VirtualKey::RETURN, Action::Press));
    }

    #[test]
    fn test_default_delay() {
        let injector = TextInjector::new(RecordingSink::new());
        assert_eq!(injector.key_delay(), Duration::from_millis(10));
    }
}
