// Keyhint Suggestions - Overlay Seam
// Where suggestions and workflow notices are shown to the user

use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Presentation of a pending suggestion.
///
/// The overlay is advisory only; it never blocks input capture.
pub trait SuggestionOverlay: Send {
    fn show(&mut self, text: &str);
    fn hide(&mut self);
    fn notice(&mut self, level: NoticeLevel, message: &str);
}

/// Overlay that writes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOverlay;

impl SuggestionOverlay for LogOverlay {
    fn show(&mut self, text: &str) {
        log::info!("Suggestion ready: \"{}\" (tap right Ctrl to accept)", text);
    }

    fn hide(&mut self) {
        log::debug!("Suggestion overlay hidden");
    }

    fn notice(&mut self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => log::info!("{}", message),
            NoticeLevel::Warning => log::warn!("{}", message),
        }
    }
}
