// Keyhint Event History
// Running counts and the most recent events, summarized at shutdown

use std::collections::VecDeque;
use std::fmt;

use crate::input::InputEvent;

/// Number of recent events kept for the summary
pub const RECENT_EVENTS: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct EventHistory {
    total: usize,
    keyboard: usize,
    mouse: usize,
    special: usize,
    recent: VecDeque<InputEvent>,
}

impl EventHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event; `is_special` marks monitored special keys
    pub fn record(&mut self, event: &InputEvent, is_special: bool) {
        self.total += 1;
        match event {
            InputEvent::Keyboard(_) => {
                self.keyboard += 1;
                if is_special {
                    self.special += 1;
                }
            }
            InputEvent::Mouse(_) => self.mouse += 1,
        }
        if self.recent.len() == RECENT_EVENTS {
            self.recent.pop_front();
        }
        self.recent.push_back(*event);
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            total: self.total,
            keyboard: self.keyboard,
            mouse: self.mouse,
            special: self.special,
            recent: self.recent.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySummary {
    pub total: usize,
    pub keyboard: usize,
    pub mouse: usize,
    pub special: usize,
    /// Oldest first
    pub recent: Vec<InputEvent>,
}

impl fmt::Display for HistorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== STORED EVENTS SUMMARY ===")?;
        writeln!(f, "Total events stored: {}", self.total)?;
        writeln!(f, "Keyboard events: {}", self.keyboard)?;
        writeln!(f, "Mouse events: {}", self.mouse)?;
        writeln!(f, "Special key events: {}", self.special)?;
        if self.recent.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "Last {} events:", self.recent.len())?;
        for event in &self.recent {
            match event {
                InputEvent::Keyboard(e) => writeln!(
                    f,
                    "  [{}us] KB: {} {}",
                    e.timestamp,
                    e.virtual_key,
                    if e.is_key_up { "UP" } else { "DOWN" }
                )?,
                InputEvent::Mouse(e) => writeln!(
                    f,
                    "  [{}us] MOUSE: {} {} at ({}, {})",
                    e.timestamp,
                    e.button,
                    if e.is_button_up { "UP" } else { "DOWN" },
                    e.cursor_position.0,
                    e.cursor_position.1
                )?,
            }
        }
        Ok(())
    }
}
