// Keyhint Special Keys - Gesture Routing
// (key, side) -> action table for fired gestures

use std::collections::HashMap;

use strum_macros::{Display, EnumString};

use super::machine::Gesture;
use crate::{Side, VirtualKey};

/// What a fired gesture asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SpecialAction {
    GenerateSuggestion,
    AcceptSuggestion,
    /// Recognized but unbound; logged only
    Placeholder,
}

#[derive(Debug, Clone, Default)]
pub struct GestureRouter {
    routes: HashMap<(VirtualKey, Side), SpecialAction>,
}

impl GestureRouter {
    /// Empty table, every gesture routes to `Placeholder`
    pub fn new() -> Self {
        Self::default()
    }

    /// Left (or unsided) Ctrl generates, right Ctrl accepts.
    /// Shift and Alt stay unbound.
    pub fn with_defaults() -> Self {
        let mut router = Self::new();
        router.set_route(VirtualKey::CONTROL, Side::Left, SpecialAction::GenerateSuggestion);
        router.set_route(VirtualKey::CONTROL, Side::Unspecified, SpecialAction::GenerateSuggestion);
        router.set_route(VirtualKey::CONTROL, Side::Right, SpecialAction::AcceptSuggestion);
        router
    }

    pub fn set_route(&mut self, key: VirtualKey, side: Side, action: SpecialAction) {
        self.routes.insert((key, side), action);
    }

    pub fn action_for(&self, key: VirtualKey, side: Side) -> SpecialAction {
        self.routes
            .get(&(key, side))
            .copied()
            .unwrap_or(SpecialAction::Placeholder)
    }

    pub fn route(&self, gesture: &Gesture) -> SpecialAction {
        self.action_for(gesture.key, gesture.side)
    }

    /// Whether a key-down is the one that accepts a suggestion
    pub fn is_accept_key(&self, key: VirtualKey, side: Side) -> bool {
        self.action_for(key, side) == SpecialAction::AcceptSuggestion
    }
}

/// Short human label for a monitored key
pub fn special_key_label(key: VirtualKey) -> &'static str {
    match key {
        VirtualKey::CONTROL => "Ctrl",
        VirtualKey::SHIFT => "Shift",
        VirtualKey::MENU => "Alt",
        _ => "Unknown",
    }
}
