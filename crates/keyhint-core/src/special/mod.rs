// Keyhint Special Keys
// "Pressed alone" gesture detection and routing

mod machine;
mod routing;

pub use machine::{
    Gesture, GestureOutcome, KeyPhase, SpecialKeyStateMachine, SpecialKeyTrackingState,
};
pub use routing::{special_key_label, GestureRouter, SpecialAction};
