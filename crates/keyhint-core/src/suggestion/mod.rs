// Keyhint Suggestions
// External suggestion generation and acceptance

mod coordinator;
mod generator;
mod overlay;
mod worker;

pub use coordinator::{AcceptOutcome, GenerateOutcome, GenerationOutcome, SuggestionCoordinator};
pub use generator::{
    GeneratorConfig, GeneratorError, ProcessGenerator, SuggestionGenerator, DEFAULT_OUTPUT_FILE,
    LOG_FILE_ENV,
};
pub use overlay::{LogOverlay, NoticeLevel, SuggestionOverlay};
pub use worker::{GenerationResult, GenerationWorker, SubmitError};
