// Public modules
pub mod content;
pub mod generate_content;
pub mod generation_config;
pub mod model;
pub mod role;
pub mod turn;

// Re-exports
pub use content::{Content, Part};
pub use generate_content::{
    Candidate, GenerateContentRequest, GenerateContentResponse, PromptFeedback, UsageMetadata,
};
pub use generation_config::{DEFAULT_TEMPERATURE, DEFAULT_TOP_K, DEFAULT_TOP_P, GenerationConfig};
pub use model::{KnownModel, Model};
pub use role::Role;
pub use turn::Turn;
