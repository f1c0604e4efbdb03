// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod completion;
pub mod error;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use client::{API_KEY_ENV, Gemini, resolve_api_key};
pub use client_logger::{ClientLogger, JsonLinesLogger};
pub use completion::Completion;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::*;
