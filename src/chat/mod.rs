//! Chat application module for multi-turn conversations with Gemini.
//!
//! This module provides the console chat built on top of the gemchat client.
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing, configuration and parameter resolution
//! - [`session`]: the transcript and the `submit` operation
//! - [`input`]: line readers for terminals and piped input
//! - [`repl`]: the loop tying them together

pub mod config;
pub mod input;
pub mod repl;
pub mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use config::{
    ChatArgs, ChatConfig, InvalidParameter, ParameterAnswers, load_environment, parse_parameter,
    resolve_parameters, wants_configuration,
};
pub use input::{BufReadReader, LineReader, RustylineReader};
pub use repl::{MISSING_API_KEY_HELP, prompt_generation_config, run};
pub use session::{ChatSession, EXIT_SENTINEL, SessionState, Submission, is_exit_sentinel};
