//! Multi-turn console chat with a Gemini model.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; the API key comes from GEMINI_API_KEY or ./.env
//! gemchat
//!
//! # Specify a model
//! gemchat --model gemini-2.0-flash
//!
//! # Record every request and response
//! gemchat --log-file gemchat.jsonl
//! ```
//!
//! Type `exit` (any case) at the `You:` prompt to leave.

use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;

use arrrg::CommandLine;

use gemchat::chat::{
    BufReadReader, ChatArgs, ChatConfig, LineReader, MISSING_API_KEY_HELP, PlainTextRenderer,
    Renderer, RustylineReader, load_environment, run,
};
use gemchat::{Gemini, JsonLinesLogger};

/// Main entry point for the gemchat application.
#[tokio::main]
async fn main() -> ExitCode {
    let (args, _) = ChatArgs::from_command_line_relaxed("gemchat [OPTIONS]");
    let mut renderer = PlainTextRenderer::new();

    match load_environment(args.env_file.as_deref()) {
        Ok(skipped) => {
            for warning in skipped {
                renderer.print_warning(&warning.to_string());
            }
        }
        Err(err) => {
            renderer.print_error(&err.to_string());
            return ExitCode::FAILURE;
        }
    }

    let client = match Gemini::with_options(None, args.base_url.clone(), args.timeout()) {
        Ok(client) => client,
        Err(err) if err.is_missing_api_key() => {
            println!("Error: {err}");
            println!("{MISSING_API_KEY_HELP}");
            return ExitCode::from(1);
        }
        Err(err) => {
            renderer.print_error(&err.to_string());
            return ExitCode::FAILURE;
        }
    };
    let client = match args.log_file.as_deref() {
        Some(path) => match JsonLinesLogger::open(path) {
            Ok(logger) => client.with_logger(Arc::new(logger)),
            Err(err) => {
                renderer.print_error(&err.to_string());
                return ExitCode::FAILURE;
            }
        },
        None => client,
    };
    let config = ChatConfig::from(&args);

    let mut reader: Box<dyn LineReader> = if io::stdin().is_terminal() {
        match RustylineReader::new() {
            Ok(reader) => Box::new(reader),
            Err(err) => {
                renderer.print_error(&err.to_string());
                return ExitCode::FAILURE;
            }
        }
    } else {
        Box::new(BufReadReader::stdin())
    };

    match run(client, config, reader.as_mut(), &mut renderer).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            renderer.print_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}
