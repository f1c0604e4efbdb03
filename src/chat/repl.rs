//! The interactive chat loop.

use std::io;

use crate::chat::config::{ChatConfig, ParameterAnswers, resolve_parameters, wants_configuration};
use crate::chat::input::LineReader;
use crate::chat::session::{ChatSession, Submission};
use crate::completion::Completion;
use crate::error::{Error, Result};
use crate::observability::CHAT_PARAMETER_FALLBACKS;
use crate::render::Renderer;
use crate::types::GenerationConfig;

/// Printed once at startup.
pub const BANNER: &str = "Welcome to the Gemini Multi-Turn Chat!\n\
You can have a conversation with the Gemini AI model.\n\
Type 'exit' at any time to end the conversation.\n";

/// Second line of the missing-credential diagnostic.
pub const MISSING_API_KEY_HELP: &str =
    "Please create a .env file with your API key or set it as an environment variable.";

/// Asks whether to configure the generation parameters.
pub const CONFIGURE_PROMPT: &str = "Would you like to configure model parameters? (y/n): ";
/// Temperature prompt.
pub const TEMPERATURE_PROMPT: &str = "Enter temperature (0.0-1.0, default 0.7): ";
/// Top-p prompt.
pub const TOP_P_PROMPT: &str = "Enter top_p (0.0-1.0, default 0.95): ";
/// Top-k prompt.
pub const TOP_K_PROMPT: &str = "Enter top_k (1-100, default 40): ";
/// Printed when any parameter answer is malformed.
pub const INVALID_PARAMETERS: &str = "Invalid input. Using default parameters.";
/// Prompt for each user turn.
pub const USER_PROMPT: &str = "\nYou: ";

/// Ask for the generation parameters.
///
/// End of input at any of these prompts counts as an empty answer.  All three
/// answers are collected before any is parsed; one malformed answer reverts
/// the whole set to the defaults.
pub fn prompt_generation_config<L, R>(reader: &mut L, renderer: &mut R) -> Result<GenerationConfig>
where
    L: LineReader + ?Sized,
    R: Renderer + ?Sized,
{
    let answer = reader.read_line(CONFIGURE_PROMPT)?.unwrap_or_default();
    if !wants_configuration(&answer) {
        return Ok(GenerationConfig::default());
    }
    let answers = ParameterAnswers {
        temperature: reader.read_line(TEMPERATURE_PROMPT)?.unwrap_or_default(),
        top_p: reader.read_line(TOP_P_PROMPT)?.unwrap_or_default(),
        top_k: reader.read_line(TOP_K_PROMPT)?.unwrap_or_default(),
    };
    match resolve_parameters(&answers) {
        Ok(generation) => Ok(generation),
        Err(_) => {
            CHAT_PARAMETER_FALLBACKS.click();
            renderer.print_info(INVALID_PARAMETERS);
            Ok(GenerationConfig::default())
        }
    }
}

/// Run a whole chat: banner, parameter prompts, then turns until `exit`.
///
/// Every line other than `exit` is submitted as typed, blank lines included.
/// Returns the finished session.  A completion failure ends the chat and is
/// returned as the error, as is end of input at the `You: ` prompt.
pub async fn run<C, L, R>(
    completion: C,
    config: ChatConfig,
    reader: &mut L,
    renderer: &mut R,
) -> Result<ChatSession<C>>
where
    C: Completion,
    L: LineReader + ?Sized,
    R: Renderer + ?Sized,
{
    renderer.print_info(BANNER);
    let generation = prompt_generation_config(reader, renderer)?;
    let mut session = ChatSession::new(completion, config.with_generation(generation));

    loop {
        let Some(line) = reader.read_line(USER_PROMPT)? else {
            return Err(Error::io(
                "end of input before exit",
                io::Error::from(io::ErrorKind::UnexpectedEof),
            ));
        };
        match session.submit(&line).await? {
            Submission::Reply(reply) => renderer.print_reply(&reply),
            Submission::Exit => break,
        }
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, sink};

    use super::*;
    use crate::chat::input::BufReadReader;
    use crate::render::PlainTextRenderer;

    fn resolve(input: &str) -> (GenerationConfig, String) {
        let mut reader = BufReadReader::new(Cursor::new(input.to_string()), sink());
        let mut renderer = PlainTextRenderer::with_writer(Vec::new());
        let generation = prompt_generation_config(&mut reader, &mut renderer).unwrap();
        (generation, String::from_utf8(renderer.into_inner()).unwrap())
    }

    #[test]
    fn declining_keeps_defaults() {
        let (generation, out) = resolve("n\n");
        assert_eq!(generation, GenerationConfig::default());
        assert!(out.is_empty());
    }

    #[test]
    fn configured_values_are_used() {
        let (generation, out) = resolve("yes\n0.1\n0.5\n12\n");
        assert_eq!(generation, GenerationConfig::new(0.1, 0.5, 12));
        assert!(out.is_empty());
    }

    #[test]
    fn malformed_value_reverts_everything() {
        let (generation, out) = resolve("y\n0.1\n0.5\ntwelve\n");
        assert_eq!(generation, GenerationConfig::default());
        assert_eq!(out, "Invalid input. Using default parameters.\n");
    }

    #[test]
    fn end_of_input_counts_as_empty() {
        let (generation, _) = resolve("");
        assert_eq!(generation, GenerationConfig::default());
        let (generation, _) = resolve("y\n0.3\n");
        assert_eq!(generation, GenerationConfig::new(0.3, 0.95, 40));
    }

    #[test]
    fn non_finite_values_revert_everything() {
        let (generation, out) = resolve("y\nnan\ninf\n\n");
        assert_eq!(generation, GenerationConfig::default());
        assert_eq!(out, "Invalid input. Using default parameters.\n");
    }

    #[test]
    fn prompts_are_shown_in_order() {
        let mut reader = BufReadReader::new(Cursor::new("Y\n\n\n\n"), Vec::new());
        let mut renderer = PlainTextRenderer::with_writer(sink());
        prompt_generation_config(&mut reader, &mut renderer).unwrap();
        let prompts = String::from_utf8(reader.into_prompt_out()).unwrap();
        assert_eq!(
            prompts,
            format!("{CONFIGURE_PROMPT}{TEMPERATURE_PROMPT}{TOP_P_PROMPT}{TOP_K_PROMPT}")
        );
    }
}
