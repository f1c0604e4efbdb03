//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg`, the resolved
//! [`ChatConfig`], and the all-or-nothing resolution of the interactively
//! entered generation parameters.

use std::env;
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::error::{Error, Result};
use crate::types::{GenerationConfig, Model};

/// Command-line arguments for the gemchat tool.
///
/// Every flag is optional; with none given the tool behaves exactly as the
/// plain interactive chat.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-1.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// Base URL of the API.
    #[arrrg(optional, "Base URL of the Gemini API", "URL")]
    pub base_url: Option<String>,

    /// Environment file to load instead of `.env`.
    #[arrrg(optional, "Environment file to load (default: .env)", "PATH")]
    pub env_file: Option<String>,

    /// Per-request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout: Option<u64>,

    /// File that receives every request and response as JSON lines.
    #[arrrg(optional, "Append API traffic to this file as JSON lines", "PATH")]
    pub log_file: Option<String>,
}

impl ChatArgs {
    /// The request timeout, if one was given.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

/// Configuration for a chat session.
///
/// Owned by the session for its whole lifetime and never changed once the
/// session has started.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Sampling parameters sent with every request.
    pub generation: GenerationConfig,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-1.5-flash
    /// - Temperature: 0.7
    /// - Top-p: 0.95
    /// - Top-k: 40
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            generation: GenerationConfig::default(),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the generation parameters.
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&ChatArgs> for ChatConfig {
    fn from(args: &ChatArgs) -> Self {
        let model = args
            .model
            .as_deref()
            .map(|s| s.parse::<Model>().unwrap_or_else(|_| Model::Custom(s.to_string())))
            .unwrap_or_default();
        ChatConfig::new().with_model(model)
    }
}

/// Load environment variables from `path`, or from `.env` when `None`.
///
/// Variables already set in the process environment win.  A missing default
/// `.env` is not an error; a missing explicit file is.  Lines that do not
/// parse are skipped, the rest of the file is still loaded, and one
/// [`Error::Serialization`] per skipped line is returned for the caller to
/// report.
pub fn load_environment(path: Option<&str>) -> Result<Vec<Error>> {
    let name = path.unwrap_or(".env");
    let entries = match path {
        Some(path) => dotenvy::from_path_iter(Path::new(path)),
        None => dotenvy::dotenv_iter(),
    };
    let entries = match entries {
        Ok(entries) => entries,
        Err(dotenvy::Error::Io(err))
            if path.is_none() && err.kind() == io::ErrorKind::NotFound =>
        {
            return Ok(Vec::new());
        }
        Err(dotenvy::Error::Io(err)) => {
            return Err(Error::io(format!("failed to read {name}"), err));
        }
        Err(err) => {
            return Err(Error::serialization(
                format!("failed to parse {name}: {err}"),
                Some(Box::new(err)),
            ));
        }
    };
    let (vars, skipped) = read_env_entries(name, entries)?;
    for (key, value) in vars {
        if env::var_os(&key).is_none() {
            // SAFETY: runs once at startup, before anything reads the environment.
            unsafe { env::set_var(key, value) };
        }
    }
    Ok(skipped)
}

/// Collect the variables of an environment file, skipping malformed lines.
fn read_env_entries<R: io::Read>(
    name: &str,
    entries: dotenvy::Iter<R>,
) -> Result<(Vec<(String, String)>, Vec<Error>)> {
    let mut vars = Vec::new();
    let mut skipped = Vec::new();
    for entry in entries {
        match entry {
            Ok(var) => vars.push(var),
            Err(dotenvy::Error::Io(err)) => {
                return Err(Error::io(format!("failed to read {name}"), err));
            }
            Err(err) => skipped.push(Error::serialization(
                format!("skipped line in {name}: {err}"),
                Some(Box::new(err)),
            )),
        }
    }
    Ok((vars, skipped))
}

/// The answers given to the three parameter prompts, verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterAnswers {
    /// Answer to the temperature prompt.
    pub temperature: String,
    /// Answer to the top_p prompt.
    pub top_p: String,
    /// Answer to the top_k prompt.
    pub top_k: String,
}

/// A parameter answer that did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidParameter {
    /// Name of the parameter.
    pub name: &'static str,
    /// The text that failed to parse.
    pub input: String,
}

impl fmt::Display for InvalidParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.name, self.input)
    }
}

/// Returns true if the answer to the configure prompt means yes.
pub fn wants_configuration(answer: &str) -> bool {
    answer.to_lowercase().starts_with('y')
}

/// Parse one parameter answer.
///
/// An empty answer keeps `default`.  Surrounding whitespace is ignored, so a
/// whitespace-only answer is invalid rather than empty.
pub fn parse_parameter<T: FromStr>(
    name: &'static str,
    answer: &str,
    default: T,
) -> std::result::Result<T, InvalidParameter> {
    if answer.is_empty() {
        return Ok(default);
    }
    answer.trim().parse().map_err(|_| InvalidParameter {
        name,
        input: answer.to_string(),
    })
}

/// Parse one floating-point answer.
///
/// `nan`, `inf` and values that overflow `f32` cannot be sent as JSON numbers
/// and are invalid.
fn parse_finite(
    name: &'static str,
    answer: &str,
    default: f32,
) -> std::result::Result<f32, InvalidParameter> {
    let value = parse_parameter(name, answer, default)?;
    if !value.is_finite() {
        return Err(InvalidParameter {
            name,
            input: answer.to_string(),
        });
    }
    Ok(value)
}

/// Resolve all three answers at once.
///
/// Any invalid answer invalidates the whole set; there is no per-field
/// fallback.  Finite values outside the documented ranges are passed through.
/// `top_k` must fit in an `i32`.
pub fn resolve_parameters(
    answers: &ParameterAnswers,
) -> std::result::Result<GenerationConfig, InvalidParameter> {
    let defaults = GenerationConfig::default();
    Ok(GenerationConfig::new(
        parse_finite("temperature", &answers.temperature, defaults.temperature)?,
        parse_finite("top_p", &answers.top_p, defaults.top_p)?,
        parse_parameter("top_k", &answers.top_k, defaults.top_k)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    fn answers(temperature: &str, top_p: &str, top_k: &str) -> ParameterAnswers {
        ParameterAnswers {
            temperature: temperature.to_string(),
            top_p: top_p.to_string(),
            top_k: top_k.to_string(),
        }
    }

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini15Flash));
        assert_eq!(config.generation, GenerationConfig::new(0.7, 0.95, 40));
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(&args);
        assert_eq!(config, ChatConfig::default());
        assert!(args.timeout().is_none());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            base_url: Some("http://localhost:9999/".to_string()),
            env_file: None,
            timeout: Some(5),
            log_file: None,
        };
        let config = ChatConfig::from(&args);
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(args.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn yes_answers() {
        assert!(wants_configuration("y"));
        assert!(wants_configuration("Yes"));
        assert!(wants_configuration("YEAH"));
        assert!(!wants_configuration("n"));
        assert!(!wants_configuration(""));
        assert!(!wants_configuration(" y"));
    }

    #[test]
    fn well_formed_answers_are_used_exactly() {
        let config = resolve_parameters(&answers("0.2", "0.5", "7")).unwrap();
        assert_eq!(config, GenerationConfig::new(0.2, 0.5, 7));
    }

    #[test]
    fn empty_answers_keep_defaults() {
        let config = resolve_parameters(&answers("", "", "")).unwrap();
        assert_eq!(config, GenerationConfig::default());

        let config = resolve_parameters(&answers("", "0.3", "")).unwrap();
        assert_eq!(config, GenerationConfig::new(0.7, 0.3, 40));
    }

    #[test]
    fn any_malformed_answer_rejects_all() {
        for (t, p, k, name) in [
            ("abc", "0.9", "10", "temperature"),
            ("0.1", "high", "10", "top_p"),
            ("0.1", "0.2", "4.5", "top_k"),
            ("  ", "0.2", "5", "temperature"),
        ] {
            let err = resolve_parameters(&answers(t, p, k)).unwrap_err();
            assert_eq!(err.name, name);
            assert_eq!(
                resolve_parameters(&answers(t, p, k)).unwrap_or_default(),
                GenerationConfig::default()
            );
        }
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let config = resolve_parameters(&answers("1.5", "-0.25", "500")).unwrap();
        assert_eq!(config, GenerationConfig::new(1.5, -0.25, 500));

        let config = resolve_parameters(&answers(" 0.5 ", "1", "-3")).unwrap();
        assert_eq!(config, GenerationConfig::new(0.5, 1.0, -3));
    }

    #[test]
    fn non_finite_answers_are_malformed() {
        for (t, p, name) in [
            ("nan", "0.5", "temperature"),
            ("0.5", "inf", "top_p"),
            ("-infinity", "0.5", "temperature"),
            ("1e39", "0.5", "temperature"),
        ] {
            let err = resolve_parameters(&answers(t, p, "")).unwrap_err();
            assert_eq!(err.name, name);
        }
    }

    #[test]
    fn top_k_must_fit_in_i32() {
        let err = resolve_parameters(&answers("", "", "3000000000")).unwrap_err();
        assert_eq!(err.name, "top_k");
        let config = resolve_parameters(&answers("", "", "2147483647")).unwrap();
        assert_eq!(config.top_k, i32::MAX);
    }

    #[test]
    fn malformed_env_line_is_skipped() {
        let file = "# settings\nNOT A VALID LINE\nGEMINI_API_KEY=from-dotenv\n";
        let entries = dotenvy::from_read_iter(file.as_bytes());
        let (vars, skipped) = read_env_entries(".env", entries).unwrap();
        assert_eq!(
            vars,
            vec![("GEMINI_API_KEY".to_string(), "from-dotenv".to_string())]
        );
        assert_eq!(skipped.len(), 1);
        assert!(matches!(skipped[0], Error::Serialization { .. }));
        assert!(skipped[0].to_string().contains("skipped line in .env"));
    }

    #[test]
    fn explicit_env_file_must_exist() {
        let err = load_environment(Some("/nonexistent/gemchat/.env")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
