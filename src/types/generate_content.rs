use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Content, GenerationConfig, Turn};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation so far, oldest first.
    pub contents: Vec<Content>,

    /// Sampling parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Build a request carrying the whole transcript as context.
    pub fn from_turns(turns: &[Turn], generation_config: GenerationConfig) -> Self {
        Self {
            contents: turns.iter().map(Content::from).collect(),
            generation_config: Some(generation_config),
        }
    }
}

/// Response body of `generateContent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate replies; the first one is the reply.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Feedback about the prompt, present when the prompt was blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token accounting for the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// The model version that produced the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

/// A single candidate reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped, e.g. `STOP`, `MAX_TOKENS` or `SAFETY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token counts reported by the API.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: u64,

    /// Tokens across all candidates.
    #[serde(default)]
    pub candidates_token_count: u64,

    /// Prompt and candidate tokens together.
    #[serde(default)]
    pub total_token_count: u64,
}

impl GenerateContentResponse {
    /// The text of the first candidate.
    ///
    /// A response without a candidate, or whose first candidate carries no
    /// text, is an [`Error::EmptyResponse`] naming the block or finish reason.
    pub fn text(&self) -> Result<String> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason.clone());
            return Err(Error::empty_response("response has no candidates", reason));
        };
        let text = candidate
            .content
            .as_ref()
            .map(Content::joined_text)
            .unwrap_or_default();
        if text.is_empty() {
            return Err(Error::empty_response(
                "candidate has no text",
                candidate.finish_reason.clone(),
            ));
        }
        Ok(text)
    }
}
