//! The completion capability a chat session depends on.

use crate::client::Gemini;
use crate::error::Result;
use crate::types::{GenerateContentRequest, GenerationConfig, Model, Turn};

/// Produces the model's next reply given the conversation so far.
///
/// `context` always ends with the user turn being answered.  Implementations
/// must not retry; failures are returned to the caller as-is.
#[async_trait::async_trait]
pub trait Completion: Send + Sync {
    /// Generate the reply to the last turn of `context`.
    async fn complete(
        &self,
        model: &Model,
        generation_config: &GenerationConfig,
        context: &[Turn],
    ) -> Result<String>;
}

#[async_trait::async_trait]
impl Completion for Gemini {
    async fn complete(
        &self,
        model: &Model,
        generation_config: &GenerationConfig,
        context: &[Turn],
    ) -> Result<String> {
        let request = GenerateContentRequest::from_turns(context, *generation_config);
        self.generate_content(model, &request).await?.text()
    }
}

#[async_trait::async_trait]
impl<C: Completion + ?Sized> Completion for std::sync::Arc<C> {
    async fn complete(
        &self,
        model: &Model,
        generation_config: &GenerationConfig,
        context: &[Turn],
    ) -> Result<String> {
        (**self).complete(model, generation_config, context).await
    }
}
