//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript
//! and forwards each user turn to a [`Completion`] backend.

use crate::chat::config::ChatConfig;
use crate::completion::Completion;
use crate::error::{Error, Result};
use crate::observability::{CHAT_TURN_ERRORS, CHAT_TURNS};
use crate::types::{GenerationConfig, Model, Turn};

/// The word that ends a session, compared without regard to case.
pub const EXIT_SENTINEL: &str = "exit";

/// Returns true if `text` asks to end the session.
pub fn is_exit_sentinel(text: &str) -> bool {
    text.to_lowercase() == EXIT_SENTINEL
}

/// Lifecycle of a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for the next user turn.
    AwaitingInput,
    /// The user asked to exit; no further turns are accepted.
    Terminated,
}

/// The outcome of submitting one line of user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The model's reply, already appended to the transcript.
    Reply(String),
    /// The exit sentinel was submitted and the session is terminated.
    Exit,
}

/// A chat session that manages conversation state and API interactions.
///
/// The transcript strictly alternates user and model turns: a user turn is
/// kept only once its reply has been appended.
///
/// # Example
///
/// ```
/// use gemchat::chat::{ChatConfig, ChatSession, Submission};
/// use gemchat::{Completion, GenerationConfig, Model, Result, Turn};
///
/// struct Parrot;
///
/// #[async_trait::async_trait]
/// impl Completion for Parrot {
///     async fn complete(&self, _: &Model, _: &GenerationConfig, context: &[Turn]) -> Result<String> {
///         Ok(context.last().map(|t| t.text().to_uppercase()).unwrap_or_default())
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let mut session = ChatSession::new(Parrot, ChatConfig::default());
/// assert_eq!(session.submit("hi").await.unwrap(), Submission::Reply("HI".to_string()));
/// assert_eq!(session.submit("exit").await.unwrap(), Submission::Exit);
/// assert_eq!(session.turn_count(), 2);
/// # });
/// ```
pub struct ChatSession<C: Completion> {
    completion: C,
    config: ChatConfig,
    transcript: Vec<Turn>,
    state: SessionState,
}

impl<C: Completion> ChatSession<C> {
    /// Creates a new chat session with an empty transcript.
    pub fn new(completion: C, config: ChatConfig) -> Self {
        Self {
            completion,
            config,
            transcript: Vec::new(),
            state: SessionState::AwaitingInput,
        }
    }

    /// Submits one line of user text.
    ///
    /// The exit sentinel terminates the session without touching the
    /// transcript.  Anything else is appended as a user turn, sent along with
    /// the whole transcript, and answered by a model turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is already terminated or if the
    /// completion fails.  On failure the transcript is left as it was.
    pub async fn submit(&mut self, text: &str) -> Result<Submission> {
        if self.state == SessionState::Terminated {
            return Err(Error::session("session has been terminated"));
        }
        if is_exit_sentinel(text) {
            self.state = SessionState::Terminated;
            return Ok(Submission::Exit);
        }

        let previous_len = self.transcript.len();
        self.transcript.push(Turn::user(text));

        let outcome = self
            .completion
            .complete(&self.config.model, &self.config.generation, &self.transcript)
            .await;

        match outcome {
            Ok(reply) => {
                CHAT_TURNS.click();
                self.transcript.push(Turn::model(reply.clone()));
                Ok(Submission::Reply(reply))
            }
            Err(err) => {
                CHAT_TURN_ERRORS.click();
                self.transcript.truncate(previous_len);
                Err(err)
            }
        }
    }

    /// Returns the transcript, oldest turn first.
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Returns the number of turns in the transcript.
    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns true once the exit sentinel has been submitted.
    pub fn is_terminated(&self) -> bool {
        self.state == SessionState::Terminated
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.config.model
    }

    /// Returns the generation parameters.
    pub fn generation(&self) -> &GenerationConfig {
        &self.config.generation
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::types::Role;

    /// Replies with "echo: <last text>" and records every context it saw.
    #[derive(Default)]
    struct EchoCompletion {
        contexts: Mutex<Vec<Vec<Turn>>>,
    }

    #[async_trait::async_trait]
    impl Completion for EchoCompletion {
        async fn complete(
            &self,
            _model: &Model,
            _generation_config: &GenerationConfig,
            context: &[Turn],
        ) -> Result<String> {
            self.contexts.lock().unwrap().push(context.to_vec());
            let last = context.last().map(Turn::text).unwrap_or_default();
            Ok(format!("echo: {last}"))
        }
    }

    struct FailingCompletion;

    #[async_trait::async_trait]
    impl Completion for FailingCompletion {
        async fn complete(
            &self,
            _model: &Model,
            _generation_config: &GenerationConfig,
            _context: &[Turn],
        ) -> Result<String> {
            Err(Error::service_unavailable("overloaded", None))
        }
    }

    #[test]
    fn exit_sentinel_ignores_case() {
        assert!(is_exit_sentinel("exit"));
        assert!(is_exit_sentinel("EXIT"));
        assert!(is_exit_sentinel("eXiT"));
        assert!(!is_exit_sentinel("exit "));
        assert!(!is_exit_sentinel("quit"));
        assert!(!is_exit_sentinel(""));
    }

    #[test]
    fn new_session_empty() {
        let session = ChatSession::new(EchoCompletion::default(), ChatConfig::default());
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.state(), SessionState::AwaitingInput);
        assert_eq!(session.model(), &Model::default());
        assert_eq!(session.generation(), &GenerationConfig::default());
    }

    #[tokio::test]
    async fn submit_appends_user_and_model_turns() {
        let mut session = ChatSession::new(EchoCompletion::default(), ChatConfig::default());

        let outcome = session.submit("hello").await.unwrap();
        assert_eq!(outcome, Submission::Reply("echo: hello".to_string()));
        assert_eq!(session.turn_count(), 2);

        let outcome = session.submit("again").await.unwrap();
        assert_eq!(outcome, Submission::Reply("echo: again".to_string()));
        assert_eq!(session.turn_count(), 4);

        let roles: Vec<Role> = session.transcript().iter().map(Turn::role).collect();
        assert_eq!(roles, vec![Role::User, Role::Model, Role::User, Role::Model]);
        assert_eq!(session.transcript()[3].text(), "echo: again");
    }

    #[tokio::test]
    async fn completion_sees_full_transcript() {
        let completion = std::sync::Arc::new(EchoCompletion::default());
        let mut session = ChatSession::new(completion.clone(), ChatConfig::default());
        session.submit("one").await.unwrap();
        session.submit("two").await.unwrap();

        let contexts = completion.contexts.lock().unwrap();
        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0], vec![Turn::user("one")]);
        assert_eq!(
            contexts[1],
            vec![Turn::user("one"), Turn::model("echo: one"), Turn::user("two")]
        );
    }

    #[tokio::test]
    async fn exit_terminates_without_turns() {
        let mut session = ChatSession::new(EchoCompletion::default(), ChatConfig::default());
        session.submit("hello").await.unwrap();

        let outcome = session.submit("Exit").await.unwrap();
        assert_eq!(outcome, Submission::Exit);
        assert!(session.is_terminated());
        assert_eq!(session.turn_count(), 2);
    }

    #[tokio::test]
    async fn exit_as_first_turn() {
        let mut session = ChatSession::new(EchoCompletion::default(), ChatConfig::default());
        assert_eq!(session.submit("EXIT").await.unwrap(), Submission::Exit);
        assert_eq!(session.turn_count(), 0);
    }

    #[tokio::test]
    async fn submit_after_exit_is_rejected() {
        let mut session = ChatSession::new(EchoCompletion::default(), ChatConfig::default());
        session.submit("exit").await.unwrap();
        let err = session.submit("hello").await.unwrap_err();
        assert!(err.is_session());
        assert_eq!(session.turn_count(), 0);
    }

    #[tokio::test]
    async fn failure_leaves_transcript_unchanged() {
        let mut session = ChatSession::new(FailingCompletion, ChatConfig::default());
        let err = session.submit("hello").await.unwrap_err();
        assert!(err.is_server_error());
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.state(), SessionState::AwaitingInput);
    }
}
