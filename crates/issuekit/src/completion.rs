//! Completion provider boundary
//!
//! The analyzer hands a rendered prompt to a [`CompletionProvider`] and
//! expects a single text blob back. Failures and blank output are surfaced
//! to the caller, which decides whether to fall back.

use crate::error::IssueError;
use async_trait::async_trait;

/// Trait for text-completion backends
///
/// Implement this trait to connect a language model service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider identifier (for logging and error messages)
    fn name(&self) -> &'static str;

    /// Complete a prompt
    async fn complete(&self, prompt: &str) -> Result<String, IssueError>;
}

/// Provider returning a fixed response
///
/// Useful for tests and for replaying a completion produced elsewhere.
#[derive(Debug, Clone)]
pub struct CannedCompletion {
    response: Result<String, String>,
}

impl CannedCompletion {
    /// Always complete with `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
        }
    }
}

#[async_trait]
impl CompletionProvider for CannedCompletion {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, IssueError> {
        self.response
            .clone()
            .map_err(|message| IssueError::CompletionFailed {
                provider: self.name(),
                message,
            })
    }
}
