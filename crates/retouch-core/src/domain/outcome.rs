//! Outcome model: the typed result of one enhancement call.
//!
//! Expected failures are values, never panics. The failure kind is produced
//! directly at the classification site; it is never inferred from message
//! text after the fact.

use serde::{Deserialize, Serialize};

/// Classification of an enhancement failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Empty payload or payload over the size limit.
    InvalidInput,

    /// Missing or unusable provider credential.
    Configuration,

    /// The poll loop exceeded the wall-clock deadline.
    Timeout,

    /// The provider signalled rate limiting.
    RateLimited,

    /// Prediction failed, output missing or malformed, or a transport error
    /// during submit/poll.
    Provider,

    /// The caller aborted the call via the cancellation signal.
    Cancelled,
}

impl FailureKind {
    /// Conventional transport status for HTTP adapters sitting above the
    /// client.
    pub fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::Configuration => 500,
            Self::Timeout => 504,
            Self::RateLimited => 429,
            Self::Provider => 500,
            Self::Cancelled => 499,
        }
    }
}

/// Result of one `enhance` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EnhancementOutcome {
    /// `url` is a syntactically valid absolute URL pointing at the restored
    /// image.
    Success { url: String },

    /// A terminal, classified failure. `message` is human-readable and never
    /// carries provider stack traces or internal identifiers.
    Failure { kind: FailureKind, message: String },
}

impl EnhancementOutcome {
    pub fn success(url: impl Into<String>) -> Self {
        Self::Success { url: url.into() }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
