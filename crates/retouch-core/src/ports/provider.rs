//! InferenceProvider port - the remote service's submit/poll surface.
//!
//! The provider is a black box: the client only creates a prediction and
//! re-reads it by id. Errors are typed at this boundary so the client never
//! classifies failures by matching message text.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ModelParams;
use crate::domain::{Prediction, PredictionId};

/// Failure surfaced by a provider adapter.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider rate limit exceeded")]
    RateLimited,

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider misconfigured: {0}")]
    Config(String),
}

/// The remote inference service.
///
/// `create_prediction` is called at most once per enhancement.
/// `get_prediction` must tolerate one call per poll interval for the whole
/// deadline window.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Submits a new prediction. `image` is a data reference the provider
    /// can consume directly (a `data:` URI in this crate).
    async fn create_prediction(
        &self,
        image: &str,
        params: &ModelParams,
    ) -> Result<Prediction, ProviderError>;

    /// Fetches the current snapshot of a prediction by id.
    async fn get_prediction(&self, id: &PredictionId) -> Result<Prediction, ProviderError>;
}
