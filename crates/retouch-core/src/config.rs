//! Client configuration: explicit values passed in at construction.
//!
//! Nothing in this crate reads the process environment; wiring code (the CLI,
//! an HTTP server) resolves credentials and hands them over here. This keeps
//! the client testable without environment mutation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default delay between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default hard deadline for one prediction, measured from submission.
pub const PREDICTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Parameters of the restoration model. Static configuration, not user
/// input: every enhancement in a deployment runs with the same set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Balance between fidelity to the input face and restoration strength.
    pub fidelity: f64,

    /// Output upscale factor.
    pub upscale: u32,

    pub background_enhance: bool,
    pub face_upsample: bool,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            fidelity: 0.7,
            upscale: 2,
            background_enhance: true,
            face_upsample: true,
        }
    }
}

/// Configuration for [`Enhancer`](crate::client::Enhancer).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Provider API credential. `None` means unconfigured: `enhance` returns
    /// a `Configuration` failure before any remote call.
    pub credential: Option<String>,

    /// Fixed delay between polls. Deliberately constant, no jitter: the
    /// provider's predictions resolve quickly, so a short fixed interval
    /// minimizes added latency while bounding request volume.
    pub poll_interval: Duration,

    /// Hard wall-clock deadline measured from submission time (submission
    /// latency counts against it). Must exceed `poll_interval`, or the loop
    /// overshoots the deadline by up to one interval.
    pub timeout: Duration,

    pub model_params: ModelParams,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credential: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: PREDICTION_TIMEOUT,
            model_params: ModelParams::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults with a credential set.
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployment_constants() {
        let config = ClientConfig::default();
        assert!(config.credential.is_none());
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.poll_interval < config.timeout);
    }

    #[test]
    fn default_model_params_match_the_codeformer_deployment() {
        let params = ModelParams::default();
        assert_eq!(params.fidelity, 0.7);
        assert_eq!(params.upscale, 2);
        assert!(params.background_enhance);
        assert!(params.face_upsample);
    }

    #[test]
    fn with_credential_sets_only_the_credential() {
        let config = ClientConfig::with_credential("tok");
        assert_eq!(config.credential.as_deref(), Some("tok"));
        assert_eq!(config.timeout, PREDICTION_TIMEOUT);
    }
}
