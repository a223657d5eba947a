//! Enhancement client: validate → submit → poll → extract → validate result.
//!
//! One invocation runs to completion (success or a classified failure) and
//! holds no state afterwards. Concurrent invocations share nothing but the
//! provider itself, so an `Enhancer` can sit behind an `Arc` and serve one
//! task per request.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use url::Url;

use crate::config::ClientConfig;
use crate::domain::{
    EnhancementOutcome, EnhancementRequest, FailureKind, Prediction, PredictionStatus,
};
use crate::ports::{Clock, InferenceProvider, ProviderError, SystemClock};

/// Orchestrates one enhancement request against a remote provider.
pub struct Enhancer<C = SystemClock> {
    provider: Arc<dyn InferenceProvider>,
    config: ClientConfig,
    clock: C,
}

impl Enhancer<SystemClock> {
    pub fn new(provider: Arc<dyn InferenceProvider>, config: ClientConfig) -> Self {
        Self::with_clock(provider, config, SystemClock)
    }
}

impl<C: Clock> Enhancer<C> {
    pub fn with_clock(provider: Arc<dyn InferenceProvider>, config: ClientConfig, clock: C) -> Self {
        if config.poll_interval >= config.timeout {
            log::warn!(
                "poll interval {:?} is not shorter than timeout {:?}; the first poll may never run",
                config.poll_interval,
                config.timeout
            );
        }
        Self {
            provider,
            config,
            clock,
        }
    }

    /// Runs one enhancement to completion.
    pub async fn enhance(&self, image_bytes: Vec<u8>) -> EnhancementOutcome {
        let (_keep_alive, cancel) = watch::channel(false);
        self.enhance_with_cancel(image_bytes, cancel).await
    }

    /// Like [`enhance`](Self::enhance), but aborts with a `Cancelled` failure
    /// once the watch value flips to `true`. A dropped sender means
    /// cancellation can no longer happen; the call then runs to its normal
    /// termination.
    pub async fn enhance_with_cancel(
        &self,
        image_bytes: Vec<u8>,
        mut cancel: watch::Receiver<bool>,
    ) -> EnhancementOutcome {
        let request = match EnhancementRequest::new(image_bytes) {
            Ok(request) => request,
            Err(err) => return EnhancementOutcome::failure(FailureKind::InvalidInput, err.to_string()),
        };

        if self.config.credential.is_none() {
            return EnhancementOutcome::failure(
                FailureKind::Configuration,
                "provider credential not configured",
            );
        }

        let image = request.to_data_uri();

        // The deadline is fixed at submission time: submission latency counts
        // against the budget, and the value is read immutably from here on.
        let deadline = self.clock.now() + self.config.timeout;

        log::debug!(
            "creating prediction ({} byte payload)",
            request.image_bytes().len()
        );
        let prediction = match self.provider.create_prediction(&image, &self.config.model_params).await
        {
            Ok(prediction) => prediction,
            Err(err) => return classify_provider_error(err),
        };
        log::debug!("prediction {} created, polling", prediction.id);

        match self.poll_until_terminal(prediction, deadline, &mut cancel).await {
            Ok(succeeded) => extract_output(succeeded),
            Err(failure) => failure,
        }
    }

    /// Polls until the prediction succeeds, fails, the deadline passes, or
    /// the caller cancels. The local-clock deadline is the sole termination
    /// guarantee; there is no iteration cap.
    async fn poll_until_terminal(
        &self,
        submitted: Prediction,
        deadline: Instant,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<Prediction, EnhancementOutcome> {
        let id = submitted.id.clone();
        let mut prediction = submitted;

        loop {
            match prediction.status {
                PredictionStatus::Succeeded => return Ok(prediction),
                PredictionStatus::Failed => {
                    let message = prediction
                        .error
                        .unwrap_or_else(|| "prediction failed".to_owned());
                    return Err(EnhancementOutcome::failure(FailureKind::Provider, message));
                }
                PredictionStatus::Canceled => {
                    return Err(EnhancementOutcome::failure(
                        FailureKind::Provider,
                        "prediction canceled by provider",
                    ));
                }
                // Starting, Processing and anything unrecognized: keep waiting.
                _ => {}
            }

            if self.clock.now() >= deadline {
                return Err(EnhancementOutcome::failure(
                    FailureKind::Timeout,
                    "prediction timeout",
                ));
            }

            if *cancel.borrow() {
                return Err(cancelled());
            }

            tokio::select! {
                _ = self.clock.sleep(self.config.poll_interval) => {}
                _ = wait_cancelled(cancel) => return Err(cancelled()),
            }

            prediction = match self.provider.get_prediction(&id).await {
                Ok(prediction) => prediction,
                Err(err) => return Err(classify_provider_error(err)),
            };
        }
    }
}

/// Resolves once the cancellation signal flips to `true`. A dropped sender
/// parks forever so the enclosing `select!` falls through to the sleep.
async fn wait_cancelled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn cancelled() -> EnhancementOutcome {
    EnhancementOutcome::failure(FailureKind::Cancelled, "enhancement cancelled")
}

/// Maps a typed provider error onto the failure taxonomy.
fn classify_provider_error(err: ProviderError) -> EnhancementOutcome {
    let kind = match err {
        ProviderError::RateLimited => FailureKind::RateLimited,
        ProviderError::Config(_) => FailureKind::Configuration,
        ProviderError::Api { .. } | ProviderError::Transport(_) | ProviderError::Decode(_) => {
            FailureKind::Provider
        }
    };
    EnhancementOutcome::failure(kind, err.to_string())
}

/// A succeeded prediction with no output, or an output that is not an
/// absolute URL, is a provider contract violation: the caller never receives
/// an unvalidated reference.
fn extract_output(prediction: Prediction) -> EnhancementOutcome {
    let candidate = match prediction.output.as_ref().and_then(|output| output.primary()) {
        Some(candidate) => candidate,
        None => return EnhancementOutcome::failure(FailureKind::Provider, "no output received"),
    };

    match Url::parse(candidate) {
        Ok(_) => EnhancementOutcome::success(candidate),
        Err(err) => {
            log::warn!("provider returned an unparseable output URL: {err}");
            EnhancementOutcome::failure(FailureKind::Provider, "invalid URL received")
        }
    }
}
