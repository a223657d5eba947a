//! ScriptedProvider - in-memory provider for development and tests.
//!
//! Responses follow a fixed script: an optional submission failure, then a
//! queue of poll steps consumed in order. Once the scripted polls run out the
//! provider keeps reporting a pending snapshot, which makes "never reaches a
//! terminal state" the default behavior. Call counts are recorded so tests
//! can assert how many provider round-trips an enhancement performed.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::config::ModelParams;
use crate::domain::{Prediction, PredictionId, PredictionOutput, PredictionStatus};
use crate::ports::{InferenceProvider, ProviderError};

/// One scripted poll response.
pub type PollStep = Result<Prediction, ProviderError>;

pub struct ScriptedProvider {
    id: PredictionId,
    fail_create: Mutex<Option<ProviderError>>,
    polls: Mutex<VecDeque<PollStep>>,
    create_calls: AtomicUsize,
    poll_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            id: PredictionId::new("scripted-prediction"),
            fail_create: Mutex::new(None),
            polls: Mutex::new(VecDeque::new()),
            create_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
        }
    }

    /// A non-terminal snapshot of the scripted prediction.
    pub fn pending(&self) -> Prediction {
        Prediction {
            id: self.id.clone(),
            status: PredictionStatus::Processing,
            output: None,
            error: None,
            created_at: None,
        }
    }

    /// A succeeded snapshot carrying `output`.
    pub fn succeeded(&self, output: PredictionOutput) -> Prediction {
        Prediction {
            status: PredictionStatus::Succeeded,
            output: Some(output),
            ..self.pending()
        }
    }

    /// A failed snapshot carrying the provider diagnostic `error`.
    pub fn failed(&self, error: &str) -> Prediction {
        Prediction {
            status: PredictionStatus::Failed,
            error: Some(error.to_owned()),
            ..self.pending()
        }
    }

    /// Appends one poll response to the script.
    pub fn enqueue_poll(&self, step: PollStep) {
        self.polls.lock().unwrap().push_back(step);
    }

    /// Makes the next submission fail with `err`.
    pub fn fail_next_create(&self, err: ProviderError) {
        *self.fail_create.lock().unwrap() = Some(err);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    async fn create_prediction(
        &self,
        _image: &str,
        _params: &ModelParams,
    ) -> Result<Prediction, ProviderError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_create.lock().unwrap().take() {
            return Err(err);
        }
        Ok(Prediction {
            status: PredictionStatus::Starting,
            ..self.pending()
        })
    }

    async fn get_prediction(&self, _id: &PredictionId) -> Result<Prediction, ProviderError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        match self.polls.lock().unwrap().pop_front() {
            Some(step) => step,
            None => Ok(self.pending()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn polls_follow_the_script_then_stay_pending() {
        let provider = ScriptedProvider::new();
        provider.enqueue_poll(Ok(provider.failed("boom")));

        let id = PredictionId::new("scripted-prediction");
        let first = provider.get_prediction(&id).await.unwrap();
        assert_eq!(first.status, PredictionStatus::Failed);

        let second = provider.get_prediction(&id).await.unwrap();
        assert_eq!(second.status, PredictionStatus::Processing);
        assert_eq!(provider.poll_calls(), 2);
    }

    #[tokio::test]
    async fn create_failure_is_consumed_once() {
        let provider = ScriptedProvider::new();
        provider.fail_next_create(ProviderError::RateLimited);

        let params = ModelParams::default();
        assert!(provider.create_prediction("data:", &params).await.is_err());
        assert!(provider.create_prediction("data:", &params).await.is_ok());
        assert_eq!(provider.create_calls(), 2);
    }
}
