//! ReplicateProvider - HTTP adapter for the Replicate predictions API.
//!
//! Implements the submit/poll surface over `POST /v1/predictions` and
//! `GET /v1/predictions/{id}`. HTTP 429 becomes `ProviderError::RateLimited`
//! at this boundary; the client never inspects message text to classify.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};

use crate::config::ModelParams;
use crate::domain::{Prediction, PredictionId};
use crate::ports::{InferenceProvider, ProviderError};

/// Version hash of the CodeFormer face-restoration deployment.
pub const CODEFORMER_VERSION: &str =
    "7de2ea26c616d5bf2245ad0d5e24f0ff9a6204578a5c876db53142edd9d2cd56";

const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

/// Request body for prediction creation.
#[derive(Debug, Serialize)]
struct CreatePredictionBody<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

/// Model input as the CodeFormer deployment expects it.
#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    image: &'a str,
    codeformer_fidelity: f64,
    background_enhance: bool,
    face_upsample: bool,
    upscale: u32,
}

/// Error body shape of the Replicate API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: String,
}

#[derive(Debug)]
pub struct ReplicateProvider {
    client: Client,
    base_url: String,
    version: String,
}

impl ReplicateProvider {
    /// Builds a provider with the credential baked into default headers.
    pub fn new(token: &str) -> Result<Self, ProviderError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Same as [`new`](Self::new) with a non-default API endpoint (proxies,
    /// record/replay test servers).
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, ProviderError> {
        let mut auth = header::HeaderValue::from_str(&format!("Token {token}"))
            .map_err(|_| ProviderError::Config("credential is not a valid header value".into()))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            version: CODEFORMER_VERSION.to_owned(),
        })
    }

    /// Overrides the model version hash.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    async fn decode(response: reqwest::Response) -> Result<Prediction, ProviderError> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Pulls the `detail` field out of a Replicate error body, falling back to
/// the raw body when it has some other shape.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.detail,
        Err(_) => body.to_owned(),
    }
}

#[async_trait]
impl InferenceProvider for ReplicateProvider {
    async fn create_prediction(
        &self,
        image: &str,
        params: &ModelParams,
    ) -> Result<Prediction, ProviderError> {
        let body = CreatePredictionBody {
            version: &self.version,
            input: PredictionInput {
                image,
                codeformer_fidelity: params.fidelity,
                background_enhance: params.background_enhance,
                face_upsample: params.face_upsample,
                upscale: params.upscale,
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_prediction(&self, id: &PredictionId) -> Result<Prediction, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1/predictions/{id}", self.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_matches_the_wire_format() {
        let params = ModelParams::default();
        let body = CreatePredictionBody {
            version: CODEFORMER_VERSION,
            input: PredictionInput {
                image: "data:image/jpeg;base64,AAAA",
                codeformer_fidelity: params.fidelity,
                background_enhance: params.background_enhance,
                face_upsample: params.face_upsample,
                upscale: params.upscale,
            },
        };

        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["version"], CODEFORMER_VERSION);
        assert_eq!(v["input"]["image"], "data:image/jpeg;base64,AAAA");
        assert_eq!(v["input"]["codeformer_fidelity"], 0.7);
        assert_eq!(v["input"]["background_enhance"], true);
        assert_eq!(v["input"]["face_upsample"], true);
        assert_eq!(v["input"]["upscale"], 2);
    }

    #[test]
    fn error_message_prefers_the_detail_field() {
        assert_eq!(
            error_message(r#"{"detail": "invalid version"}"#),
            "invalid version"
        );
        assert_eq!(error_message("plain text error"), "plain text error");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let provider = ReplicateProvider::with_base_url("tok", "http://localhost:9000/").unwrap();
        assert_eq!(provider.base_url, "http://localhost:9000");
    }

    #[test]
    fn credential_with_control_characters_is_rejected() {
        let err = ReplicateProvider::new("bad\ntoken").unwrap_err();
        assert!(matches!(err, ProviderError::Config(_)));
    }
}
