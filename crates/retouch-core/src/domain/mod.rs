//! Domain model (requests, predictions, outcomes).

pub mod outcome;
pub mod prediction;
pub mod request;

pub use outcome::{EnhancementOutcome, FailureKind};
pub use prediction::{Prediction, PredictionId, PredictionOutput, PredictionStatus};
pub use request::{EnhancementRequest, MAX_IMAGE_SIZE, RequestError};
