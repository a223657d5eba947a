//! retouch-core
//!
//! Client library for asynchronous face-restoration inference against a
//! remote submit/poll provider.
//!
//! # Module layout
//! - **domain**: the data model (request validation, prediction records,
//!   outcome taxonomy)
//! - **ports**: abstraction seams ([`InferenceProvider`](ports::InferenceProvider),
//!   [`Clock`](ports::Clock))
//! - **impls**: port implementations (`ReplicateProvider` over HTTP,
//!   `ScriptedProvider` for development and tests)
//! - **client**: the [`Enhancer`] orchestration
//!   (validate → submit → poll → extract → validate result)
//! - **config**: explicit configuration, no ambient environment reads

pub mod client;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use client::Enhancer;
pub use config::{ClientConfig, ModelParams};
pub use domain::{EnhancementOutcome, FailureKind};
