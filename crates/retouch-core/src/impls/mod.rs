//! Impls - port implementations.
//!
//! - **ReplicateProvider**: production HTTP adapter for the Replicate API
//! - **ScriptedProvider**: in-memory provider for development and tests

pub mod replicate;
pub mod scripted;

pub use self::replicate::ReplicateProvider;
pub use self::scripted::ScriptedProvider;
