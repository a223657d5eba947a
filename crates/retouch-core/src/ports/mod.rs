//! Ports - abstraction seams between the client and the outside world.
//!
//! Each trait hides an external dependency so the orchestration in
//! [`crate::client`] can be exercised without network or real time:
//! - [`InferenceProvider`]: the remote service's submit/poll surface
//! - [`Clock`]: current instant and suspension

pub mod clock;
pub mod provider;

pub use self::clock::{Clock, SystemClock};
pub use self::provider::{InferenceProvider, ProviderError};
