//! Clock port - time abstraction.
//!
//! Deadline math and the inter-poll delay go through this trait so timeout
//! behavior is testable without real sleeping. Production uses
//! [`SystemClock`]; tests use a manual clock that advances on `sleep`.

use std::time::{Duration, Instant};

use async_trait::async_trait;

#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant on the local monotonic clock.
    fn now(&self) -> Instant;

    /// Suspends the current task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-backed wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
