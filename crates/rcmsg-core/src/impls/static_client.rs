//! StaticClient - fixture-backed client for development and tests
//!
//! Answers lookups from a fixed property table. It can be told to fail the
//! first N lookups and to take a while, which is enough to drive the whole
//! fetch / error / cleanup / retry cycle without a backend.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{FetchFailure, Properties};
use crate::ports::{Client, LookupRequest};

pub struct StaticClient {
    name: String,
    values: Properties,
    remaining_failures: AtomicU32,
    failure: FetchFailure,
    latency: Option<Duration>,
    lookups: AtomicU32,
}

impl StaticClient {
    pub fn new(name: impl Into<String>, values: Properties) -> Self {
        Self {
            name: name.into(),
            values,
            remaining_failures: AtomicU32::new(0),
            failure: FetchFailure::new("unavailable", "fixture failure"),
            latency: None,
            lookups: AtomicU32::new(0),
        }
    }

    /// Fail the next `n` lookups with `failure`.
    pub fn failing_first(mut self, n: u32, failure: FetchFailure) -> Self {
        self.remaining_failures = AtomicU32::new(n);
        self.failure = failure;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of lookups served so far (failed ones included).
    pub fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Client for StaticClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, request: LookupRequest<'_>) -> Result<Properties, FetchFailure> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let failed = self
            .remaining_failures
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(self.failure.clone());
        }

        // Properties missing from the table are left out of the answer.
        Ok(request
            .properties
            .iter()
            .filter_map(|name| self.values.get(name).map(|v| (name.clone(), v.clone())))
            .collect())
    }
}
