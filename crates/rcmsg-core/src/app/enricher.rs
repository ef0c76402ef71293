//! Enricher - drives one fetch cycle of a message through a client.
//!
//! # Flow
//! 1. `Message::fetch` registers the client and the fetch intent
//! 2. `Client::lookup` fetches the requested properties
//! 3. success: `apply` + `resolve_generation`, failure: `fail`
//! 4. the fetch handle is awaited and its result returned
//!
//! The enricher never waits between attempts: `retry` is a hook for
//! whoever schedules retries.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Details, FetchError};
use crate::error::RcError;
use crate::message::Message;
use crate::ports::{Client, LookupRequest};

pub struct Enricher {
    client: Arc<dyn Client>,
}

impl Enricher {
    pub fn new(client: Arc<dyn Client>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn Client> {
        &self.client
    }

    /// Fetch `properties` for `message` on behalf of `interested` modules.
    ///
    /// On a message that was fetched before, the original properties and
    /// modules are used and the arguments are ignored.
    pub async fn enrich<D, P, I>(
        &self,
        message: &mut Message<D>,
        properties: P,
        interested: I,
    ) -> Result<(), FetchError>
    where
        D: Details,
        P: IntoIterator,
        P::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let handle = message.fetch(Arc::clone(&self.client), properties, interested);

        let request = LookupRequest {
            message_type: message.message_type(),
            raw: message.raw(),
            properties: message.requested_properties().unwrap_or(&[]),
            retries: message.retries(),
        };
        let result = self.client.lookup(request).await;

        match result {
            Ok(properties) => {
                message.cache_value(serde_json::to_value(&properties).unwrap_or_default());
                match message.apply(properties) {
                    Ok(()) => {
                        message.resolve_generation(handle.generation());
                    }
                    Err(failure) => message.fail(failure),
                }
            }
            Err(failure) => {
                message.cache_text(format!(
                    "lookup via {} failed after {} retries",
                    self.client.name(),
                    message.retries()
                ));
                message.fail(failure);
            }
        }

        let outcome = handle.await;
        match &outcome {
            Ok(()) => debug!(
                message_type = %message.message_type(),
                client = self.client.name(),
                "message enriched"
            ),
            Err(err) => warn!(
                message_type = %message.message_type(),
                client = self.client.name(),
                %err,
                "message enrichment failed"
            ),
        }
        outcome
    }

    /// Clean up a failed message and fetch again with its original intent.
    pub async fn retry<D: Details>(&self, message: &mut Message<D>) -> Result<(), RcError> {
        let state = message.state();
        if !state.is_retryable() {
            return Err(RcError::NotRetryable(state));
        }
        message.cleanup();

        let properties = message.requested_properties().unwrap_or(&[]).to_vec();
        let interested = message.interested().unwrap_or(&[]).to_vec();
        self.enrich(message, properties, interested).await?;
        Ok(())
    }
}
