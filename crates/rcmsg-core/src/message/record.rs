//! Message record: raw line + type tag + fetch bookkeeping.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::{debug, error, warn};

use super::signal::{self, FetchHandle, Generation, Settler};
use super::view::MessageView;
use crate::domain::{
    Details, ErrorState, FetchError, FetchFailure, MessageState, MessageType, Properties, SetOnce,
};
use crate::ports::{Client, Parser, ParserContext};

/// Cache slot for values a driver computed while enriching a message.
///
/// Text entries double as diagnostics: they are the only internal value a
/// serialized message exposes (as `_cached`).
#[derive(Debug, Clone, PartialEq)]
pub enum Cached {
    Text(String),
    Value(serde_json::Value),
}

impl Cached {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cached::Text(text) => Some(text),
            Cached::Value(_) => None,
        }
    }
}

/// One parsed feed event awaiting optional enrichment.
///
/// Design:
/// - `raw` and `message_type` are fixed by the parser.
/// - The fetch intent (requested properties, interested modules) is written
///   once, by the first `fetch`, and survives every cleanup.
/// - Client, pending signal and cache are transient: cleared by `cleanup`
///   and never serialized.
///
/// The message has no interior locking. A single driver holds it mutably at
/// a time; distinct messages can be processed on different tasks.
pub struct Message<D: Details = Properties> {
    raw: String,
    message_type: MessageType,

    error: ErrorState,
    error_message: Option<String>,
    error_details: Option<serde_json::Value>,

    properties: SetOnce<Vec<String>>,
    interested: SetOnce<Vec<String>>,

    /// Number of cleanups so far.
    retries: u32,

    details: D,
    state: MessageState,

    /// Bumped by every cleanup and by a superseding fetch; tags every
    /// signal handed out.
    generation: Generation,

    parser: Arc<ParserContext>,
    client: Option<Arc<dyn Client>>,
    pending: Option<Settler>,
    cached: Option<Cached>,
}

impl<D: Details> Message<D> {
    pub fn new<P>(parser: &P, raw: impl Into<String>, message_type: impl Into<MessageType>) -> Self
    where
        P: Parser<D> + ?Sized,
    {
        Self {
            raw: raw.into(),
            message_type: message_type.into(),
            error: ErrorState::None,
            error_message: None,
            error_details: None,
            properties: SetOnce::new(),
            interested: SetOnce::new(),
            retries: 0,
            details: D::default(),
            state: MessageState::Created,
            generation: Generation::ZERO,
            parser: Arc::clone(parser.context()),
            client: None,
            pending: None,
            cached: None,
        }
    }

    /// Start fetching more details about the message.
    ///
    /// - `client` is stored unconditionally: the latest driver wins, so the
    ///   client may change between retries.
    /// - `properties` and `interested` are stored only by the first call;
    ///   later values are ignored.
    ///
    /// Every call hands out a new signal. A signal still pending from an
    /// earlier call is rejected with [`FetchError::Superseded`] and the
    /// generation moves on, so the superseded lookup can no longer settle
    /// the new signal through [`resolve_generation`](Self::resolve_generation).
    /// Keeping a single fetch in flight per message is the caller's job; the
    /// message does not refuse a second one.
    pub fn fetch<P, I>(&mut self, client: Arc<dyn Client>, properties: P, interested: I) -> FetchHandle
    where
        P: IntoIterator,
        P::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        debug!(
            message_type = %self.message_type,
            client = client.name(),
            generation = %self.generation,
            "fetch registered"
        );
        self.client = Some(client);

        let properties = properties.into_iter().map(Into::into).collect();
        if self.properties.set(properties).is_err() {
            debug!(message_type = %self.message_type, "keeping properties from the first fetch");
        }
        let interested = interested.into_iter().map(Into::into).collect();
        if self.interested.set(interested).is_err() {
            debug!(message_type = %self.message_type, "keeping interested modules from the first fetch");
        }

        if let Some(previous) = self.pending.take() {
            warn!(
                message_type = %self.message_type,
                generation = %previous.generation(),
                "fetch called while another fetch was pending"
            );
            previous.reject(FetchError::Superseded);
            self.generation = self.generation.next();
        }
        let (settler, handle) = signal::channel(self.generation);
        self.pending = Some(settler);
        self.state = MessageState::Fetching;
        handle
    }

    /// Mark the message as errored out and reject the pending signal, if any.
    ///
    /// This is the failure path of whoever implements the property lookup.
    /// Without a pending fetch it only updates the error fields.
    pub fn mark_error(
        &mut self,
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) {
        let code = code.into();
        let message = message.into();
        debug!(message_type = %self.message_type, code = %code, "fetch marked as failed");

        self.error = ErrorState::Code(code.clone());
        self.error_message = Some(message.clone());
        self.error_details = Some(details);
        self.state = MessageState::Failed;

        if let Some(settler) = self.pending.take() {
            settler.reject(FetchError::Failed { code, message });
        }
    }

    /// [`mark_error`](Self::mark_error) from a client-reported failure.
    pub fn fail(&mut self, failure: FetchFailure) {
        self.mark_error(failure.code, failure.message, failure.details);
    }

    /// Fold looked-up properties into the variant's fields.
    ///
    /// All or nothing: on `Err` the details are left as they were.
    pub fn apply(&mut self, properties: Properties) -> Result<(), FetchFailure> {
        let mut details = self.details.clone();
        details.apply(properties)?;
        self.details = details;
        Ok(())
    }

    /// Fulfil the pending signal.
    ///
    /// Returns `false` and changes nothing when no signal is pending, which
    /// is the case after an error or a cleanup.
    pub fn resolve(&mut self) -> bool {
        let Some(settler) = self.pending.take() else {
            debug!(message_type = %self.message_type, "resolve ignored, no pending fetch");
            return false;
        };
        self.state = MessageState::Succeeded;
        settler.resolve();
        true
    }

    /// Fulfil the pending signal only if it belongs to `generation`.
    ///
    /// A driver that kept the generation of its fetch handle uses this so a
    /// late success from before a cleanup cannot settle the new attempt.
    pub fn resolve_generation(&mut self, generation: Generation) -> bool {
        if generation != self.generation {
            debug!(
                message_type = %self.message_type,
                stale = %generation,
                current = %self.generation,
                "stale resolution ignored"
            );
            return false;
        }
        self.resolve()
    }

    /// Clean up after a failed fetch.
    ///
    /// Requested properties and interested modules stay: they are generated
    /// by the driver only once and feed the next attempt. Looked-up details
    /// do not; the next attempt starts from empty ones.
    pub fn cleanup(&mut self) {
        self.error = ErrorState::None;
        self.error_message = None;
        self.error_details = None;
        self.details = D::default();
        self.cached = None;
        self.client = None;
        if let Some(settler) = self.pending.take() {
            settler.reject(FetchError::Abandoned);
        }
        self.generation = self.generation.next();
        self.retries += 1;
        self.state = MessageState::Created;
        debug!(
            message_type = %self.message_type,
            retries = self.retries,
            generation = %self.generation,
            "message cleaned up"
        );
    }

    /// Serializable view: public fields, the variant's details and a text
    /// cache entry. Never fails.
    pub fn serialize(&self) -> MessageView<'_, D> {
        MessageView {
            raw: &self.raw,
            message_type: &self.message_type,
            error: &self.error,
            errmsg: self.error_message.as_deref(),
            errdetails: self.error_details.as_ref(),
            retries: self.retries,
            cached: self.cached.as_ref().and_then(Cached::as_text),
            details: &self.details,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.serialize()).unwrap_or_else(|err| {
            error!(message_type = %self.message_type, %err, "failed to serialize message");
            serde_json::Value::Null
        })
    }

    /// Modules interested in the message; `None` before the first fetch.
    pub fn interested(&self) -> Option<&[String]> {
        self.interested.get().map(Vec::as_slice)
    }

    /// Properties requested by the first fetch.
    pub fn requested_properties(&self) -> Option<&[String]> {
        self.properties.get().map(Vec::as_slice)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn message_type(&self) -> &MessageType {
        &self.message_type
    }

    pub fn error(&self) -> &ErrorState {
        &self.error
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn error_details(&self) -> Option<&serde_json::Value> {
        self.error_details.as_ref()
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn state(&self) -> MessageState {
        self.state
    }

    /// Whether a signal handed out by `fetch` is still unsettled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Client of the latest fetch, until cleanup.
    pub fn client(&self) -> Option<&Arc<dyn Client>> {
        self.client.as_ref()
    }

    pub fn parser(&self) -> &ParserContext {
        &self.parser
    }

    pub fn details(&self) -> &D {
        &self.details
    }

    pub fn details_mut(&mut self) -> &mut D {
        &mut self.details
    }

    pub fn cached(&self) -> Option<&Cached> {
        self.cached.as_ref()
    }

    pub fn cache_text(&mut self, text: impl Into<String>) {
        self.cached = Some(Cached::Text(text.into()));
    }

    pub fn cache_value(&mut self, value: serde_json::Value) {
        self.cached = Some(Cached::Value(value));
    }
}

impl<D: Details> Serialize for Message<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Message::serialize(self).serialize(serializer)
    }
}

impl<D: Details + fmt::Debug> fmt::Debug for Message<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("raw", &self.raw)
            .field("message_type", &self.message_type)
            .field("state", &self.state)
            .field("error", &self.error)
            .field("retries", &self.retries)
            .field("generation", &self.generation)
            .field("parser", &self.parser.name)
            .field("client", &self.client.as_ref().map(|c| c.name()))
            .field("details", &self.details)
            .finish_non_exhaustive()
    }
}
