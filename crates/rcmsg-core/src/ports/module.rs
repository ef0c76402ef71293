//! Module port - a downstream consumer interested in settled messages.

use async_trait::async_trait;

use crate::domain::Details;
use crate::error::RcError;
use crate::message::Message;

/// Module consumes a message once its fetch succeeded.
///
/// # Example
/// ```ignore
/// struct Announcer;
///
/// #[async_trait]
/// impl Module<EditDetails> for Announcer {
///     fn id(&self) -> &str {
///         "announcer"
///     }
///
///     async fn consume(&self, message: &Message<EditDetails>) -> Result<(), RcError> {
///         println!("{} edited {:?}", message.details().user, message.details().title);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Module<D: Details>: Send + Sync {
    /// Identifier that messages list in their `interested` modules.
    fn id(&self) -> &str;

    async fn consume(&self, message: &Message<D>) -> Result<(), RcError>;
}
