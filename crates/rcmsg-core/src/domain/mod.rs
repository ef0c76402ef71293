//! Domain model (type tags, state, errors, fetch intent, property values).

pub mod errors;
pub mod message_type;
pub mod once;
pub mod properties;
pub mod state;

pub use errors::{ErrorState, FetchError, FetchFailure};
pub use message_type::MessageType;
pub use once::{AlreadySet, SetOnce};
pub use properties::{Details, Properties, RESERVED_FIELDS};
pub use state::MessageState;
