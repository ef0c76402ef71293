//! Ports - collaborators around a message.
//!
//! - **Parser**: produces messages (raw line + type tag)
//! - **Client**: looks up the properties a message asks for
//! - **Module**: consumes a message once its fetch settled

pub mod client;
pub mod module;
pub mod parser;

pub use self::client::{Client, LookupRequest};
pub use self::module::Module;
pub use self::parser::{Parser, ParserContext};
