//! Impls - ready-made ports for development and tests.
//!
//! - **LineParser**: one message per line, fixed type tag
//! - **StaticClient**: fixture-backed property lookups

pub mod line_parser;
pub mod static_client;

pub use self::line_parser::LineParser;
pub use self::static_client::StaticClient;
