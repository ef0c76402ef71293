//! rcmsg-core
//!
//! Lifecycle of enrichable feed messages: a message is parsed from a raw
//! line, asynchronously enriched with looked-up properties, retried after a
//! failure with its original fetch intent, and finally handed to the modules
//! interested in it.
//!
//! # Layout
//! - **domain**: type tags, lifecycle state, fetch errors, write-once intent, property values
//! - **message**: the `Message` record, its completion signal and serialized view
//! - **ports**: Parser / Client / Module traits
//! - **kinds**: concrete message variants (edit, log)
//! - **app**: enricher, module registry, dispatcher, builder, worker group
//! - **impls**: development implementations of the ports

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod kinds;
pub mod message;
pub mod ports;

pub use error::RcError;
pub use message::{FetchHandle, Message};
