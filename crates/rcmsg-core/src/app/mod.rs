//! App - drives messages between the ports.
//!
//! # Components
//! - **Enricher**: one fetch cycle (fetch → lookup → resolve | mark_error), plus the retry hook
//! - **ModuleRegistry / Dispatcher**: delivery to interested modules
//! - **PipelineBuilder**: module registration with fail-fast validation
//! - **WorkerGroup**: concurrent processing of distinct messages
//! - **StateCounts**: lifecycle counts for reporting

pub mod builder;
pub mod dispatcher;
pub mod enricher;
pub mod registry;
pub mod status;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use self::builder::{BuildError, Pipeline, PipelineBuilder};
pub use self::dispatcher::{DispatchReport, Dispatcher};
pub use self::enricher::Enricher;
pub use self::registry::ModuleRegistry;
pub use self::status::StateCounts;
pub use self::worker::{Processed, WorkerConfig, WorkerContext, WorkerGroup};
