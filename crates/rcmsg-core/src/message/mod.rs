//! Message: the enrichable record and its completion signal.

mod record;
pub mod signal;
mod view;

pub use record::{Cached, Message};
pub use signal::{FetchHandle, FetchResult, Generation, Settler};
pub use view::MessageView;
