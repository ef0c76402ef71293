//! Concrete message variants and their declared field sets.

pub mod edit;
pub mod log;

pub use self::edit::EditDetails;
pub use self::log::LogDetails;

use serde::de::DeserializeOwned;

use crate::domain::FetchFailure;

/// Decode one looked-up property into a typed field.
pub(crate) fn decode<T: DeserializeOwned>(
    name: &str,
    value: serde_json::Value,
) -> Result<T, FetchFailure> {
    serde_json::from_value(value).map_err(|e| {
        FetchFailure::new("badproperty", format!("property {name}: {e}"))
            .with_details(serde_json::json!({ "property": name }))
    })
}
