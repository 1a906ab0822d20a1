//! Request validation
//!
//! Only presence is checked. Value types, date order and semantics are left
//! to the providers.

use crate::{PlannerError, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// Keys every travel request must carry, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 7] = [
    "destination",
    "start_date",
    "end_date",
    "num_travellers",
    "travel_style",
    "accomodation_preference",
    "interests",
];

/// Check that all required keys are present, reporting the first missing one
pub fn validate_request(request: &Value) -> Result<&Map<String, Value>> {
    let fields = request
        .as_object()
        .ok_or_else(|| PlannerError::invalid_request("a travel request must be a JSON object"))?;

    if let Some(field) = REQUIRED_FIELDS
        .into_iter()
        .find(|field| !fields.contains_key(*field))
    {
        debug!("Travel request rejected, missing '{}'", field);
        return Err(PlannerError::MissingField { field });
    }

    Ok(fields)
}
