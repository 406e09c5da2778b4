//! Inbound payloads with their validation schemas, and outbound views.
//!
//! Each module pairs a `Create` schema with its `Update` variant derived by
//! [`crate::validation::Schema::partial`], plus the serde structs the
//! validated JSON is decoded into.

use serde::Deserialize;

use crate::domain::types::TypeConstraintError;

pub mod client;
pub mod communication;
pub mod contract;
pub mod delinquency;
pub mod interaction;
pub mod invoice;
pub mod lot;
pub mod price_adjustment;
pub mod trigger;
pub mod user;

/// Query string accepted by list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub client_id: Option<i32>,
    pub contract_id: Option<i32>,
}

/// Rejects an update that tries to change a field fixed at creation.
pub(crate) fn reject_if_present<T>(
    value: &Option<T>,
    field: &str,
) -> Result<(), TypeConstraintError> {
    match value {
        Some(_) => Err(TypeConstraintError::InvalidValue(format!(
            "{field} cannot be changed"
        ))),
        None => Ok(()),
    }
}

/// Trims optional free text, mapping blanks to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    crate::domain::types::blank_to_none(value)
}
