//! Person records as they travel over the wire.

use serde::{Deserialize, Serialize};

/// Server-assigned person identifier.
pub type PersonaID = i64;

/// A person record exactly as the directory service returns it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersonaRecord {
    pub id: PersonaID,

    /// Full name.
    pub nombre: String,

    /// Age in years.
    pub edad: i64,

    pub email: String,

    /// Soft-delete marker. Older server builds omit it.
    #[serde(default)]
    pub eliminado: bool,
}

/// Body sent on create (`POST /persona`) and update (`PUT /persona/{id}`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersonaPayload {
    pub nombre: String,
    pub edad: i64,
    pub email: String,
}
