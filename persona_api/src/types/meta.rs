use serde::{Deserialize, Serialize};

/// Envelope returned by `GET /personasPaginadas`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub total_records: i64,
    /// Page number as echoed by the server (1-indexed).
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}
