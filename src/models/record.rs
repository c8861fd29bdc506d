use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One indexed catalog entry, keyed by `name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub description: String,
    /// Year as reported by the tool, placeholders (`?`) included
    pub year: String,
    /// January 1st of the normalized year, UTC
    pub timestamp: DateTime<Utc>,
    pub manufacturer: String,
    pub driver_status: String,
}
