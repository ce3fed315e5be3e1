use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNKNOWN_SUPPLIER: &str = "Unknown Supplier";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedTrackingCode {
    pub year: i32,
    #[serde(rename = "trackingNumber")]
    pub tracking_number: String,
}

/// One row of aggregated supplier ratings as the backend returns it.
///
/// Numeric fields arrive as strings, numbers or not at all, so they are kept
/// as raw JSON and read through the lenient parsers in `ranking`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierRecord {
    #[serde(rename = "SupplierName", default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<Value>,
    #[serde(rename = "TotalReviews", default, skip_serializing_if = "Option::is_none")]
    pub total_reviews: Option<Value>,
    #[serde(rename = "AvgTimeliness", default, skip_serializing_if = "Option::is_none")]
    pub avg_timeliness: Option<Value>,
    #[serde(rename = "AvgQuality", default, skip_serializing_if = "Option::is_none")]
    pub avg_quality: Option<Value>,
    #[serde(rename = "AvgService", default, skip_serializing_if = "Option::is_none")]
    pub avg_service: Option<Value>,
    #[serde(rename = "OverallRating", default, skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SupplierRecord {
    /// Name used for ordering; absent or non-string names sort as empty.
    pub fn name_key(&self) -> &str {
        match &self.supplier_name {
            Some(Value::String(name)) => name.as_str(),
            _ => "",
        }
    }

    pub fn display_name(&self) -> &str {
        match self.name_key() {
            "" => UNKNOWN_SUPPLIER,
            name => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSupplier {
    pub rank: usize,
    #[serde(flatten)]
    pub record: SupplierRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub office: Option<String>,
    pub position: Option<String>,
    pub role: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}
