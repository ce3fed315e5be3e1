use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::models::SupplierRecord;
use crate::ranking;

/// Loads supplier ratings from a `.csv` export or a saved JSON response.
pub fn read_suppliers(path: &Path) -> Result<Vec<SupplierRecord>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let records = if is_csv {
        read_csv(path)?
    } else {
        let payload: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        ranking::records_from_value(&payload)?
    };

    tracing::debug!(path = %path.display(), count = records.len(), "loaded supplier ratings");
    Ok(records)
}

fn read_csv(path: &Path) -> Result<Vec<SupplierRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;
        let mut record = SupplierRecord::default();

        for (header, value) in headers.iter().zip(row.iter()) {
            let value = cell(value);
            match header {
                "SupplierName" => record.supplier_name = value,
                "TotalReviews" => record.total_reviews = value,
                "AvgTimeliness" => record.avg_timeliness = value,
                "AvgQuality" => record.avg_quality = value,
                "AvgService" => record.avg_service = value,
                "OverallRating" => record.overall_rating = value,
                other => {
                    if let Some(value) = value {
                        record.extra.insert(other.to_string(), value);
                    }
                }
            }
        }

        records.push(record);
    }

    Ok(records)
}

// Empty CSV cells mean the column was missing for that supplier.
fn cell(value: &str) -> Option<Value> {
    (!value.is_empty()).then(|| Value::String(value.to_string()))
}
