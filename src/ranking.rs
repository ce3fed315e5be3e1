use std::cmp::Ordering;

use serde_json::Value;

use crate::error::{DoctrackError, Result};
use crate::models::{RankedSupplier, SupplierRecord};

/// Reads a loosely typed numeric field, falling back to `default` for
/// anything that does not start with a finite number.
///
/// Strings are read up to the end of their leading number, so `"4.5/5"`
/// is 4.5 and `"n/a"` is the default.
pub fn parse_lenient_number(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => float_prefix(text),
        _ => None,
    };

    match parsed {
        Some(number) if number.is_finite() => number,
        _ => default,
    }
}

/// Integer counterpart of [`parse_lenient_number`]. Strings keep only their
/// leading digits (`"12 reviews"` is 12, `"1e3"` is 1); numbers truncate.
pub fn parse_lenient_int(value: Option<&Value>, default: i64) -> i64 {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
            .unwrap_or(default),
        Some(Value::String(text)) => int_prefix(text).unwrap_or(default),
        _ => default,
    }
}

fn float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = sign_len(bytes);

    let int_digits = digit_run(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digit_run(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1;
        let exp_sign = sign_len(&bytes[exp_start..]);
        let exp_digits = digit_run(&bytes[exp_start + exp_sign..]);
        if exp_digits > 0 {
            end = exp_start + exp_sign + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok()
}

fn int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let sign = sign_len(bytes);
    let digits = digit_run(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    text[..sign + digits].parse::<i64>().ok()
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

pub fn total_reviews(record: &SupplierRecord) -> i64 {
    parse_lenient_int(record.total_reviews.as_ref(), 0)
}

pub fn overall_rating(record: &SupplierRecord) -> f64 {
    parse_lenient_number(record.overall_rating.as_ref(), 0.0)
}

/// Mean of the positive sub-ratings; zero when no sub-rating is positive.
pub fn combined_average(record: &SupplierRecord) -> f64 {
    let ratings = [
        &record.avg_timeliness,
        &record.avg_quality,
        &record.avg_service,
    ]
    .map(|value| parse_lenient_number(value.as_ref(), 0.0));

    let (sum, count) = ratings
        .iter()
        .filter(|rating| **rating > 0.0)
        .fold((0.0, 0usize), |(sum, count), rating| (sum + rating, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn compare(a: &SupplierRecord, b: &SupplierRecord) -> Ordering {
    total_reviews(b)
        .cmp(&total_reviews(a))
        .then_with(|| {
            combined_average(b)
                .partial_cmp(&combined_average(a))
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| {
            overall_rating(b)
                .partial_cmp(&overall_rating(a))
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.name_key().cmp(b.name_key()))
}

pub fn rank(records: &[SupplierRecord]) -> Vec<RankedSupplier> {
    let mut sorted: Vec<&SupplierRecord> = records.iter().collect();
    // `sort_by` is stable, so full ties keep their input order.
    sorted.sort_by(|a, b| compare(a, b));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let mut record = record.clone();
            // A stale `rank` carried in from the payload would shadow ours.
            record.extra.remove("rank");
            RankedSupplier {
                rank: index + 1,
                record,
            }
        })
        .collect()
}

/// Ranks a raw API payload, which must be a JSON array of objects.
pub fn rank_value(payload: &Value) -> Result<Vec<RankedSupplier>> {
    let records = records_from_value(payload)?;
    tracing::debug!(count = records.len(), "ranking suppliers");
    Ok(rank(&records))
}

pub fn records_from_value(payload: &Value) -> Result<Vec<SupplierRecord>> {
    let items = payload.as_array().ok_or_else(|| {
        DoctrackError::InvalidInput(format!(
            "supplier ratings must be a JSON array, got {}",
            kind(payload)
        ))
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(DoctrackError::InvalidInput(format!(
                    "supplier rating #{index} must be an object, got {}",
                    kind(item)
                )));
            }
            Ok(serde_json::from_value::<SupplierRecord>(item.clone())?)
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
