//! Tracking codes printed on document QR labels.
//!
//! A label encodes `<marker><year letter><special flag><office x4><series...>`.
//! The year letter counts from `A` = base year + 1, and a `Y` special flag
//! marks a purchase request, which gets a `PR-` prefix.

use serde::{Deserialize, Serialize};

use crate::error::{DoctrackError, Result, ValidationError};
use crate::models::DecodedTrackingCode;

pub const MIN_SCAN_LENGTH: usize = 6;
pub const PR_PREFIX: &str = "PR-";
const SPECIAL_FLAG: char = 'Y';

/// Acceptance window for decoded years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanRules {
    pub base_year: i32,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for ScanRules {
    fn default() -> Self {
        Self {
            base_year: 2023,
            min_year: 2024,
            max_year: 2025,
        }
    }
}

pub fn decode(scanned: &str) -> Result<DecodedTrackingCode> {
    decode_with(&ScanRules::default(), scanned)
}

pub fn decode_with(rules: &ScanRules, scanned: &str) -> Result<DecodedTrackingCode> {
    let chars: Vec<char> = scanned.chars().collect();
    // Office code reads up to index 6, but labels of exactly six characters
    // have always been accepted with a clamped slice.
    if chars.len() < MIN_SCAN_LENGTH {
        return Err(DoctrackError::InvalidInput(format!(
            "scanned code {scanned:?} is shorter than {MIN_SCAN_LENGTH} characters"
        )));
    }

    let year_code = chars[1];
    let special_code = chars[2];
    let office_code = slice(&chars, 3, 7);
    let series = slice(&chars, 7, chars.len());

    let year = rules.base_year + (year_code as i32 - 'A' as i32 + 1);
    let pr_segment = if special_code == SPECIAL_FLAG { PR_PREFIX } else { "" };

    Ok(DecodedTrackingCode {
        year,
        tracking_number: format!("{pr_segment}{office_code}-{series}"),
    })
}

fn slice(chars: &[char], start: usize, end: usize) -> String {
    let end = end.min(chars.len());
    let start = start.min(end);
    chars[start..end].iter().collect()
}

pub fn validate(decoded: &DecodedTrackingCode) -> std::result::Result<(), ValidationError> {
    validate_with(&ScanRules::default(), decoded)
}

pub fn validate_with(
    rules: &ScanRules,
    decoded: &DecodedTrackingCode,
) -> std::result::Result<(), ValidationError> {
    if decoded.year < rules.min_year || decoded.year > rules.max_year {
        return Err(ValidationError::YearOutOfRange {
            year: decoded.year,
            min: rules.min_year,
            max: rules.max_year,
        });
    }

    let number = &decoded.tracking_number;
    if !(number.starts_with(PR_PREFIX) || number.contains('-')) {
        return Err(ValidationError::MalformedTrackingNumber(number.clone()));
    }

    Ok(())
}

pub fn decode_and_validate(rules: &ScanRules, scanned: &str) -> Result<DecodedTrackingCode> {
    let decoded = decode_with(rules, scanned)?;
    validate_with(rules, &decoded)?;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(year: i32, tracking_number: &str) -> DecodedTrackingCode {
        DecodedTrackingCode {
            year,
            tracking_number: tracking_number.to_string(),
        }
    }

    #[test]
    fn year_letters_count_from_base_year() {
        assert_eq!(decode("#AYABCD-0001").unwrap().year, 2024);
        assert_eq!(decode("#BNABCD-0001").unwrap().year, 2025);
        assert_eq!(decode("#CNABCD-0001").unwrap().year, 2026);
    }

    #[test]
    fn special_flag_adds_pr_prefix_and_keeps_series_literal() {
        let decoded = decode("#AYABCD-0001").unwrap();
        assert_eq!(decoded.year, 2024);
        assert_eq!(decoded.tracking_number, "PR-ABCD--0001");

        let plain = decode("#ANOFC10042").unwrap();
        assert_eq!(plain.tracking_number, "OFC1-0042");
    }

    #[test]
    fn rejects_short_codes() {
        for scanned in ["", "#", "#AY", "#AYAB"] {
            let err = decode(scanned).unwrap_err();
            assert!(matches!(err, DoctrackError::InvalidInput(_)), "{scanned:?}");
        }
    }

    #[test]
    fn six_characters_clamp_office_and_empty_series() {
        let decoded = decode("#ANABC").unwrap();
        assert_eq!(decoded.tracking_number, "ABC-");

        let decoded = decode("#ANABCD").unwrap();
        assert_eq!(decoded.tracking_number, "ABCD-");
    }

    #[test]
    fn lowercase_year_decodes_but_fails_validation() {
        let decoded = decode("#aNABCD-1").unwrap();
        assert_eq!(decoded.year, 2023 + ('a' as i32 - 'A' as i32 + 1));
        assert!(matches!(
            validate(&decoded),
            Err(ValidationError::YearOutOfRange { .. })
        ));
    }

    #[test]
    fn validate_enforces_year_window() {
        assert!(validate(&code(2023, "PR-ABCD-1")).is_err());
        assert!(validate(&code(2026, "PR-ABCD-1")).is_err());
        assert!(validate(&code(2024, "PR-ABCD-1")).is_ok());
        assert!(validate(&code(2025, "PR-ABCD-1")).is_ok());
    }

    #[test]
    fn validate_accepts_plain_dashed_numbers() {
        assert!(validate(&code(2024, "1234-5678")).is_ok());
        assert_eq!(
            validate(&code(2024, "12345678")),
            Err(ValidationError::MalformedTrackingNumber("12345678".to_string()))
        );
    }

    #[test]
    fn wider_rules_accept_later_years() {
        let rules = ScanRules {
            max_year: 2026,
            ..ScanRules::default()
        };
        let decoded = decode_and_validate(&rules, "#CYABCD-0001").unwrap();
        assert_eq!(decoded.year, 2026);
        assert!(decode_and_validate(&ScanRules::default(), "#CYABCD-0001").is_err());
    }
}
