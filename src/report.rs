use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::RankedSupplier;
use crate::ranking;

pub fn build_leaderboard(
    source: Option<&str>,
    generated_at: DateTime<Utc>,
    ranked: &[RankedSupplier],
    limit: usize,
) -> String {
    let mut output = String::new();
    let source_label = source.unwrap_or("supplier ratings");

    let _ = writeln!(output, "# Supplier Leaderboard");
    let _ = writeln!(
        output,
        "Generated from {} on {}",
        source_label,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);

    if ranked.is_empty() {
        let _ = writeln!(output, "No supplier ratings recorded.");
        return output;
    }

    let _ = writeln!(output, "| Rank | Supplier | Reviews | Combined Avg | Overall |");
    let _ = writeln!(output, "| ---: | --- | ---: | ---: | ---: |");
    for entry in ranked.iter().take(limit) {
        let record = &entry.record;
        let _ = writeln!(
            output,
            "| {} | {} | {} | {:.2} | {:.1} |",
            entry.rank,
            record.display_name().replace('|', "\\|"),
            ranking::total_reviews(record),
            ranking::combined_average(record),
            ranking::overall_rating(record)
        );
    }

    let _ = writeln!(output);
    let shown = ranked.len().min(limit);
    let _ = writeln!(output, "Showing {} of {} suppliers.", shown, ranked.len());

    output
}

/// One console line per supplier.
pub fn summary_line(entry: &RankedSupplier) -> String {
    let record = &entry.record;
    format!(
        "{}. {} ({} reviews) avg {:.2}, overall {:.1}",
        entry.rank,
        record.display_name(),
        ranking::total_reviews(record),
        ranking::combined_average(record),
        ranking::overall_rating(record)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ranked() -> Vec<RankedSupplier> {
        ranking::rank_value(&json!([
            {"SupplierName": "Acme | Sons", "TotalReviews": "4", "AvgTimeliness": "4",
             "AvgQuality": "5", "AvgService": "0", "OverallRating": "4.2"},
            {"SupplierName": "Bolt", "TotalReviews": "9", "OverallRating": "3"},
            {"TotalReviews": "1"}
        ]))
        .unwrap()
    }

    #[test]
    fn leaderboard_lists_ranked_rows() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let report = build_leaderboard(Some("suppliers.json"), at, &ranked(), 10);

        assert!(report.starts_with("# Supplier Leaderboard\n"));
        assert!(report.contains("Generated from suppliers.json on 2025-03-01 08:30 UTC"));
        assert!(report.contains("| 1 | Bolt | 9 | 0.00 | 3.0 |"));
        assert!(report.contains("| 2 | Acme \\| Sons | 4 | 4.50 | 4.2 |"));
        assert!(report.contains("| 3 | Unknown Supplier | 1 | 0.00 | 0.0 |"));
        assert!(report.contains("Showing 3 of 3 suppliers."));
    }

    #[test]
    fn leaderboard_respects_limit_and_empty_input() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let report = build_leaderboard(None, at, &ranked(), 1);
        assert!(report.contains("Showing 1 of 3 suppliers."));
        assert!(!report.contains("Unknown Supplier"));

        let empty = build_leaderboard(None, at, &[], 10);
        assert!(empty.contains("No supplier ratings recorded."));
    }

    #[test]
    fn summary_line_formats_entry() {
        let entries = ranked();
        assert_eq!(
            summary_line(&entries[0]),
            "1. Bolt (9 reviews) avg 0.00, overall 3.0"
        );
    }
}
