//! # Discrepancy Module
//!
//! Finds the two date fields of a photo that disagree the most.
//!
//! ## Algorithm
//! 1. Parse every non-empty field; unparsable values are skipped
//! 2. Compare every unordered pair of parsed dates
//! 3. Keep pairs whose gap, in whole days, is strictly above the threshold
//! 4. Report the widest one (the first such pair wins a tie)

use crate::core::metadata::{parse_date, DateFields, DateTag};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Two date fields of one photo that are too far apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// The earlier tag in display order
    pub first: DateTag,
    /// The later tag in display order
    pub second: DateTag,
    /// Absolute gap, truncated to whole days
    pub gap_days: i64,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vs {}: {} days",
            self.first, self.second, self.gap_days
        )
    }
}

/// Find the widest gap between date fields that exceeds `threshold_days`.
///
/// Returns `None` when fewer than two fields parse or when no pair is
/// more than `threshold_days` apart.
pub fn analyze(fields: &DateFields, threshold_days: u32) -> Option<Discrepancy> {
    let parsed: Vec<(DateTag, NaiveDateTime)> = fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .filter_map(|(tag, value)| parse_date(value).map(|date| (tag, date)))
        .collect();

    let threshold = i64::from(threshold_days);
    let mut widest: Option<Discrepancy> = None;

    for (i, (first, a)) in parsed.iter().enumerate() {
        for (second, b) in &parsed[i + 1..] {
            let gap_days = (*b - *a).num_days().abs();
            if gap_days <= threshold {
                continue;
            }
            if widest.map_or(true, |w| gap_days > w.gap_days) {
                widest = Some(Discrepancy {
                    first: *first,
                    second: *second,
                    gap_days,
                });
            }
        }
    }

    widest
}
