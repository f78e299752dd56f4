// Display Projection
//
// Labels are the only place where the queue counter (clamped to 999) and the
// ticket counter (unbounded) become visibly different, so the boundary
// behavior is pinned here:
//   absent or <= 0  -> "{c}000"
//   1..=999         -> "{c}" + zero-padded to 3 digits
//   > 999           -> "{c}" + natural width ("A1000"), never truncated or wrapped

use crate::domain::company::CompanyId;
use serde::{Deserialize, Serialize};

/// Minimum digit count in a label
pub const LABEL_DIGITS: usize = 3;

/// Letter-prefixed, zero-padded rendering of a counter value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayLabel(String);

impl DisplayLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DisplayLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for DisplayLabel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Project a raw counter value into its display label.
pub fn project(company: CompanyId, raw: Option<i64>) -> DisplayLabel {
    let value = raw.filter(|v| *v > 0).unwrap_or(0);
    DisplayLabel(format!(
        "{}{:0width$}",
        company.letter(),
        value,
        width = LABEL_DIGITS
    ))
}
