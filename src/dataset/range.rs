use crate::error::SheetGridError;
use crate::spreadsheet::reference::col_to_index;
use crate::spreadsheet::reference::row_to_index;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?([A-Z]*)\$?(\d*)(:\$?([A-Z]*)\$?(\d*))?$").expect("hardcoded range pattern")
});

/// Errors related to Excel-style range parsing.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid range format '{0}'")]
    FormatError(String),
}

/// Excel-style cell range with optional boundaries, all 0-based and inclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Range {
    /// Lower row bound, None for unbounded
    pub(crate) row_lower_bound: Option<usize>,
    /// Upper row bound, None for unbounded
    pub(crate) row_upper_bound: Option<usize>,
    /// Lower column bound, None for unbounded
    pub(crate) col_lower_bound: Option<usize>,
    /// Upper column bound, None for unbounded
    pub(crate) col_upper_bound: Option<usize>,
}

impl TryFrom<&str> for Range {
    type Error = SheetGridError;

    /// Parses an Excel-style range string (e.g., "A1", "B2:C5", "A:C", "3:10").
    /// A single cell reference only fixes the top-left corner.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim().to_ascii_uppercase();
        let captures = RANGE_PATTERN
            .captures(value.as_str())
            .ok_or_else(|| RangeError::FormatError(value.to_owned()))?;
        let bound = |index: usize, parse: fn(&str) -> Option<usize>| {
            captures.get(index).map(|matcher| matcher.as_str()).and_then(parse)
        };
        let range = Range {
            col_lower_bound: bound(1, col_to_index),
            row_lower_bound: bound(2, row_to_index),
            col_upper_bound: bound(4, col_to_index),
            row_upper_bound: bound(5, row_to_index),
        };
        let inverted = |lower: Option<usize>, upper: Option<usize>| {
            lower.zip(upper).map(|(lower, upper)| upper < lower).unwrap_or(false)
        };
        if inverted(range.row_lower_bound, range.row_upper_bound)
            || inverted(range.col_lower_bound, range.col_upper_bound)
        {
            Err(RangeError::FormatError(value))?
        }
        Ok(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ranges() {
        assert_eq!(Range::try_from("B2:C5").unwrap(), Range {
            row_lower_bound: Some(1),
            row_upper_bound: Some(4),
            col_lower_bound: Some(1),
            col_upper_bound: Some(2),
        });
        assert_eq!(Range::try_from("a3").unwrap(), Range {
            row_lower_bound: Some(2),
            col_lower_bound: Some(0),
            ..Default::default()
        });
        assert_eq!(Range::try_from("B:D").unwrap(), Range {
            col_lower_bound: Some(1),
            col_upper_bound: Some(3),
            ..Default::default()
        });
        assert_eq!(Range::try_from("3:").unwrap(), Range {
            row_lower_bound: Some(2),
            ..Default::default()
        });
        assert_eq!(Range::try_from("$A$1:$B$2").unwrap().row_upper_bound, Some(1));
        assert_eq!(Range::try_from("").unwrap(), Range::default());
    }

    #[test]
    fn reject_malformed_ranges() {
        for value in ["1A", "A1:B2:C3", "A-1", "C1:A1", "A5:A2"] {
            let error = Range::try_from(value).unwrap_err();
            assert!(matches!(error, SheetGridError::RangeError(RangeError::FormatError(_))), "{value}");
        }
    }
}
