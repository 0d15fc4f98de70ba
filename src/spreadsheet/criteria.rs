use crate::dataset::range::Range;
use glob::Pattern;

/// Criteria for selecting which sheet and which cells are read from a spreadsheet.
#[derive(Clone, Debug, Default)]
pub(crate) struct Criteria {
    /// Sheet name pattern; the first sheet is read when absent.
    pub(crate) sheet_name_pattern: Option<Pattern>,

    /// Maximum number of sheets to read.
    pub(crate) sheet_limit: Option<usize>,

    /// Data range within the sheet to extract.
    pub(crate) range: Option<Range>,

    /// Convert spreadsheet error cells to empty cells instead of failing.
    pub(crate) error_as_null: bool,

    /// Skip rows where all columns are empty.
    pub(crate) skip_empty_rows: bool,
}

impl Criteria {
    /// Returns true once `sheet_count` sheets have been read and the limit is reached.
    pub(crate) fn limit_reached(&self, sheet_count: usize) -> bool {
        self.sheet_limit.map(|limit| sheet_count >= limit).unwrap_or(false)
    }

    /// Checks if a sheet name matches the criteria pattern.
    /// Returns true if no pattern is specified.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        self.sheet_name_pattern
            .as_ref()
            .map(|pattern| pattern.matches(sheet_name))
            .unwrap_or(true)
    }
}
