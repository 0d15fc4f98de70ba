use crate::dataset::range::Range;
use crate::spreadsheet::cell::Cell;

/// Cells read from one worksheet, together with the range they were read under.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet, ordered by (row, col) once finished
    pub(crate) cells: Vec<Cell>,
    /// Expected data range (user-specified)
    pub(super) range: Range,
    /// Whether to skip empty rows
    pub(super) skip_empty_rows: bool,
    /// Actual data range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(file_name: &str, name: &str, range: Option<Range>, skip_empty_rows: bool) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            range: range.unwrap_or_default(),
            skip_empty_rows,
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(super) fn before_row_lower_bound(&self, row: usize) -> bool {
        self.range.row_lower_bound
            .map(|row_lower_bound| row < row_lower_bound)
            .unwrap_or(false)
    }

    pub(super) fn after_row_upper_bound(&self, row: usize) -> bool {
        self.range.row_upper_bound
            .map(|row_upper_bound| row_upper_bound < row)
            .unwrap_or(false)
    }

    pub(super) fn before_col_lower_bound(&self, col: usize) -> bool {
        self.range.col_lower_bound
            .map(|col_lower_bound| col < col_lower_bound)
            .unwrap_or(false)
    }

    pub(super) fn after_col_upper_bound(&self, col: usize) -> bool {
        self.range.col_upper_bound
            .map(|col_upper_bound| col_upper_bound < col)
            .unwrap_or(false)
    }

    /// Checks if a cell at (row, col) is within the specified range.
    pub(super) fn contains(&self, row: usize, col: usize) -> bool {
        !self.before_row_lower_bound(row)
            && !self.after_row_upper_bound(row)
            && !self.before_col_lower_bound(col)
            && !self.after_col_upper_bound(col)
    }

    /// Adds a cell to the sheet, widening the actual data range.
    pub(super) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|row_lower_bound| row < row_lower_bound).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|col_lower_bound| col < col_lower_bound).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Orders cells by position. Readers call this once all cells are pushed.
    pub(super) fn finish(&mut self) {
        self.cells.sort_by_key(|cell| (cell.row, cell.col));
    }

    /// Lays the cells out as a grid of rows, `None` marking empty positions.
    ///
    /// Rows start at the range's first row (or the first row holding data when
    /// no range is given or empty rows are skipped) and end at the last row
    /// holding data. Columns span the range, falling back to the data bounds.
    pub(crate) fn rows(&self) -> Vec<Vec<Option<&Cell>>> {
        let (Some(data_row_lower), Some(row_upper), Some(data_col_lower), Some(data_col_upper)) = (
            self.row_lower_bound,
            self.row_upper_bound,
            self.col_lower_bound,
            self.col_upper_bound,
        ) else {
            return Vec::new();
        };
        let row_lower = self.range.row_lower_bound
            .filter(|_| !self.skip_empty_rows)
            .unwrap_or(data_row_lower)
            .min(data_row_lower);
        let col_lower = self.range.col_lower_bound.unwrap_or(data_col_lower);
        let col_upper = self.range.col_upper_bound.unwrap_or(data_col_upper).max(col_lower);
        let width = col_upper - col_lower + 1;

        let mut index = 0usize;
        let mut table = Vec::<Vec<Option<&Cell>>>::new();
        for row in row_lower..=row_upper {
            let mut record: Vec<Option<&Cell>> = vec![None; width];
            let mut has_data = false;
            while index < self.cells.len() && self.cells[index].row == row {
                let cell = &self.cells[index];
                if (col_lower..=col_upper).contains(&cell.col) {
                    record[cell.col - col_lower] = Some(cell);
                    has_data = true;
                }
                index += 1;
            }
            if has_data || !self.skip_empty_rows {
                table.push(record);
            }
        }
        table
    }
}
