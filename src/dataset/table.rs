use crate::dataset::column::Column;
use crate::dataset::column::ColumnError;
use crate::dataset::column::ColumnType;
use crate::dataset::scalar::Scalar;
use crate::error::SheetGridError;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::SpreadsheetError;
use log::debug;
use serde::ser::SerializeMap;
use serde::Serialize;
use serde::Serializer;
use std::collections::HashMap;
use std::collections::HashSet;

/// Text values read as null unless configured otherwise; the NA markers data frame readers recognise.
pub const DEFAULT_NULLS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options controlling how sheet cells become table columns.
#[derive(Clone, Debug)]
pub(crate) struct TableOptions {
    /// First row holds the column names
    pub(crate) header: bool,
    /// Text values read as null
    pub(crate) nulls: HashSet<String>,
    /// Number of data rows sampled for type inference, all when absent
    pub(crate) analyze_rows: Option<usize>,
    /// Values that fail conversion become null instead of failing the load
    pub(crate) error_as_null: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            header: true,
            nulls: DEFAULT_NULLS.iter().map(|null| null.to_string()).collect(),
            analyze_rows: None,
            error_as_null: false,
        }
    }
}

/// An ordered set of equally long named columns.
///
/// Row `i` of every column belongs to the same record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Builds a table from columns, rejecting unequal lengths and duplicate names.
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, SheetGridError> {
        let mut table = Table::new(name);
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Builds a table from the cells of a sheet, inferring one type per column.
    pub(crate) fn from_sheet(
        sheet: &Sheet,
        shared_strings: &[String],
        options: &TableOptions,
    ) -> Result<Self, SheetGridError> {
        let rows = sheet.rows();
        let Some(width) = rows.first().map(|row| row.len()) else {
            return Ok(Table::new(&sheet.name));
        };
        let cell_error = |cell: &Cell, message: String| {
            SpreadsheetError::CellValueError(
                sheet.file_name.to_owned(),
                sheet.name.to_owned(),
                cell.reference(),
                message,
            )
        };

        let (names, records) = if options.header {
            let titles = rows[0]
                .iter()
                .map(|cell| cell.map(|cell| cell.to_text(shared_strings).map_err(|message| cell_error(cell, message))).transpose())
                .collect::<Result<Vec<Option<String>>, SpreadsheetError>>()?;
            (normalize_headers(titles), &rows[1..])
        } else {
            ((1..=width).map(|index| format!("column{index}")).collect(), &rows[..])
        };

        let is_null = |cell: &Cell| {
            cell.kind.is_string()
                && cell.to_text(shared_strings)
                    .map(|text| options.nulls.contains(&text))
                    .unwrap_or(false)
        };
        let sample = options.analyze_rows.unwrap_or(records.len()).min(records.len());

        let mut table = Table::new(&sheet.name);
        for (index, name) in names.into_iter().enumerate() {
            let kind = ColumnType::detect(records[..sample]
                .iter()
                .filter_map(|record| record[index])
                .filter(|cell| !is_null(*cell))
                .map(|cell| ColumnType::from(&cell.kind, &cell.value))
                .collect());
            debug!("Column '{}' detected as {}", name, kind.as_str());

            let mut values = Vec::with_capacity(records.len());
            for record in records {
                let value = match record[index] {
                    None => Scalar::Null,
                    Some(cell) if is_null(cell) => Scalar::Null,
                    Some(cell) => match to_scalar(kind, cell, shared_strings) {
                        Ok(value) => value,
                        Err(_) if options.error_as_null => Scalar::Null,
                        Err(message) => Err(cell_error(cell, message))?,
                    },
                };
                values.push(value);
            }
            table.push_column(Column::new(name, kind, values))?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of records; a table without columns has none.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|column| column.values.len()).unwrap_or(0)
    }

    /// Appends a column, keeping all columns equally long and names unique.
    pub fn push_column(&mut self, column: Column) -> Result<(), SheetGridError> {
        if self.contains_column(&column.name) {
            Err(SheetGridError::SchemaViolation(format!(
                "column '{}' already exists in table '{}'",
                column.name, self.name
            )))?
        }
        if !self.columns.is_empty() && column.values.len() != self.row_count() {
            Err(ColumnError::LengthMismatch(column.name.to_owned(), column.values.len(), self.row_count()))?
        }
        self.columns.push(column);
        Ok(())
    }

    /// Removes the named column, returning it when present.
    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let index = self.columns.iter().position(|column| column.name == name)?;
        Some(self.columns.remove(index))
    }

    /// Keeps only the records accepted by `predicate`, returning how many were removed.
    pub fn retain_rows<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Record<'_>) -> bool,
    {
        let keep: Vec<bool> = self.records().map(|record| predicate(&record)).collect();
        let removed = keep.iter().filter(|keep| !**keep).count();
        if removed > 0 {
            for column in &mut self.columns {
                let mut flags = keep.iter();
                column.values.retain(|_| flags.next().copied().unwrap_or(false));
            }
        }
        removed
    }

    /// Iterates the records in row order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        let columns = &self.columns;
        (0..self.row_count()).map(move |row| Record { columns, row })
    }
}

/// A borrowed view of one row, serialized as an ordered `name -> value` map.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    columns: &'a [Column],
    row: usize,
}

impl<'a> Record<'a> {
    pub fn get(&self, name: &str) -> Option<&'a Scalar> {
        self.columns
            .iter()
            .find(|column| column.name == name)
            .and_then(|column| column.values.get(self.row))
    }

    /// Pairs of column name and value, in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a Scalar)> + '_ {
        self.columns
            .iter()
            .filter_map(|column| column.values.get(self.row).map(|value| (column.name.as_str(), value)))
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Converts a cell to the scalar representation of the column type.
fn to_scalar(kind: ColumnType, cell: &Cell, shared_strings: &[String]) -> Result<Scalar, String> {
    match kind {
        ColumnType::Boolean if cell.kind == CellType::Boolean => Ok(Scalar::Boolean(cell.to_boolean())),
        ColumnType::Boolean => Err(format!("cast '{}' to boolean failed", cell.value)),
        ColumnType::BigInt if cell.kind == CellType::Number => cell.to_bigint().map(Scalar::Integer),
        ColumnType::Double if cell.kind == CellType::Number => cell.to_double().map(Scalar::Float),
        ColumnType::BigInt | ColumnType::Double => Err(format!("cast {:?} cell to number failed", cell.kind)),
        _ => cell.to_text(shared_strings).map(Scalar::Text),
    }
}

/// Names header cells the way data frames do: a missing or empty title becomes
/// `Unnamed: <position>`, and repeated titles get a `.1`, `.2`, ... suffix.
pub(crate) fn normalize_headers(titles: Vec<Option<String>>) -> Vec<String> {
    let mut counts = HashMap::<String, usize>::new();
    let mut names = Vec::with_capacity(titles.len());
    for (index, title) in titles.into_iter().enumerate() {
        let mut name = title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| format!("Unnamed: {index}"));
        let mut count = counts.get(&name).copied().unwrap_or(0);
        while count > 0 {
            counts.insert(name.to_owned(), count + 1);
            name = format!("{name}.{count}");
            count = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.to_owned(), 1);
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::fixture::*;
    use crate::spreadsheet::criteria::Criteria;
    use crate::spreadsheet::open_spreadsheet;

    fn load(sheets: &[FixtureSheet], options: &TableOptions) -> Result<Table, SheetGridError> {
        let dir = tempfile::tempdir().unwrap();
        let path = write_xlsx(dir.path(), "book.xlsx", sheets);
        let mut spreadsheet = open_spreadsheet(path.to_str().unwrap())?;
        let shared_strings = spreadsheet.load_shared_strings()?;
        let sheet = spreadsheet.read_first_sheet(&Criteria {
            skip_empty_rows: true,
            ..Default::default()
        })?;
        Table::from_sheet(&sheet, &shared_strings, options)
    }

    fn names(values: &[Option<&str>]) -> Vec<String> {
        normalize_headers(values.iter().map(|value| value.map(str::to_owned)).collect())
    }

    #[test]
    fn header_normalization() {
        assert_eq!(names(&[Some("a"), None, Some("a"), Some(""), Some("a")]), vec![
            "a", "Unnamed: 1", "a.1", "Unnamed: 3", "a.2",
        ]);
        assert_eq!(names(&[Some("a"), Some("a"), Some("a.1")]), vec!["a", "a.1", "a.1.1"]);
    }

    #[test]
    fn typed_columns_from_sheet() {
        let table = load(&[("Items", vec![
            text_row(&["Item#", "Description", "Qty", "Price", "Since"]),
            vec![number("1"), text("Radio"), number("2"), number("9.5"), FixtureCell::Date("45000".to_owned())],
            vec![number("2"), empty(), number("4"), number("10"), empty()],
        ])], &TableOptions::default()).unwrap();

        assert_eq!(table.name(), "Items");
        assert_eq!(table.column_names(), vec!["Item#", "Description", "Qty", "Price", "Since"]);
        assert_eq!(table.row_count(), 2);

        let kinds: Vec<ColumnType> = table.columns().iter().map(|column| column.kind).collect();
        assert_eq!(kinds, vec![
            ColumnType::BigInt,
            ColumnType::Varchar,
            ColumnType::BigInt,
            ColumnType::Double,
            ColumnType::Date,
        ]);
        assert_eq!(table.column("Description").unwrap().values, vec![Scalar::from("Radio"), Scalar::Null]);
        assert_eq!(table.column("Price").unwrap().values, vec![Scalar::Float(9.5), Scalar::Float(10.0)]);
        assert_eq!(table.column("Since").unwrap().values, vec![Scalar::from("2023-03-15"), Scalar::Null]);
    }

    #[test]
    fn null_literals_and_generated_names() {
        let options = TableOptions {
            header: false,
            nulls: HashSet::from(["N/A".to_owned()]),
            ..Default::default()
        };
        let table = load(&[("Items", vec![
            text_row(&["Radio", "N/A"]),
            text_row(&["N/A", "Pager"]),
        ])], &options).unwrap();

        assert_eq!(table.column_names(), vec!["column1", "column2"]);
        assert_eq!(table.column("column1").unwrap().values, vec![Scalar::from("Radio"), Scalar::Null]);
        assert_eq!(table.column("column2").unwrap().values, vec![Scalar::Null, Scalar::from("Pager")]);
    }

    #[test]
    fn conversion_failures_beyond_the_sample() {
        let sheets = vec![("Items", vec![
            text_row(&["Qty"]),
            vec![number("1")],
            vec![text("many")],
        ])];
        let options = TableOptions { analyze_rows: Some(1), ..Default::default() };
        let error = load(&sheets, &options).unwrap_err();
        assert!(error.to_string().contains("A3"), "{error}");

        let options = TableOptions { analyze_rows: Some(1), error_as_null: true, ..Default::default() };
        let table = load(&sheets, &options).unwrap();
        assert_eq!(table.column("Qty").unwrap().values, vec![Scalar::Integer(1), Scalar::Null]);

        let table = load(&sheets, &TableOptions::default()).unwrap();
        assert_eq!(table.column("Qty").unwrap().kind, ColumnType::Varchar);
    }

    #[test]
    fn out_of_range_date_serials() {
        let sheets = vec![("Items", vec![
            text_row(&["Description", "Since"]),
            vec![text("Radio"), FixtureCell::Date("1e20".to_owned())],
            vec![text("Pager"), FixtureCell::Date("45000".to_owned())],
        ])];
        let error = load(&sheets, &TableOptions::default()).unwrap_err();
        assert!(error.to_string().contains("B2"), "{error}");

        let options = TableOptions { error_as_null: true, ..Default::default() };
        let table = load(&sheets, &options).unwrap();
        assert_eq!(table.column("Since").unwrap().kind, ColumnType::Date);
        assert_eq!(table.column("Since").unwrap().values, vec![Scalar::Null, Scalar::from("2023-03-15")]);
    }

    #[test]
    fn datetime_rolls_over_to_next_day() {
        let table = load(&[("Items", vec![
            text_row(&["Seen"]),
            vec![FixtureCell::DateTime("45000.99999999999".to_owned())],
        ])], &TableOptions::default()).unwrap();
        assert_eq!(table.column("Seen").unwrap().values, vec![Scalar::from("2023-03-16 00:00:00")]);
    }

    #[test]
    fn empty_sheet_has_no_columns() {
        let table = load(&[("Items", vec![])], &TableOptions::default()).unwrap();
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn column_operations() {
        let mut table = Table::from_columns("t", vec![
            Column::new("a", ColumnType::BigInt, vec![1i64.into(), 2i64.into(), 3i64.into()]),
            Column::new("b", ColumnType::Varchar, vec!["x".into(), "".into(), "z".into()]),
        ]).unwrap();

        let error = table.push_column(Column::new("c", ColumnType::Varchar, vec![])).unwrap_err();
        assert!(matches!(error, SheetGridError::ColumnError(ColumnError::LengthMismatch(..))));
        let error = table.push_column(Column::new("a", ColumnType::Varchar, vec![Scalar::Null; 3])).unwrap_err();
        assert!(error.is_schema_violation());

        let removed = table.retain_rows(|record| !record.get("b").map(Scalar::is_blank).unwrap_or(true));
        assert_eq!(removed, 1);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("a").unwrap().values, vec![Scalar::Integer(1), Scalar::Integer(3)]);

        assert!(table.drop_column("a").is_some());
        assert!(table.drop_column("a").is_none());
        assert_eq!(table.column_names(), vec!["b"]);
    }

    #[test]
    fn records_serialize_in_column_order() {
        let table = Table::from_columns("t", vec![
            Column::new("z", ColumnType::Varchar, vec!["Radio".into()]),
            Column::new("a", ColumnType::BigInt, vec![Scalar::Null]),
        ]).unwrap();
        let json = serde_json::to_string(&table.records().collect::<Vec<_>>()).unwrap();
        assert_eq!(json, r#"[{"z":"Radio","a":null}]"#);
    }
}
