//! # Loader
//!
//! Reads one sheet of a workbook into a [`Table`], then cleans it:
//!
//! 1. every record gets a fresh identity, appended as the identity column;
//! 2. the configured columns are removed;
//! 3. records whose required column is null or empty text are removed.
//!
//! Any failure aborts the load; no partially cleaned table is returned.
use crate::dataset::column::Column;
use crate::dataset::column::ColumnType;
use crate::dataset::range::Range;
use crate::dataset::scalar::Scalar;
use crate::dataset::table::Table;
use crate::dataset::table::DEFAULT_NULLS;
use crate::dataset::table::TableOptions;
use crate::error::ResultMessage;
use crate::error::SheetGridError;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::open_spreadsheet;
use glob::Pattern;
use log::debug;
use log::info;
use log::warn;
use std::collections::HashSet;
use uuid::Uuid;

/// Hands out row identities.
///
/// Every value must be non-empty and never repeat within a load.
pub trait IdentityFactory {
    fn next_identity(&mut self) -> String;
}

/// Random (version 4) UUIDs in hyphenated form.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidFactory;

impl IdentityFactory for UuidFactory {
    fn next_identity(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F: FnMut() -> String> IdentityFactory for F {
    fn next_identity(&mut self) -> String {
        self()
    }
}

/// Settings of a single load.
#[derive(Clone, Debug, PartialEq)]
pub struct LoaderConfig {
    /// Glob pattern selecting the sheet, the first sheet when absent
    pub sheet: Option<String>,
    /// A1-style range restricting the cells read
    pub range: Option<String>,
    pub header: bool,
    /// Text values read as null
    pub nulls: Vec<String>,
    pub error_as_null: bool,
    pub skip_empty_rows: bool,
    /// Rows sampled for type inference, all rows when absent
    pub analyze_rows: Option<usize>,
    pub identity_column: String,
    pub dropped_columns: Vec<String>,
    /// Column that must hold a value for a record to be kept
    pub required_column: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            sheet: None,
            range: None,
            header: true,
            nulls: DEFAULT_NULLS.iter().map(|null| null.to_string()).collect(),
            error_as_null: false,
            skip_empty_rows: true,
            analyze_rows: None,
            identity_column: "uuid".to_owned(),
            dropped_columns: vec!["Item#".to_owned()],
            required_column: "Description".to_owned(),
        }
    }
}

impl LoaderConfig {
    fn criteria(&self) -> Result<Criteria, SheetGridError> {
        Ok(Criteria {
            sheet_name_pattern: self.sheet.as_deref().map(Pattern::new).transpose()?,
            sheet_limit: Some(1),
            range: self.range.as_deref().map(Range::try_from).transpose()?,
            error_as_null: self.error_as_null,
            skip_empty_rows: self.skip_empty_rows,
        })
    }

    fn table_options(&self) -> TableOptions {
        TableOptions {
            header: self.header,
            nulls: self.nulls.iter().cloned().collect(),
            analyze_rows: self.analyze_rows,
            error_as_null: self.error_as_null,
        }
    }

    /// Rejects settings that could never produce a valid table.
    fn validate(&self) -> Result<(), SheetGridError> {
        for reserved in [&self.identity_column, &self.required_column] {
            if self.dropped_columns.contains(reserved) {
                Err(SheetGridError::SchemaViolation(format!("column '{reserved}' cannot be dropped")))?
            }
        }
        if self.identity_column == self.required_column {
            Err(SheetGridError::SchemaViolation(format!(
                "identity column '{}' cannot be the required column",
                self.identity_column
            )))?
        }
        Ok(())
    }
}

/// Loads and cleans spreadsheet tables, taking identities from `F`.
pub struct Loader<F = UuidFactory> {
    config: LoaderConfig,
    identities: F,
}

impl Loader<UuidFactory> {
    pub fn new(config: LoaderConfig) -> Self {
        Loader::with_identity_factory(config, UuidFactory)
    }
}

impl<F: IdentityFactory> Loader<F> {
    pub fn with_identity_factory(config: LoaderConfig, identities: F) -> Self {
        Loader { config, identities }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Reads `source` and returns the cleaned table.
    ///
    /// Fails with `SourceUnavailable` when the file cannot be opened and with
    /// `SchemaViolation` when the required column is missing from the header
    /// or the header already holds the identity column.
    pub fn load(&mut self, source: &str) -> Result<Table, SheetGridError> {
        self.config.validate()?;
        let mut table = self.read(source).with_prefix(source)?;
        info!(
            "Read {} record(s) with {} column(s) from '{}' sheet '{}'",
            table.row_count(),
            table.column_count(),
            source,
            table.name()
        );
        self.check_schema(&table)?;
        self.assign_identities(&mut table)?;
        self.drop_columns(&mut table);
        self.drop_incomplete_rows(&mut table);
        Ok(table)
    }

    fn read(&self, source: &str) -> Result<Table, SheetGridError> {
        let criteria = self.config.criteria()?;
        let mut spreadsheet = open_spreadsheet(source)?;
        let shared_strings = spreadsheet.load_shared_strings()?;
        let sheet = spreadsheet.read_first_sheet(&criteria)?;
        if sheet.is_empty() {
            warn!("Sheet '{}' of '{}' holds no cells", sheet.name, source);
        } else {
            debug!("Selected sheet '{}' holding {} cell(s)", sheet.name, sheet.cells.len());
        }
        Table::from_sheet(&sheet, &shared_strings, &self.config.table_options())
    }

    fn check_schema(&self, table: &Table) -> Result<(), SheetGridError> {
        if !table.contains_column(&self.config.required_column) {
            Err(SheetGridError::SchemaViolation(format!(
                "required column '{}' is missing from the header of sheet '{}'",
                self.config.required_column,
                table.name()
            )))?
        }
        if table.contains_column(&self.config.identity_column) {
            Err(SheetGridError::SchemaViolation(format!(
                "sheet '{}' already holds a column named '{}'",
                table.name(),
                self.config.identity_column
            )))?
        }
        Ok(())
    }

    fn assign_identities(&mut self, table: &mut Table) -> Result<(), SheetGridError> {
        let mut seen = HashSet::with_capacity(table.row_count());
        let mut values = Vec::with_capacity(table.row_count());
        for _ in 0..table.row_count() {
            let identity = self.identities.next_identity();
            if identity.is_empty() || !seen.insert(identity.to_owned()) {
                return Err(SheetGridError::IdentityCollision(identity));
            }
            values.push(Scalar::Text(identity));
        }
        table.push_column(Column::new(&self.config.identity_column, ColumnType::Varchar, values))
    }

    fn drop_columns(&self, table: &mut Table) {
        for name in &self.config.dropped_columns {
            if table.drop_column(name).is_some() {
                debug!("Dropped column '{}'", name);
            } else {
                warn!("Column '{}' configured for removal is not in sheet '{}'", name, table.name());
            }
        }
    }

    fn drop_incomplete_rows(&self, table: &mut Table) {
        let required = &self.config.required_column;
        let removed = table.retain_rows(|record| {
            record.get(required).map(|value| !value.is_blank()).unwrap_or(false)
        });
        info!("Dropped {} record(s) without '{}', {} left", removed, required, table.row_count());
    }
}
