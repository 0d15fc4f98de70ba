//! Deployment configuration, read from a JSON file.
//!
//! Every field is optional in the file; missing fields take the defaults of
//! the reference deployment (`data/lapd.xlsx`, dropping `Item#`, anchoring
//! on `Description`).
use crate::columns::ColumnRule;
use crate::columns::RuleTable;
use crate::columns::DEFAULT_MIN_WIDTH;
use crate::error::ResultMessage;
use crate::error::SheetGridError;
use crate::loader::LoaderConfig;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Spreadsheet to load
    pub source: String,
    /// Glob pattern selecting the sheet, the first sheet when absent
    pub sheet: Option<String>,
    /// A1-style range restricting the cells read
    pub range: Option<String>,
    pub header: bool,
    pub nulls: Vec<String>,
    pub error_as_null: bool,
    pub skip_empty_rows: bool,
    pub analyze_rows: Option<usize>,
    pub identity_column: String,
    pub dropped_columns: Vec<String>,
    /// Required, pinned and text-filtered column
    pub anchor_column: String,
    pub min_width: u32,
    /// Applied after the identity and anchor rules
    pub column_rules: Vec<ColumnRule>,
}

impl Default for Config {
    fn default() -> Self {
        let loader = LoaderConfig::default();
        Config {
            source: "data/lapd.xlsx".to_owned(),
            sheet: loader.sheet,
            range: loader.range,
            header: loader.header,
            nulls: loader.nulls,
            error_as_null: loader.error_as_null,
            skip_empty_rows: loader.skip_empty_rows,
            analyze_rows: loader.analyze_rows,
            identity_column: loader.identity_column,
            dropped_columns: loader.dropped_columns,
            anchor_column: loader.required_column,
            min_width: DEFAULT_MIN_WIDTH,
            column_rules: Vec::new(),
        }
    }
}

impl Config {
    /// Reads a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, SheetGridError> {
        let path = path.as_ref();
        let prefix = format!("config '{}'", path.display());
        let text = fs::read_to_string(path)
            .map_err(SheetGridError::from)
            .with_prefix(&prefix)?;
        Config::from_json(&text).with_prefix(&prefix)
    }

    pub fn from_json(text: &str) -> Result<Config, SheetGridError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            sheet: self.sheet.to_owned(),
            range: self.range.to_owned(),
            header: self.header,
            nulls: self.nulls.to_owned(),
            error_as_null: self.error_as_null,
            skip_empty_rows: self.skip_empty_rows,
            analyze_rows: self.analyze_rows,
            identity_column: self.identity_column.to_owned(),
            dropped_columns: self.dropped_columns.to_owned(),
            required_column: self.anchor_column.to_owned(),
        }
    }

    pub fn rule_table(&self) -> RuleTable {
        RuleTable::canonical(&self.identity_column, &self.anchor_column)
            .with_min_width(self.min_width)
            .with_rules(self.column_rules.iter().cloned())
    }
}
