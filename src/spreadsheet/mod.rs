//! # Spreadsheet Reading Module
//!
//! Reads Office Open XML (`.xlsx`, `.xlsm`, `.xlam`) and OpenDocument (`.ods`)
//! workbooks into [`Sheet`](sheet::Sheet) buffers of typed cells. Both formats
//! are ZIP containers of XML parts and are parsed with a streaming XML reader.
pub(crate) mod cell;
pub(crate) mod criteria;
pub(crate) mod excel;
pub(crate) mod ods;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

use crate::error::SheetGridError;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::ods::OdsSpreadsheet;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Type alias for buffered file reader
pub(crate) type FileReader = BufReader<File>;

/// Errors raised while reading a spreadsheet's structure or cells.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Cannot detect file format for '{0}'")]
    FileFormatError(String),

    #[error("Spreadsheet '{0}' contains no sheets")]
    SpreadsheetEmptyError(String),

    #[error("Spreadsheet '{0}' is password protected")]
    SpreadsheetPasswordProtectedError(String),

    #[error("Missing part '{0}' in spreadsheet archive")]
    FileError(String),

    #[error("No sheet in '{0}' matches '{1}'")]
    SheetNotFoundError(String, String),

    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),
}

/// A workbook opened for reading.
pub(crate) trait Spreadsheet {
    /// Returns the file name of this spreadsheet
    fn name(&self) -> String;

    /// Loads the shared string table; formats storing strings inline return an empty table.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, SheetGridError>;

    /// Reads the sheets accepted by `criteria`, in workbook order.
    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Sheet>, SheetGridError>;

    /// Reads the first sheet accepted by `criteria`.
    fn read_first_sheet(&mut self, criteria: &Criteria) -> Result<Sheet, SheetGridError> {
        let criteria = Criteria {
            sheet_limit: Some(1),
            ..criteria.clone()
        };
        self.read_sheets(&criteria)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                let pattern = criteria.sheet_name_pattern
                    .as_ref()
                    .map(|pattern| pattern.as_str().to_owned())
                    .unwrap_or_else(|| "*".to_owned());
                SpreadsheetError::SheetNotFoundError(self.name(), pattern).into()
            })
    }
}

/// Opens a spreadsheet, choosing the reader from the file extension.
/// A path that cannot be opened is unavailable whatever its extension.
pub(crate) fn open_spreadsheet(file_name: &str) -> Result<Box<dyn Spreadsheet>, SheetGridError> {
    File::open(file_name).map_err(|source| SheetGridError::source_unavailable(file_name, source))?;
    let extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase());
    match extension.as_deref() {
        Some("xlsx") | Some("xlsm") | Some("xlam") => Ok(Box::new(XlsxSpreadsheet::open(file_name)?)),
        Some("ods") => Ok(Box::new(OdsSpreadsheet::open(file_name)?)),
        _ => Err(SpreadsheetError::FileFormatError(file_name.to_owned()))?,
    }
}
