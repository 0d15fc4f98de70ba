use crate::error::SheetGridError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::FileReader;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use log::debug;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use thiserror::Error;
use zip::ZipArchive;

const MIME_TYPE: &[u8] = b"application/vnd.oasis.opendocument.spreadsheet";
const SPREADSHEET: QName = QName(b"office:spreadsheet");
const TABLE: QName = QName(b"table:table");
const TABLE_ROW: QName = QName(b"table:table-row");
const TABLE_CELL: QName = QName(b"table:table-cell");
/// Cells hidden under a merged cell
const TABLE_COVERED_CELL: QName = QName(b"table:covered-table-cell");
/// Comments attached to a cell
const ANNOTATION: QName = QName(b"office:annotation");
const PARAGRAPH: QName = QName(b"text:p");
/// Run of spaces, `text:c` holding the count
const SPACES: QName = QName(b"text:s");
const FILE_ENTRY: QName = QName(b"manifest:file-entry");
const ENCRYPTION_DATA: QName = QName(b"manifest:encryption-data");

#[derive(Error, Debug)]
pub enum OdsError {
    #[error("Invalid ODS MIME type")]
    MimeTypeError,
}

/// An OpenDocument spreadsheet (.ods)
pub(crate) struct OdsSpreadsheet {
    pub(crate) name: String,
    zip: ZipArchive<FileReader>,
}

impl OdsSpreadsheet {
    /// Opens an ODS file, validating its MIME type and rejecting encrypted documents
    pub(crate) fn open(file_name: &str) -> Result<Self, SheetGridError> {
        let file = File::open(file_name)
            .map_err(|error| SheetGridError::source_unavailable(file_name, error))?;
        let mut zip = ZipArchive::new(BufReader::new(file))?;
        check_mime(&mut zip)?;
        if is_password_protected(&mut zip)? {
            Err(SpreadsheetError::SpreadsheetPasswordProtectedError(file_name.to_owned()))?;
        }
        debug!("Opened '{}'", file_name);
        Ok(OdsSpreadsheet {
            name: file_name.to_owned(),
            zip,
        })
    }
}

impl Spreadsheet for OdsSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// ODS stores strings inline, so there is no shared table to load.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, SheetGridError> {
        Ok(Vec::new())
    }

    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Sheet>, SheetGridError> {
        let mut sheets = Vec::<Sheet>::new();
        let mut sheet_name = String::new();
        let mut reader = self.zip
            .xml_reader("content.xml")?
            .ok_or_else(|| SpreadsheetError::FileError("content.xml".to_owned()))?;
        'sheets: loop {
            if criteria.limit_reached(sheets.len()) {
                break;
            }

            // Seek the next accepted table
            let mut found = false;
            match_xml_events!(reader => {
                Event::End(event) if event.name() == SPREADSHEET => break 'sheets,
                Event::Start(event) if event.name() == TABLE => {
                    let table_name = event.get_attribute_value("table:name")?.unwrap_or_default();
                    if criteria.accept(&table_name) {
                        sheet_name.clear();
                        sheet_name.push_str(&table_name);
                        found = true;
                        break;
                    }
                }
            });
            if !found {
                break;
            }

            let mut sheet = Sheet::new(&self.name, &sheet_name, criteria.range, criteria.skip_empty_rows);
            let mut row = 0usize;
            let mut col = 0usize;
            let mut row_count = 1usize;
            let mut col_count = 1usize;
            let mut kind = CellType::default();
            let mut value = String::new();
            let mut text_context = false;
            let mut comment_context = false;
            match_xml_events!(reader => {
                Event::End(event) if event.name() == TABLE => break,
                Event::Start(event) if event.name() == TABLE_ROW => {
                    row_count = event.parse_attribute_value("table:number-rows-repeated")?.unwrap_or(1);
                    col = 0;
                }
                Event::End(event) if event.name() == TABLE_ROW => {
                    row += row_count;
                    if sheet.after_row_upper_bound(row) {
                        // Skip the remainder of this table
                        match_xml_events!(reader => {
                            Event::End(event) if event.name() == TABLE => break,
                        });
                        break;
                    }
                }
                Event::Start(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                    value.clear();
                    col_count = event.parse_attribute_value("table:number-columns-repeated")?.unwrap_or(1);
                    let value_type = event.get_attribute_value("office:value-type")?;
                    kind = match value_type.as_deref() {
                        None => CellType::Empty,
                        Some("boolean") => CellType::Boolean,
                        Some("date") => CellType::IsoDateTime,
                        Some("time") => CellType::IsoDuration,
                        Some("string") => {
                            let is_error = event.get_attribute_value("calcext:value-type")?
                                .map(|value_type| value_type == "error")
                                .unwrap_or(false);
                            match (is_error, criteria.error_as_null) {
                                (true, true) => CellType::Empty,
                                (true, false) => CellType::Error,
                                _ => CellType::InlineString,
                            }
                        }
                        Some(_) => CellType::Number,
                    };

                    text_context = false;
                    match kind {
                        CellType::Empty => (),
                        CellType::InlineString | CellType::Error => text_context = true,
                        CellType::Boolean => {
                            let truth = event.get_attribute_value("office:boolean-value")?
                                .map(|flag| flag != "false" && flag != "0")
                                .unwrap_or(false);
                            value.push_str(if truth { "1" } else { "0" });
                        }
                        CellType::IsoDateTime => if let Some(data) = event.get_attribute_value("office:date-value")? {
                            value.push_str(&data);
                        },
                        CellType::IsoDuration => if let Some(data) = event.get_attribute_value("office:time-value")? {
                            value.push_str(&data);
                        },
                        _ => if let Some(data) = event.get_attribute_value("office:value")? {
                            value.push_str(&data);
                        },
                    }
                }
                Event::End(event) if event.name() == TABLE_CELL || event.name() == TABLE_COVERED_CELL => {
                    if kind != CellType::Empty && !value.is_empty() {
                        for row_number in row..row + row_count {
                            if sheet.after_row_upper_bound(row_number) {
                                break;
                            }
                            for col_number in col..col + col_count {
                                if !sheet.contains(row_number, col_number) {
                                    continue;
                                }
                                if kind == CellType::Error {
                                    return Err(SpreadsheetError::CellValueError(
                                        sheet.file_name.to_owned(),
                                        sheet.name.to_owned(),
                                        index_to_reference(row_number, col_number),
                                        value.to_owned(),
                                    ).into());
                                }
                                sheet.push(Cell {
                                    row: row_number,
                                    col: col_number,
                                    kind,
                                    value: value.to_owned(),
                                });
                            }
                        }
                    }
                    col += col_count;
                    kind = CellType::default();
                    text_context = false;
                    comment_context = false;
                }
                Event::Start(event) if text_context && event.name() == ANNOTATION => comment_context = true,
                Event::End(event) if text_context && event.name() == ANNOTATION => comment_context = false,
                Event::Start(event) if text_context && !comment_context && event.name() == PARAGRAPH => {
                    if !value.is_empty() {
                        value.push('\n');
                    }
                }
                Event::Start(event) if text_context && !comment_context && event.name() == SPACES => {
                    let count = event.parse_attribute_value("text:c")?.unwrap_or(1usize);
                    value.push_str(&" ".repeat(count));
                }
                Event::Text(event) if text_context && !comment_context => value.push_bytes_text(&event)?,
                Event::GeneralRef(event) if text_context && !comment_context => value.push_bytes_ref(&event)?,
            });
            sheet.finish();
            debug!("Read {} cell(s) from sheet '{}'", sheet.cells.len(), sheet.name);
            sheets.push(sheet);
        }

        Ok(sheets)
    }
}

/// Validates the `mimetype` entry when the archive carries one
fn check_mime(zip: &mut ZipArchive<FileReader>) -> Result<(), SheetGridError> {
    if let Some(file) = &mut zip.file("mimetype")? {
        let mut buffer = Vec::with_capacity(MIME_TYPE.len());
        file.read_to_end(&mut buffer)?;
        if buffer.trim_ascii() != MIME_TYPE {
            Err(OdsError::MimeTypeError)?;
        }
    }
    Ok(())
}

/// Reports whether any manifest entry carries encryption data
fn is_password_protected(zip: &mut ZipArchive<FileReader>) -> Result<bool, SheetGridError> {
    let mut reader = match zip.xml_reader("META-INF/manifest.xml")? {
        Some(reader) => reader,
        None => return Ok(false),
    };
    let mut in_file_entry = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == FILE_ENTRY => in_file_entry = true,
        Event::End(event) if event.name() == FILE_ENTRY => in_file_entry = false,
        Event::Start(event) if in_file_entry && event.name() == ENCRYPTION_DATA => {
            return Ok(true);
        }
    });
    Ok(false)
}
