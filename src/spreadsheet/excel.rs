//! Office Open XML workbook helpers
use crate::error::SheetGridError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::FileReader;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use zip::ZipArchive;

/// XML tag name for relationship elements in Excel files
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Opens an Excel file and loads its workbook structure
///
/// # Arguments
/// * `file_name` - Path to the Excel file
/// * `load_workbook` - Function to load workbook metadata and sheets
/// * `load_number_formats` - Function to load number formatting information
///
/// # Returns
/// Tuple containing:
/// - Zip archive handle
/// - Number format mappings
/// - List of sheet names and their paths
pub(super) fn open<W, F>(file_name: &str, load_workbook: W, load_number_formats: F) -> Result<(
    ZipArchive<FileReader>,
    Vec<CellType>,
    Vec<(String, String)>
), SheetGridError>
where
    W: Fn(&mut ZipArchive<FileReader>) -> Result<(Vec<(String, String)>, bool), SheetGridError>,
    F: Fn(&mut ZipArchive<FileReader>, bool) -> Result<Vec<CellType>, SheetGridError>,
{
    let file = File::open(file_name)
        .map_err(|error| SheetGridError::source_unavailable(file_name, error))?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;
    let (sheets, is_1904) = load_workbook(&mut zip)?;
    if sheets.is_empty() {
        Err(SpreadsheetError::SpreadsheetEmptyError(file_name.to_owned()))?
    }

    let number_formats = load_number_formats(&mut zip, is_1904)?;
    Ok((zip, number_formats, sheets))
}

/// Loads worksheet relationships, mapping relationship IDs to worksheet paths
pub(super) fn load_relationships(zip: &mut ZipArchive<FileReader>, path: &str) -> Result<HashMap<String, String>, SheetGridError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheet relationships are of interest
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Maps style indexes to cell types using custom and built-in number formats
pub(super) fn load_number_formats(format_indexes: Vec<String>, custom_formats: HashMap<String, CellType>, is_1904: bool) -> Vec<CellType> {
    format_indexes
        .iter()
        .map(|id| {
            custom_formats
                .get(id)
                .copied()
                .or_else(|| CellType::parse_builtin_number_format_id(id, is_1904))
                .unwrap_or(CellType::Number)
        })
        .collect()
}

/// Normalizes a relationship target to a path inside the archive
pub(crate) fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(stripped) = path.strip_prefix('/') {
        stripped.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}
