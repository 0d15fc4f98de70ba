//! Hand-off payloads for the grid component, in the grid's own JSON vocabulary
//! (`rowData` records and `columnDefs` entries).
use crate::columns::ColumnDescriptor;
use crate::columns::FilterKind;
use crate::columns::Pinned;
use crate::dataset::column::ColumnType;
use crate::dataset::table::Record;
use crate::dataset::table::Table;
use serde::Serialize;
use serde::Serializer;

const TEXT_COLUMN_FILTER: &str = "agTextColumnFilter";

/// Row data and column definitions handed to the grid component.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPayload<'a> {
    pub row_data: Vec<Record<'a>>,
    pub column_defs: Vec<ColumnDef<'a>>,
}

impl<'a> GridPayload<'a> {
    pub fn new(table: &'a Table, descriptors: &'a [ColumnDescriptor]) -> Self {
        GridPayload {
            row_data: table.records().collect(),
            column_defs: descriptors.iter().map(ColumnDef::from).collect(),
        }
    }
}

/// The filter setting of a column definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Disabled,
    Generic,
    Text,
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Filter::Disabled => serializer.serialize_bool(false),
            Filter::Generic => serializer.serialize_bool(true),
            Filter::Text => serializer.serialize_str(TEXT_COLUMN_FILTER),
        }
    }
}

/// One entry of `columnDefs`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef<'a> {
    pub field: &'a str,
    pub min_width: u32,
    pub resizable: bool,
    pub sortable: bool,
    pub filter: Filter,
    pub floating_filter: bool,
    pub suppress_menu: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_data_type: Option<&'static str>,
}

impl<'a> From<&'a ColumnDescriptor> for ColumnDef<'a> {
    fn from(descriptor: &'a ColumnDescriptor) -> Self {
        let filter = match (descriptor.filterable, descriptor.filter_kind) {
            (false, _) => Filter::Disabled,
            (true, FilterKind::Generic) => Filter::Generic,
            (true, FilterKind::Text) => Filter::Text,
        };
        ColumnDef {
            field: &descriptor.name,
            min_width: descriptor.min_width,
            resizable: descriptor.resizable,
            sortable: descriptor.sortable,
            filter,
            floating_filter: descriptor.floating_filter,
            suppress_menu: descriptor.suppress_menu,
            hide: descriptor.hidden,
            pinned: match descriptor.pinned {
                Pinned::None => None,
                Pinned::Left => Some("left"),
            },
            cell_data_type: descriptor.data_type.map(cell_data_type),
        }
    }
}

/// Maps an inferred column type to the grid's cell data type.
/// Dates travel as `YYYY-MM-DD` strings; timestamps and times stay plain text.
fn cell_data_type(kind: ColumnType) -> &'static str {
    match kind {
        ColumnType::Boolean => "boolean",
        ColumnType::BigInt | ColumnType::Double => "number",
        ColumnType::Date => "dateString",
        ColumnType::Varchar | ColumnType::Timestamp | ColumnType::Time => "text",
    }
}
