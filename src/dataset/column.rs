use crate::dataset::scalar::Scalar;
use crate::spreadsheet::cell::CellType;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while assembling columns into a table.
#[derive(Error, Debug)]
pub enum ColumnError {
    #[error("Column '{0}' holds {1} values, expected {2}")]
    LengthMismatch(String, usize, usize),
}

/// Column data types inferred from spreadsheet cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Boolean values (true/false)
    Boolean,
    /// 64-bit signed integers
    BigInt,
    /// Double-precision floating point numbers
    Double,
    /// Variable-length strings
    Varchar,
    /// Date and time, rendered as `YYYY-MM-DD HH:MM:SS`
    Timestamp,
    /// Date without time component, rendered as `YYYY-MM-DD`
    Date,
    /// Time without date component, rendered as `HH:MM:SS`
    Time,
}

/// A named column of scalar values.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Column name (from header row or generated)
    pub name: String,
    /// Column data type
    pub kind: ColumnType,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType, values: Vec<Scalar>) -> Self {
        Column {
            name: name.into(),
            kind,
            values,
        }
    }
}

impl ColumnType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::BigInt => "bigint",
            ColumnType::Double => "double",
            ColumnType::Varchar => "varchar",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
        }
    }

    /// Infers the column type a single cell suggests.
    /// Handles the Excel date/time formats and numeric representations.
    pub(crate) fn from(cell_type: &CellType, value: &str) -> Option<Self> {
        match cell_type {
            CellType::Boolean => Some(ColumnType::Boolean),
            CellType::Number if Self::is_integer(value) => Some(ColumnType::BigInt),
            CellType::Number => Some(ColumnType::Double),
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => Some(ColumnType::Timestamp),
            CellType::NumberDate1900 | CellType::NumberDate1904 => Some(ColumnType::Date),
            CellType::NumberTime1900 | CellType::NumberTime1904 => Some(ColumnType::Time),
            CellType::IsoDateTime if value.starts_with("1899-12-30") => Some(ColumnType::Time),
            CellType::IsoDateTime if value.ends_with("T00:00:00") => Some(ColumnType::Date),
            CellType::IsoDateTime if !value.contains('T') => Some(ColumnType::Date),
            CellType::IsoDateTime => Some(ColumnType::Timestamp),
            CellType::IsoDuration => Some(ColumnType::Time),
            CellType::InlineString | CellType::SharedString => Some(ColumnType::Varchar),
            _ => None,
        }
    }

    /// Checks if a numeric literal holds an integer value: no exponent,
    /// and a decimal part, if any, made of zeros only.
    fn is_integer(value: &str) -> bool {
        if value.contains(['e', 'E']) {
            return false;
        }
        match value.find('.') {
            Some(index) => value[(index + 1)..].chars().all(|char| char == '0'),
            None => true,
        }
    }

    /// Detects the most specific common type from a collection of candidate types.
    /// Falls back to VARCHAR if types are inconsistent or empty.
    pub(crate) fn detect(types: Vec<Option<ColumnType>>) -> ColumnType {
        let types: Vec<ColumnType> = types.into_iter().flatten().collect();
        if types.is_empty() {
            ColumnType::Varchar
        } else if types.iter().all(|kind| kind.is_boolean()) {
            ColumnType::Boolean
        } else if types.iter().all(|kind| kind.is_int()) {
            ColumnType::BigInt
        } else if types.iter().all(|kind| kind.is_float()) {
            ColumnType::Double
        } else if types.iter().all(|kind| kind.is_date()) {
            ColumnType::Date
        } else if types.iter().all(|kind| kind.is_time()) {
            ColumnType::Time
        } else if types.iter().all(|kind| kind.is_datetime()) {
            ColumnType::Timestamp
        } else {
            ColumnType::Varchar
        }
    }

    #[inline]
    pub fn is_boolean(&self) -> bool {
        matches!(self, ColumnType::Boolean)
    }

    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, ColumnType::BigInt)
    }

    /// Returns true for integer and floating point columns.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self, ColumnType::BigInt | ColumnType::Double)
    }

    #[inline]
    pub fn is_date(&self) -> bool {
        matches!(self, ColumnType::Date)
    }

    #[inline]
    pub fn is_time(&self) -> bool {
        matches!(self, ColumnType::Time)
    }

    /// Returns true for any date or time related column.
    #[inline]
    pub fn is_datetime(&self) -> bool {
        matches!(self, ColumnType::Timestamp | ColumnType::Date | ColumnType::Time)
    }
}
