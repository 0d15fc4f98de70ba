use crate::spreadsheet::reference::index_to_reference;
use chrono::NaiveDate;
use chrono::TimeDelta;
use iso8601_duration::Duration as IsoDuration;

/// Types of cell data in spreadsheet files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// ISO 8601 duration strings
    IsoDuration,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Literal text, escaped characters and bracketed sections (colors, conditions) are ignored.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_date = false;
        let mut is_time = false;
        let mut is_color = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_color => is_literal = true,

                ']' if is_color => is_color = false,
                '[' if !is_literal => is_color = true,
                _ if is_literal || is_color => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }

    /// Returns true for cells whose text lives in the cell or the shared string table.
    pub(crate) fn is_string(&self) -> bool {
        matches!(self, CellType::InlineString | CellType::SharedString)
    }
}

/// A single non-empty cell read from a sheet.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw cell value: the text, a number literal, or a shared string index
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Converts cell value to boolean (1 = true, other = false).
    pub(crate) fn to_boolean(&self) -> bool {
        self.value == "1"
    }

    /// Converts cell value to 64-bit integer, parsing only leading numeric characters.
    pub(crate) fn to_bigint(&self) -> Result<i64, String> {
        let mut integer = self.value.as_str();
        for (index, char) in self.value.char_indices() {
            if !char.is_ascii_digit() && char != '-' {
                integer = &self.value[..index];
                break;
            }
        }
        integer.parse::<i64>().map_err(|_| format!("parse '{}' to bigint failed", self.value))
    }

    /// Converts cell value to double-precision floating point.
    pub(crate) fn to_double(&self) -> Result<f64, String> {
        self.value.parse::<f64>().map_err(|_| format!("parse '{}' to double failed", self.value))
    }

    /// Renders the cell as display text, resolving shared strings and date serials.
    pub(crate) fn to_text(&self, shared_strings: &[String]) -> Result<String, String> {
        let failed = |target: &str| format!("parse '{}' to {} failed", self.value, target);
        match self.kind {
            CellType::Boolean => Ok(if self.to_boolean() { "true" } else { "false" }.to_owned()),
            CellType::SharedString => self
                .value
                .parse::<usize>()
                .ok()
                .and_then(|index| shared_strings.get(index))
                .cloned()
                .ok_or_else(|| format!("shared string '{}' not found", self.value)),
            CellType::NumberDateTime1900 => to_datetime_string(&self.value, false).ok_or_else(|| failed("datetime")),
            CellType::NumberDateTime1904 => to_datetime_string(&self.value, true).ok_or_else(|| failed("datetime")),
            CellType::NumberDate1900 => to_date_string(&self.value, false).ok_or_else(|| failed("date")),
            CellType::NumberDate1904 => to_date_string(&self.value, true).ok_or_else(|| failed("date")),
            CellType::NumberTime1900 | CellType::NumberTime1904 => to_time_string(&self.value).ok_or_else(|| failed("time")),
            CellType::IsoDateTime => Ok(self.value.replace('T', " ")),
            CellType::IsoDuration => to_duration_string(&self.value).ok_or_else(|| failed("duration")),
            _ => Ok(self.value.to_owned()),
        }
    }
}

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Splits an Excel serial into whole days and milliseconds into the day.
/// Rounding happens on the full serial, so a fraction just short of a day carries into the date.
fn split_serial(value: &str) -> Option<(i64, i64)> {
    let millis = (value.parse::<f64>().ok()? * MILLIS_PER_DAY as f64).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let millis = millis as i64;
    Some((millis.div_euclid(MILLIS_PER_DAY), millis.rem_euclid(MILLIS_PER_DAY)))
}

/// Converts whole Excel days to a calendar date, `None` outside chrono's range.
/// Serials below 60 are shifted by a day to undo the Lotus 1-2-3 leap year bug.
fn serial_date(days: i64, is_1904: bool) -> Option<NaiveDate> {
    let offset = if is_1904 {
        1462
    } else if days < 60 {
        1
    } else {
        0
    };
    let delta = TimeDelta::try_days(days.checked_add(offset)?)?;
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(delta)
}

fn format_time(millis: i64) -> String {
    let (seconds, milliseconds) = (millis / 1_000, millis % 1_000);
    let (hours, minutes, seconds) = (seconds / 3_600, seconds / 60 % 60, seconds % 60);
    if milliseconds > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Converts Excel numeric date to ISO date string.
fn to_date_string(value: &str, is_1904: bool) -> Option<String> {
    let (days, _) = split_serial(value)?;
    Some(serial_date(days, is_1904)?.format("%Y-%m-%d").to_string())
}

/// Converts an Excel day fraction to an `HH:MM:SS[.mmm]` string, wrapping at midnight.
fn to_time_string(value: &str) -> Option<String> {
    let (_, millis) = split_serial(value)?;
    Some(format_time(millis))
}

/// Converts Excel numeric datetime to ISO datetime string.
fn to_datetime_string(value: &str, is_1904: bool) -> Option<String> {
    let (days, millis) = split_serial(value)?;
    let date = serial_date(days, is_1904)?;
    Some(format!("{} {}", date.format("%Y-%m-%d"), format_time(millis)))
}

/// Converts an ISO 8601 duration such as `PT10H30M00S` to `HH:MM:SS`.
fn to_duration_string(value: &str) -> Option<String> {
    let duration = value.parse::<IsoDuration>().ok()?;
    let hours = (duration.day * 24.0 + duration.hour) as i64;
    let minutes = duration.minute as i64;
    let seconds = duration.second as i64;
    Some(format!("{hours:02}:{minutes:02}:{seconds:02}"))
}
