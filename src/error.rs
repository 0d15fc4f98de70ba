use thiserror::Error;

/// Main error type for the sheet grid loader.
/// Aggregates errors from various sources including standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum SheetGridError {
    #[error("{0}")]
    WithContextError(String),

    /// The source spreadsheet cannot be opened or read.
    #[error("Source '{path}' is unavailable: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A column the load depends on is missing, or the header clashes with a reserved column.
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// The identity factory handed out a value that was empty or already in use.
    #[error("Identity factory produced an unusable value '{0}'")]
    IdentityCollision(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    #[error("{0}")]
    OdsError(#[from] crate::spreadsheet::ods::OdsError),

    // Dataset module errors
    #[error("{0}")]
    RangeError(#[from] crate::dataset::range::RangeError),

    #[error("{0}")]
    ColumnError(#[from] crate::dataset::column::ColumnError),
}

impl SheetGridError {
    /// Builds a `SourceUnavailable` error for the given path.
    pub(crate) fn source_unavailable(path: &str, source: std::io::Error) -> Self {
        SheetGridError::SourceUnavailable {
            path: path.to_owned(),
            source,
        }
    }

    /// Returns true if the error is `SourceUnavailable`.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, SheetGridError::SourceUnavailable { .. })
    }

    /// Returns true if the error is `SchemaViolation`.
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, SheetGridError::SchemaViolation(_))
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SheetGridError> {
    /// Prefixes the error message, leaving load-policy errors untouched so callers can still match them.
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| match e {
            SheetGridError::SourceUnavailable { .. }
            | SheetGridError::SchemaViolation(_)
            | SheetGridError::IdentityCollision(_) => e,
            _ => SheetGridError::WithContextError(format!("{}: {}", message, e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_prefix_wraps_reader_errors() {
        let result: Result<(), SheetGridError> = Err(SheetGridError::WithContextError("broken".to_owned()));
        let error = result.with_prefix("book.xlsx").unwrap_err();
        assert_eq!(error.to_string(), "book.xlsx: broken");
    }

    #[test]
    fn with_prefix_keeps_policy_errors() {
        let result: Result<(), SheetGridError> = Err(SheetGridError::SchemaViolation("missing".to_owned()));
        let error = result.with_prefix("book.xlsx").unwrap_err();
        assert!(error.is_schema_violation());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let result: Result<(), SheetGridError> = Err(SheetGridError::source_unavailable("a.xlsx", io));
        assert!(result.with_prefix("a.xlsx").unwrap_err().is_source_unavailable());
    }
}
