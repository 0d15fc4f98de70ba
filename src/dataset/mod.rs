//! In-memory tabular data: typed columns of scalar values read from a sheet.
pub mod column;
pub mod range;
pub mod scalar;
pub mod table;
