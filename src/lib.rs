//! # sheet-grid
//!
//! Loads a tabular dataset from a spreadsheet and prepares it for a data grid
//! component: every record gets a unique identity, unwanted columns and
//! incomplete records are removed, and each remaining column gets a
//! declarative display configuration (width, sorting, filtering, pinning,
//! visibility).
//!
//! ## Pipeline
//!
//! - [`loader::Loader`] reads one sheet of an `.xlsx`/`.xlsm`/`.xlam` or `.ods`
//!   workbook into a [`dataset::table::Table`] and cleans it.
//! - [`columns::generate_column_descriptors`] applies a [`columns::RuleTable`]
//!   to the cleaned table's columns.
//! - [`grid::Grid::startup`] runs both once and holds the result;
//!   [`grid::Grid::payload`] serializes it for the grid component.
//!
//! ```no_run
//! use sheet_grid::config::Config;
//! use sheet_grid::grid::Grid;
//!
//! let grid = Grid::startup(&Config::default())?;
//! println!("{}", serde_json::to_string(&grid.payload())?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod columns;
pub mod config;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod loader;
pub mod payload;

mod helpers;
mod spreadsheet;

pub use crate::error::SheetGridError;
pub use crate::spreadsheet::SpreadsheetError;
