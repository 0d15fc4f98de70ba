use crate::columns::generate_column_descriptors;
use crate::columns::ColumnDescriptor;
use crate::config::Config;
use crate::dataset::table::Table;
use crate::error::SheetGridError;
use crate::loader::IdentityFactory;
use crate::loader::Loader;
use crate::loader::UuidFactory;
use crate::payload::GridPayload;
use log::info;

/// The loaded table and its column descriptors, fixed for the life of the process.
///
/// Reloading means calling [`Grid::startup`] again and replacing the value.
#[derive(Clone, Debug)]
pub struct Grid {
    table: Table,
    columns: Vec<ColumnDescriptor>,
}

impl Grid {
    /// Loads the configured source and derives its column descriptors.
    pub fn startup(config: &Config) -> Result<Grid, SheetGridError> {
        Grid::startup_with(config, UuidFactory)
    }

    /// Like [`Grid::startup`], taking row identities from `identities`.
    pub fn startup_with<F: IdentityFactory>(config: &Config, identities: F) -> Result<Grid, SheetGridError> {
        let table = Loader::with_identity_factory(config.loader_config(), identities).load(&config.source)?;
        let columns = generate_column_descriptors(&table, &config.rule_table());
        info!(
            "Grid ready: {} record(s), {} column(s), {} visible",
            table.row_count(),
            columns.len(),
            columns.iter().filter(|column| column.displayable).count()
        );
        Ok(Grid { table, columns })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn payload(&self) -> GridPayload<'_> {
        GridPayload::new(&self.table, &self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::FilterKind;
    use crate::columns::Pinned;
    use crate::helpers::fixture::*;

    #[test]
    fn startup_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_xlsx(dir.path(), "lapd.xlsx", &[("Sheet1", vec![
            text_row(&["Item#", "Description", "Qty"]),
            vec![number("1"), text("Radio"), number("2")],
            vec![number("2"), empty(), number("5")],
            vec![number("3"), text("Pager"), number("1")],
        ])]);
        let config = Config {
            source: path.to_str().unwrap().to_owned(),
            ..Default::default()
        };
        let mut next = 0;
        let grid = Grid::startup_with(&config, move || {
            next += 1;
            format!("id-{next}")
        }).unwrap();

        assert_eq!(grid.table().column_names(), vec!["Description", "Qty", "uuid"]);
        assert_eq!(grid.table().row_count(), 2);

        let columns = grid.columns();
        assert_eq!(columns.len(), 3);
        assert_eq!((columns[0].pinned, columns[0].filter_kind, columns[0].hidden), (Pinned::Left, FilterKind::Text, false));
        assert_eq!((columns[1].pinned, columns[1].filter_kind, columns[1].hidden), (Pinned::None, FilterKind::Generic, false));
        assert!(columns[2].hidden);

        let payload = serde_json::to_value(grid.payload()).unwrap();
        assert_eq!(payload["rowData"][1]["uuid"], "id-3");
        assert_eq!(payload["columnDefs"][2]["hide"], true);
    }

    #[test]
    fn startup_fails_without_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            source: dir.path().join("lapd.xlsx").to_str().unwrap().to_owned(),
            ..Default::default()
        };
        assert!(Grid::startup(&config).unwrap_err().is_source_unavailable());
    }
}
