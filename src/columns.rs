//! # Column-Config Generator
//!
//! Derives one [`ColumnDescriptor`] per table column. Every column starts from
//! the same baseline; a [`RuleTable`] then overrides fields for columns matched
//! by exact name. Rules naming columns that do not exist are skipped, so a
//! table without its anchor column still gets a full set of descriptors.
use crate::dataset::column::ColumnType;
use crate::dataset::table::Table;
use log::debug;
use serde::Deserialize;
use serde::Serialize;

/// Baseline minimum column width in pixels.
pub const DEFAULT_MIN_WIDTH: u32 = 150;

/// Filter offered for a column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Free text matching
    Text,
    /// Whatever filter the grid picks for the column's values
    #[default]
    Generic,
}

/// Side a column is pinned to while the grid scrolls horizontally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pinned {
    #[default]
    None,
    Left,
}

/// Display and interaction settings of one column.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub name: String,
    /// Always `!hidden`
    pub displayable: bool,
    pub sortable: bool,
    pub filterable: bool,
    pub filter_kind: FilterKind,
    pub pinned: Pinned,
    pub hidden: bool,
    pub min_width: u32,
    pub resizable: bool,
    /// Filter input shown under the header
    pub floating_filter: bool,
    /// Header menu hidden
    pub suppress_menu: bool,
    /// Inferred value type, when the column came from a table
    pub data_type: Option<ColumnType>,
}

impl ColumnDescriptor {
    /// The descriptor every column starts from.
    pub fn baseline(name: &str, min_width: u32) -> Self {
        ColumnDescriptor {
            name: name.to_owned(),
            displayable: true,
            sortable: true,
            filterable: true,
            filter_kind: FilterKind::Generic,
            pinned: Pinned::None,
            hidden: false,
            min_width,
            resizable: true,
            floating_filter: true,
            suppress_menu: true,
            data_type: None,
        }
    }
}

/// Field overrides applied to the column named `column`.
///
/// Unset fields leave the descriptor unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnRule {
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_kind: Option<FilterKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<Pinned>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
}

impl ColumnRule {
    pub fn new(column: impl Into<String>) -> Self {
        ColumnRule {
            column: column.into(),
            ..Default::default()
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = Some(filterable);
        self
    }

    pub fn filter_kind(mut self, filter_kind: FilterKind) -> Self {
        self.filter_kind = Some(filter_kind);
        self
    }

    pub fn pinned(mut self, pinned: Pinned) -> Self {
        self.pinned = Some(pinned);
        self
    }

    pub fn min_width(mut self, min_width: u32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    fn matches(&self, name: &str) -> bool {
        self.column == name
    }

    fn apply(&self, descriptor: &mut ColumnDescriptor) {
        if let Some(hidden) = self.hidden {
            descriptor.hidden = hidden;
        }
        if let Some(sortable) = self.sortable {
            descriptor.sortable = sortable;
        }
        if let Some(filterable) = self.filterable {
            descriptor.filterable = filterable;
        }
        if let Some(filter_kind) = self.filter_kind {
            descriptor.filter_kind = filter_kind;
        }
        if let Some(pinned) = self.pinned {
            descriptor.pinned = pinned;
        }
        if let Some(min_width) = self.min_width {
            descriptor.min_width = min_width;
        }
    }
}

/// Ordered column rules over a shared baseline; later rules win on the same field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    min_width: u32,
    rules: Vec<ColumnRule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        RuleTable::new(DEFAULT_MIN_WIDTH)
    }
}

impl RuleTable {
    /// A table without rules.
    pub fn new(min_width: u32) -> Self {
        RuleTable {
            min_width,
            rules: Vec::new(),
        }
    }

    /// The identity column is hidden; the anchor column is pinned left with a text filter.
    pub fn canonical(identity_column: &str, anchor_column: &str) -> Self {
        RuleTable::default()
            .with_rule(ColumnRule::new(identity_column).hidden(true))
            .with_rule(
                ColumnRule::new(anchor_column)
                    .pinned(Pinned::Left)
                    .filter_kind(FilterKind::Text),
            )
    }

    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn with_rule(mut self, rule: ColumnRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = ColumnRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    pub fn rules(&self) -> &[ColumnRule] {
        &self.rules
    }

    /// Describes a single column.
    pub fn describe(&self, name: &str, data_type: Option<ColumnType>) -> ColumnDescriptor {
        let mut descriptor = ColumnDescriptor::baseline(name, self.min_width);
        descriptor.data_type = data_type;
        for rule in self.rules.iter().filter(|rule| rule.matches(name)) {
            rule.apply(&mut descriptor);
        }
        descriptor.displayable = !descriptor.hidden;
        descriptor
    }

    /// Describes columns by name, one descriptor per name in the same order.
    pub fn describe_names<S: AsRef<str>>(&self, names: &[S]) -> Vec<ColumnDescriptor> {
        self.log_unmatched(names.iter().map(AsRef::as_ref));
        names
            .iter()
            .map(|name| self.describe(name.as_ref(), None))
            .collect()
    }

    fn log_unmatched<'a>(&self, names: impl Iterator<Item = &'a str> + Clone) {
        for rule in &self.rules {
            if !names.clone().any(|name| rule.matches(name)) {
                debug!("Column rule for '{}' matches no column", rule.column);
            }
        }
    }
}

/// Produces one descriptor per column of `table`, in column order.
pub fn generate_column_descriptors(table: &Table, rules: &RuleTable) -> Vec<ColumnDescriptor> {
    rules.log_unmatched(table.columns().iter().map(|column| column.name.as_str()));
    table
        .columns()
        .iter()
        .map(|column| rules.describe(&column.name, Some(column.kind)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::column::Column;
    use crate::dataset::scalar::Scalar;

    fn cleaned_table() -> Table {
        Table::from_columns("Items", vec![
            Column::new("Description", ColumnType::Varchar, vec!["Radio".into(), "Pager".into()]),
            Column::new("Qty", ColumnType::BigInt, vec![Scalar::Integer(2), Scalar::Integer(1)]),
            Column::new("uuid", ColumnType::Varchar, vec!["a".into(), "b".into()]),
        ]).unwrap()
    }

    #[test]
    fn canonical_descriptors() {
        let descriptors = generate_column_descriptors(&cleaned_table(), &RuleTable::canonical("uuid", "Description"));
        let names: Vec<&str> = descriptors.iter().map(|descriptor| descriptor.name.as_str()).collect();
        assert_eq!(names, vec!["Description", "Qty", "uuid"]);

        let description = &descriptors[0];
        assert_eq!(description.pinned, Pinned::Left);
        assert_eq!(description.filter_kind, FilterKind::Text);
        assert!(!description.hidden);
        assert!(description.displayable);
        assert_eq!(description.data_type, Some(ColumnType::Varchar));

        let quantity = &descriptors[1];
        assert_eq!(quantity.pinned, Pinned::None);
        assert_eq!(quantity.filter_kind, FilterKind::Generic);
        assert!(!quantity.hidden);
        assert_eq!(quantity.data_type, Some(ColumnType::BigInt));

        let identity = &descriptors[2];
        assert!(identity.hidden);
        assert!(!identity.displayable);
        assert!(identity.filterable);
        assert_eq!(identity.filter_kind, FilterKind::Generic);

        for descriptor in &descriptors {
            assert_eq!(descriptor.min_width, 150);
            assert!(descriptor.sortable);
            assert!(descriptor.filterable);
            assert!(descriptor.resizable);
            assert!(descriptor.floating_filter);
            assert!(descriptor.suppress_menu);
        }
    }

    #[test]
    fn missing_anchor_degrades_to_baseline() {
        let rules = RuleTable::canonical("uuid", "Description");
        let descriptors = rules.describe_names(&["Qty", "Notes", "uuid"]);
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0], ColumnDescriptor::baseline("Qty", 150));
        assert_eq!(descriptors[1], ColumnDescriptor::baseline("Notes", 150));
        assert!(descriptors[2].hidden);
        assert!(descriptors.iter().all(|descriptor| descriptor.pinned == Pinned::None));
    }

    #[test]
    fn empty_column_set() {
        let rules = RuleTable::canonical("uuid", "Description");
        assert!(rules.describe_names::<&str>(&[]).is_empty());
        assert!(generate_column_descriptors(&Table::new("empty"), &rules).is_empty());
    }

    #[test]
    fn deterministic_output() {
        let rules = RuleTable::canonical("uuid", "Description");
        let table = cleaned_table();
        assert_eq!(generate_column_descriptors(&table, &rules), generate_column_descriptors(&table, &rules));
    }

    #[test]
    fn later_rules_override_earlier_ones() {
        let rules = RuleTable::canonical("uuid", "Description")
            .with_min_width(90)
            .with_rules([
                ColumnRule::new("Qty").min_width(60).sortable(false),
                ColumnRule::new("Description").pinned(Pinned::None),
                ColumnRule::new("uuid").filterable(false),
            ]);
        let descriptors = rules.describe_names(&["Description", "Qty", "uuid"]);

        assert_eq!(descriptors[0].pinned, Pinned::None);
        assert_eq!(descriptors[0].filter_kind, FilterKind::Text);
        assert_eq!(descriptors[0].min_width, 90);
        assert_eq!(descriptors[1].min_width, 60);
        assert!(!descriptors[1].sortable);
        assert!(descriptors[2].hidden);
        assert!(!descriptors[2].filterable);
    }

    #[test]
    fn rules_from_json() {
        let rule: ColumnRule = serde_json::from_str(r#"{"column": "Qty", "pinned": "left", "filter_kind": "text"}"#).unwrap();
        assert_eq!(rule, ColumnRule::new("Qty").pinned(Pinned::Left).filter_kind(FilterKind::Text));
        assert!(serde_json::from_str::<ColumnRule>(r#"{"column": "Qty", "width": 3}"#).is_err());
    }
}
