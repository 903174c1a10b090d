//! Table specifications.

use crate::column::ColumnSpec;

/// A table: name plus ordered columns.
///
/// Column order is preserved from reflection (ordinal position) or from
/// the form that captured the desired layout, and carries through to
/// generated CREATE TABLE statements.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    /// Creates an empty table specification.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column, builder style.
    #[must_use]
    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Looks a column up by its current name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks a column up by the reflected name it was seeded from.
    #[must_use]
    pub fn column_by_source(&self, source: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.key() == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{integer, varchar};

    #[test]
    fn lookup_by_name_and_source() {
        let table = TableSpec::new("users")
            .with_column(integer("id").primary_key().build())
            .with_column(varchar("full_name", 255).source("name").build());

        assert!(table.column("id").is_some());
        assert!(table.column("name").is_none());
        assert_eq!(
            table.column_by_source("name").map(|c| c.name.as_str()),
            Some("full_name")
        );
    }
}
