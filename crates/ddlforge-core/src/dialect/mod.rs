//! Dialect statement builders.
//!
//! A [`DdlDialect`] turns a [`SchemaDiff`] or a [`TableSpec`] into
//! literal SQL. The diff holds *what* changed; the dialect decides *how
//! to say it*. Every emitted string is a complete, independently
//! executable statement ending in `;`, with identifiers quoted in the
//! dialect's style.

mod mssql;
mod mysql;
mod postgres;

use core::fmt;
use std::str::FromStr;

pub use mssql::MssqlDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;

use crate::column::ForeignKeyRef;
use crate::diff::{SchemaDiff, TableChange};
use crate::table::TableSpec;

/// Renders typed table changes as dialect-specific DDL.
pub trait DdlDialect {
    /// Dialect name as used in the connection registry.
    fn name(&self) -> &'static str;

    /// Quotes an identifier in the dialect's style.
    fn quote(&self, ident: &str) -> String;

    /// Renders one column definition for CREATE TABLE / ADD COLUMN.
    fn column_definition(&self, column: &crate::column::ColumnSpec) -> String;

    /// Renders a complete CREATE TABLE statement.
    fn create_table(&self, table: &TableSpec) -> String;

    /// Renders one change as a complete statement against `table`
    /// (the table's current name at that point in the sequence).
    fn statement(&self, table: &str, change: &TableChange) -> String;

    /// Renders a whole diff, in emission order.
    ///
    /// Tracks the table rename: a diff that renames the table first
    /// has all later statements reference the new name.
    fn statements(&self, diff: &SchemaDiff) -> Vec<String> {
        let mut table = diff.table.clone();
        let mut out = Vec::with_capacity(diff.changes.len());
        for change in &diff.changes {
            out.push(self.statement(&table, change));
            if let TableChange::RenameTable { to } = change {
                table.clone_from(to);
            }
        }
        out
    }
}

/// The supported dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// MySQL / MariaDB.
    MySql,
    /// PostgreSQL.
    PostgreSql,
    /// Microsoft SQL Server.
    Mssql,
}

impl Dialect {
    /// Registry name of the dialect.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::PostgreSql => "postgresql",
            Self::Mssql => "mssql",
        }
    }

    /// Returns the statement builder for this dialect.
    #[must_use]
    pub fn builder(self) -> &'static dyn DdlDialect {
        match self {
            Self::MySql => &MySqlDialect,
            Self::PostgreSql => &PostgresDialect,
            Self::Mssql => &MssqlDialect,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDialect(pub String);

impl fmt::Display for UnknownDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown dialect '{}' (expected mysql, postgresql or mssql)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDialect {}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "postgresql" | "postgres" => Ok(Self::PostgreSql),
            "mssql" | "sqlserver" => Ok(Self::Mssql),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// `ON DELETE` / `ON UPDATE` suffix shared by all dialects.
pub(crate) fn referential_clauses(fk: &ForeignKeyRef) -> String {
    let mut out = String::new();
    if let Some(action) = fk.on_delete {
        out.push_str(" ON DELETE ");
        out.push_str(action.as_sql());
    }
    if let Some(action) = fk.on_update {
        out.push_str(" ON UPDATE ");
        out.push_str(action.as_sql());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{varchar, ReferentialAction};

    #[test]
    fn dialect_parsing() {
        assert_eq!("mysql".parse(), Ok(Dialect::MySql));
        assert_eq!("Postgres".parse(), Ok(Dialect::PostgreSql));
        assert_eq!("sqlserver".parse(), Ok(Dialect::Mssql));
        assert_eq!(
            "oracle".parse::<Dialect>(),
            Err(UnknownDialect("oracle".into()))
        );
    }

    #[test]
    fn rename_then_modify_references_the_new_name() {
        use crate::diff::{SchemaDiff, TableChange};
        use crate::types::DataType;

        let diff = SchemaDiff {
            table: "t1".into(),
            changes: vec![
                TableChange::RenameTable { to: "t2".into() },
                TableChange::SetDataType {
                    column: varchar("name", 128).build(),
                },
            ],
        };
        let sql = diff.statements(Dialect::PostgreSql);
        assert_eq!(sql[0], "ALTER TABLE \"t1\" RENAME TO \"t2\";");
        assert!(sql[1].starts_with("ALTER TABLE \"t2\""));
    }

    #[test]
    fn referential_suffix() {
        let mut fk = ForeignKeyRef::new("users", "id");
        assert_eq!(referential_clauses(&fk), "");
        fk.on_delete = Some(ReferentialAction::Cascade);
        fk.on_update = Some(ReferentialAction::SetNull);
        assert_eq!(
            referential_clauses(&fk),
            " ON DELETE CASCADE ON UPDATE SET NULL"
        );
    }
}
