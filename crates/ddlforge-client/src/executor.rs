//! DDL runner.
//!
//! Takes generated statements and runs them against a live connection,
//! sequentially and without a wrapping transaction — a mid-batch
//! failure stops and reports, leaving earlier statements applied.

use ddlforge_core::{Dialect, SchemaDiff, TableSpec};
use tracing::{debug, info, warn};

use crate::connection::Connection;
use crate::error::Result;

/// Where statements land: a live [`Connection`] in production, a
/// recorder in tests.
pub trait Execute {
    /// The dialect statements should be rendered for.
    fn dialect(&self) -> Dialect;

    /// Runs one statement.
    async fn execute(&mut self, sql: &str) -> Result<()>;
}

impl Execute for Connection {
    fn dialect(&self) -> Dialect {
        Connection::dialect(self)
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        Connection::execute(self, sql).await
    }
}

/// Runs diffs and create-table statements against a connection.
pub struct DdlRunner<E: Execute> {
    connection: E,
    dry_run: bool,
}

impl<E: Execute> DdlRunner<E> {
    /// Wraps an open connection.
    #[must_use]
    pub fn new(connection: E) -> Self {
        Self {
            connection,
            dry_run: false,
        }
    }

    /// Enables dry-run mode (SQL is printed but not executed).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Applies a diff. Returns the number of executed (or, in dry-run
    /// mode, printed) statements.
    pub async fn apply(&mut self, diff: &SchemaDiff) -> Result<usize> {
        if diff.is_empty() {
            info!(table = %diff.table, "No changes detected");
            return Ok(0);
        }
        let statements = diff.statements(self.connection.dialect());
        let count = self.run_all(statements).await?;
        if self.dry_run {
            info!(table = %diff.table, statements = count, "Dry run, nothing executed");
        } else {
            info!(table = %diff.table, statements = count, "Schema change applied");
        }
        Ok(count)
    }

    /// Creates a table from a complete specification.
    pub async fn create_table(&mut self, table: &TableSpec) -> Result<()> {
        let sql = self.connection.dialect().builder().create_table(table);
        self.run_all(vec![sql]).await?;
        if self.dry_run {
            info!(table = %table.name, "Dry run, nothing executed");
        } else {
            info!(table = %table.name, "Table created");
        }
        Ok(())
    }

    async fn run_all(&mut self, statements: Vec<String>) -> Result<usize> {
        let mut count = 0;
        for sql in statements {
            debug!(sql = %sql, "Executing SQL");

            if self.dry_run {
                println!("{sql}");
                count += 1;
                continue;
            }
            // Skip comments (unsupported operations render as "--")
            if sql.starts_with("--") {
                warn!(comment = %sql, "Skipping comment (unsupported operation)");
                continue;
            }
            self.connection.execute(&sql).await?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddlforge_core::column::{integer, varchar};
    use ddlforge_core::diff_tables;

    struct Recorder {
        dialect: Dialect,
        executed: Vec<String>,
    }

    impl Execute for Recorder {
        fn dialect(&self) -> Dialect {
            self.dialect
        }

        async fn execute(&mut self, sql: &str) -> Result<()> {
            self.executed.push(sql.to_string());
            Ok(())
        }
    }

    fn recorder(dialect: Dialect) -> Recorder {
        Recorder {
            dialect,
            executed: Vec::new(),
        }
    }

    fn sample_diff() -> SchemaDiff {
        let old = TableSpec::new("t").with_column(varchar("a", 10).source("a").build());
        let mut new = old.clone();
        new.columns[0].name = "b".into();
        let new = new.with_column(varchar("c", 5).build());
        diff_tables(&old, &new)
    }

    #[tokio::test]
    async fn apply_runs_statements_in_order() {
        let mut runner = DdlRunner::new(recorder(Dialect::PostgreSql));
        let count = runner.apply(&sample_diff()).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            runner.connection.executed,
            vec![
                "ALTER TABLE \"t\" RENAME COLUMN \"a\" TO \"b\";",
                "ALTER TABLE \"t\" ADD COLUMN \"c\" VARCHAR(5);",
            ]
        );
    }

    #[tokio::test]
    async fn dry_run_counts_printed_statements_but_executes_nothing() {
        let mut runner = DdlRunner::new(recorder(Dialect::PostgreSql)).dry_run(true);
        let count = runner.apply(&sample_diff()).await.unwrap();

        assert_eq!(count, 2);
        assert!(runner.connection.executed.is_empty());
    }

    #[tokio::test]
    async fn comment_statements_are_skipped() {
        // An MSSQL identity change renders as a comment statement.
        let old = TableSpec::new("t").with_column(integer("id").source("id").build());
        let mut new = old.clone();
        new.columns[0].auto_increment = true;
        new.columns[0].nullable = false;

        let mut runner = DdlRunner::new(recorder(Dialect::Mssql));
        let count = runner.apply(&diff_tables(&old, &new)).await.unwrap();

        assert_eq!(count, 0);
        assert!(runner.connection.executed.is_empty());
    }

    #[tokio::test]
    async fn empty_diff_is_a_no_op() {
        let old = TableSpec::new("t").with_column(integer("id").source("id").build());
        let mut runner = DdlRunner::new(recorder(Dialect::MySql));
        let count = runner.apply(&diff_tables(&old, &old.clone())).await.unwrap();

        assert_eq!(count, 0);
        assert!(runner.connection.executed.is_empty());
    }
}
