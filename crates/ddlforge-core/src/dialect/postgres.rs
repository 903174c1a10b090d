//! PostgreSQL statement builder.

use super::{referential_clauses, DdlDialect};
use crate::column::ColumnSpec;
use crate::diff::TableChange;
use crate::table::TableSpec;
use crate::types::DataType;

/// PostgreSQL dialect. Double-quoted identifiers.
///
/// Auto-increment columns never see `AUTO_INCREMENT`: create-table mode
/// substitutes a serial type for the integer family and
/// `GENERATED ALWAYS AS IDENTITY` otherwise; alter mode uses the
/// identity forms.
pub struct PostgresDialect;

impl PostgresDialect {
    fn serial_keyword(data_type: &DataType) -> Option<&'static str> {
        match data_type {
            DataType::TinyInt | DataType::SmallInt => Some("SMALLSERIAL"),
            DataType::Integer => Some("SERIAL"),
            DataType::BigInt => Some("BIGSERIAL"),
            _ => None,
        }
    }
}

impl DdlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn quote(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn column_definition(&self, column: &ColumnSpec) -> String {
        let mut def = self.quote(&column.name);
        if column.auto_increment {
            match Self::serial_keyword(&column.data_type) {
                Some(serial) => {
                    def.push(' ');
                    def.push_str(serial);
                }
                None => {
                    def.push(' ');
                    def.push_str(&column.data_type.to_sql());
                    def.push_str(" GENERATED ALWAYS AS IDENTITY");
                }
            }
        } else {
            def.push(' ');
            def.push_str(&column.data_type.to_sql());
            if !column.nullable {
                def.push_str(" NOT NULL");
            }
        }
        if let Some(value) = &column.default {
            def.push_str(" DEFAULT ");
            def.push_str(&value.to_sql());
        }
        def
    }

    fn create_table(&self, table: &TableSpec) -> String {
        let mut defs: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect();

        let pk: Vec<&ColumnSpec> = table.columns.iter().filter(|c| c.primary_key).collect();
        if let Some(first) = pk.first() {
            let cols: Vec<String> = pk.iter().map(|c| self.quote(&c.name)).collect();
            defs.push(format!(
                "CONSTRAINT {} PRIMARY KEY ({})",
                self.quote(&format!("pk_{}", first.name)),
                cols.join(", ")
            ));
        }

        for column in table.columns.iter().filter(|c| c.unique) {
            defs.push(format!("UNIQUE ({})", self.quote(&column.name)));
        }

        for column in &table.columns {
            if let Some(fk) = &column.foreign_key {
                defs.push(format!(
                    "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({}){}",
                    self.quote(&format!("fk_{}", column.name)),
                    self.quote(&column.name),
                    self.quote(&fk.table),
                    self.quote(&fk.column),
                    referential_clauses(fk)
                ));
            }
        }

        format!("CREATE TABLE {} ({});", self.quote(&table.name), defs.join(", "))
    }

    fn statement(&self, table: &str, change: &TableChange) -> String {
        let t = self.quote(table);
        match change {
            TableChange::RenameTable { to } => {
                format!("ALTER TABLE {t} RENAME TO {};", self.quote(to))
            }
            TableChange::AddColumns { columns } => {
                let adds: Vec<String> = columns
                    .iter()
                    .map(|c| format!("ADD COLUMN {}", self.column_definition(c)))
                    .collect();
                format!("ALTER TABLE {t} {};", adds.join(", "))
            }
            TableChange::DropColumn { name } => {
                format!("ALTER TABLE {t} DROP COLUMN {};", self.quote(name))
            }
            TableChange::RenameColumn { from, column } => format!(
                "ALTER TABLE {t} RENAME COLUMN {} TO {};",
                self.quote(from),
                self.quote(&column.name)
            ),
            TableChange::SetDataType { column } => format!(
                "ALTER TABLE {t} ALTER COLUMN {} TYPE {};",
                self.quote(&column.name),
                column.data_type.to_sql()
            ),
            TableChange::SetNullable { name, nullable, .. } => format!(
                "ALTER TABLE {t} ALTER COLUMN {} {} NOT NULL;",
                self.quote(name),
                if *nullable { "DROP" } else { "SET" }
            ),
            TableChange::SetPrimaryKey {
                name,
                enabled: true,
            } => format!(
                "ALTER TABLE {t} ADD CONSTRAINT {} PRIMARY KEY ({});",
                self.quote(&format!("pk_{table}")),
                self.quote(name)
            ),
            TableChange::SetPrimaryKey { enabled: false, .. } => format!(
                "ALTER TABLE {t} DROP CONSTRAINT {};",
                self.quote(&format!("pk_{table}"))
            ),
            TableChange::SetUnique {
                name,
                enabled: true,
            } => format!(
                "ALTER TABLE {t} ADD CONSTRAINT {} UNIQUE ({});",
                self.quote(&format!("{table}_unique")),
                self.quote(name)
            ),
            TableChange::SetUnique { enabled: false, .. } => format!(
                "ALTER TABLE {t} DROP CONSTRAINT {};",
                self.quote(&format!("{table}_unique"))
            ),
            TableChange::SetAutoIncrement {
                name,
                enabled: true,
                ..
            } => format!(
                "ALTER TABLE {t} ALTER COLUMN {} ADD GENERATED ALWAYS AS IDENTITY;",
                self.quote(name)
            ),
            TableChange::SetAutoIncrement {
                name,
                enabled: false,
                ..
            } => format!(
                "ALTER TABLE {t} ALTER COLUMN {} DROP IDENTITY IF EXISTS;",
                self.quote(name)
            ),
            TableChange::AddForeignKey { name, reference } => format!(
                "ALTER TABLE {t} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({}){};",
                self.quote(&format!("fk_{name}")),
                self.quote(name),
                self.quote(&reference.table),
                self.quote(&reference.column),
                referential_clauses(reference)
            ),
            TableChange::DropForeignKey { name } => format!(
                "ALTER TABLE {t} DROP CONSTRAINT {};",
                self.quote(&format!("fk_{name}"))
            ),
            TableChange::SetDefault { name, value } => format!(
                "ALTER TABLE {t} ALTER COLUMN {} SET DEFAULT {};",
                self.quote(name),
                value.to_sql()
            ),
            TableChange::DropDefault { name } => format!(
                "ALTER TABLE {t} ALTER COLUMN {} DROP DEFAULT;",
                self.quote(name)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{bigint, integer, timestamp, varchar};
    use crate::diff::{diff_tables, SchemaDiff};
    use crate::dialect::Dialect;

    #[test]
    fn rename_only_diff_emits_exactly_one_statement() {
        let old = TableSpec::new("t1");
        let new = TableSpec::new("t2");
        let sql = diff_tables(&old, &new).statements(Dialect::PostgreSql);
        assert_eq!(sql, vec!["ALTER TABLE \"t1\" RENAME TO \"t2\";"]);
    }

    #[test]
    fn auto_increment_becomes_serial() {
        let col = integer("id").primary_key().auto_increment().build();
        assert_eq!(PostgresDialect.column_definition(&col), "\"id\" SERIAL");

        let col = bigint("id").auto_increment().build();
        assert_eq!(PostgresDialect.column_definition(&col), "\"id\" BIGSERIAL");
    }

    #[test]
    fn non_integer_auto_increment_uses_identity() {
        let col = timestamp("seq").auto_increment().build();
        assert_eq!(
            PostgresDialect.column_definition(&col),
            "\"seq\" TIMESTAMP GENERATED ALWAYS AS IDENTITY"
        );
    }

    #[test]
    fn create_table_names_pk_and_fk_constraints() {
        let table = TableSpec::new("posts")
            .with_column(integer("id").primary_key().auto_increment().build())
            .with_column(integer("user_id").not_null().references("users", "id").build());

        assert_eq!(
            PostgresDialect.create_table(&table),
            "CREATE TABLE \"posts\" (\
             \"id\" SERIAL, \
             \"user_id\" INT NOT NULL, \
             CONSTRAINT \"pk_id\" PRIMARY KEY (\"id\"), \
             CONSTRAINT \"fk_user_id\" FOREIGN KEY (\"user_id\") \
             REFERENCES \"users\"(\"id\"));"
        );
    }

    #[test]
    fn nullability_uses_set_and_drop_not_null() {
        let old = TableSpec::new("t")
            .with_column(varchar("a", 10).source("a").build())
            .with_column(varchar("b", 10).not_null().source("b").build());
        let mut new = old.clone();
        new.columns[0].nullable = false;
        new.columns[1].nullable = true;

        let sql = diff_tables(&old, &new).statements(Dialect::PostgreSql);
        assert_eq!(
            sql,
            vec![
                "ALTER TABLE \"t\" ALTER COLUMN \"a\" SET NOT NULL;",
                "ALTER TABLE \"t\" ALTER COLUMN \"b\" DROP NOT NULL;",
            ]
        );
    }

    #[test]
    fn constraint_names_follow_the_table() {
        let d = PostgresDialect;
        assert_eq!(
            d.statement(
                "accounts",
                &crate::diff::TableChange::SetPrimaryKey {
                    name: "id".into(),
                    enabled: true
                }
            ),
            "ALTER TABLE \"accounts\" ADD CONSTRAINT \"pk_accounts\" PRIMARY KEY (\"id\");"
        );
        assert_eq!(
            d.statement(
                "accounts",
                &crate::diff::TableChange::SetUnique {
                    name: "email".into(),
                    enabled: false
                }
            ),
            "ALTER TABLE \"accounts\" DROP CONSTRAINT \"accounts_unique\";"
        );
    }

    #[test]
    fn identity_alterations() {
        let d = PostgresDialect;
        let change = crate::diff::TableChange::SetAutoIncrement {
            name: "id".into(),
            data_type: crate::types::DataType::Integer,
            enabled: true,
        };
        assert_eq!(
            d.statement("t", &change),
            "ALTER TABLE \"t\" ALTER COLUMN \"id\" ADD GENERATED ALWAYS AS IDENTITY;"
        );
    }

    #[test]
    fn statements_are_complete_and_terminated() {
        let diff = SchemaDiff {
            table: "t".into(),
            changes: vec![crate::diff::TableChange::DropColumn { name: "x".into() }],
        };
        for stmt in diff.statements(Dialect::PostgreSql) {
            assert!(stmt.starts_with("ALTER TABLE"));
            assert!(stmt.ends_with(';'));
        }
    }
}
