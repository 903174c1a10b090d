//! Microsoft SQL Server statement builder.

use super::{referential_clauses, DdlDialect};
use crate::column::ColumnSpec;
use crate::diff::TableChange;
use crate::table::TableSpec;

/// MSSQL dialect. Bracket-quoted identifiers.
///
/// Constraints are attached inline to the column definition in
/// create-table mode, with PRIMARY KEY preceding NOT NULL. Renames go
/// through `sp_rename`. IDENTITY cannot be added to or removed from an
/// existing column, so that change renders as a `--` comment statement
/// which the executor skips with a warning.
pub struct MssqlDialect;

impl DdlDialect for MssqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn quote(&self, ident: &str) -> String {
        format!("[{}]", ident.replace(']', "]]"))
    }

    fn column_definition(&self, column: &ColumnSpec) -> String {
        let mut def = format!("{} {}", self.quote(&column.name), column.data_type.to_sql());
        if column.primary_key {
            def.push_str(" PRIMARY KEY");
        }
        if !column.nullable {
            def.push_str(" NOT NULL");
        }
        if column.auto_increment {
            def.push_str(" IDENTITY(1,1)");
        }
        if column.unique {
            def.push_str(" UNIQUE");
        }
        if let Some(value) = &column.default {
            def.push_str(" DEFAULT ");
            def.push_str(&value.to_sql());
        }
        if let Some(fk) = &column.foreign_key {
            def.push_str(&format!(
                " FOREIGN KEY REFERENCES {}({}){}",
                self.quote(&fk.table),
                self.quote(&fk.column),
                referential_clauses(fk)
            ));
        }
        def
    }

    fn create_table(&self, table: &TableSpec) -> String {
        let defs: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect();
        format!("CREATE TABLE {} ({});", self.quote(&table.name), defs.join(", "))
    }

    fn statement(&self, table: &str, change: &TableChange) -> String {
        let t = self.quote(table);
        match change {
            TableChange::RenameTable { to } => format!("EXEC sp_rename '{table}','{to}';"),
            // T-SQL takes ADD without the COLUMN keyword, one ADD for
            // the whole list.
            TableChange::AddColumns { columns } => {
                let defs: Vec<String> = columns
                    .iter()
                    .map(|c| self.column_definition(c))
                    .collect();
                format!("ALTER TABLE {t} ADD {};", defs.join(", "))
            }
            TableChange::DropColumn { name } => {
                format!("ALTER TABLE {t} DROP COLUMN {};", self.quote(name))
            }
            TableChange::RenameColumn { from, column } => {
                format!("EXEC sp_rename '{table}.{from}','{}';", column.name)
            }
            TableChange::SetDataType { column } => format!(
                "ALTER TABLE {t} ALTER COLUMN {} {};",
                self.quote(&column.name),
                column.data_type.to_sql()
            ),
            TableChange::SetNullable {
                name,
                data_type,
                nullable,
            } => format!(
                "ALTER TABLE {t} ALTER COLUMN {} {} {};",
                self.quote(name),
                data_type.to_sql(),
                if *nullable { "NULL" } else { "NOT NULL" }
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
            TableChange::SetAutoIncrement { name, .. } => format!(
                "-- IDENTITY on {table}.{name} cannot be altered in place; \
                 rebuild the column to change it"
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
                "ALTER TABLE {t} ADD CONSTRAINT {} DEFAULT {} FOR {};",
                self.quote(&format!("df_{name}")),
                value.to_sql(),
                self.quote(name)
            ),
            TableChange::DropDefault { name } => format!(
                "ALTER TABLE {t} DROP CONSTRAINT {};",
                self.quote(&format!("df_{name}"))
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{integer, varchar, DefaultValue};
    use crate::diff::diff_tables;
    use crate::dialect::Dialect;
    use crate::types::DataType;

    #[test]
    fn plain_column_definition() {
        let col = integer("age").not_null().build();
        assert_eq!(MssqlDialect.column_definition(&col), "[age] INT NOT NULL");
    }

    #[test]
    fn primary_key_precedes_not_null() {
        let col = integer("age").primary_key().build();
        assert_eq!(
            MssqlDialect.column_definition(&col),
            "[age] INT PRIMARY KEY NOT NULL"
        );
    }

    #[test]
    fn inline_constraints_in_create_table() {
        let table = TableSpec::new("users")
            .with_column(integer("id").primary_key().auto_increment().build())
            .with_column(varchar("email", 128).not_null().unique().build())
            .with_column(integer("group_id").references("groups", "id").build());

        assert_eq!(
            MssqlDialect.create_table(&table),
            "CREATE TABLE [users] (\
             [id] INT PRIMARY KEY NOT NULL IDENTITY(1,1), \
             [email] VARCHAR(128) NOT NULL UNIQUE, \
             [group_id] INT FOREIGN KEY REFERENCES [groups]([id]));"
        );
    }

    #[test]
    fn renames_go_through_sp_rename() {
        let old = TableSpec::new("t1")
            .with_column(varchar("old_name", 32).source("old_name").build());
        let mut new = old.clone();
        new.name = "t2".into();
        new.columns[0].name = "new_name".into();

        let sql = diff_tables(&old, &new).statements(Dialect::Mssql);
        assert_eq!(
            sql,
            vec![
                "EXEC sp_rename 't1','t2';",
                // Column rename references the renamed table.
                "EXEC sp_rename 't2.old_name','new_name';",
            ]
        );
    }

    #[test]
    fn add_takes_bare_definitions() {
        let old = TableSpec::new("t").with_column(integer("id").source("id").build());
        let new = old
            .clone()
            .with_column(varchar("a", 10).build())
            .with_column(integer("b").not_null().build());

        let sql = diff_tables(&old, &new).statements(Dialect::Mssql);
        assert_eq!(
            sql,
            vec!["ALTER TABLE [t] ADD [a] VARCHAR(10), [b] INT NOT NULL;"]
        );
    }

    #[test]
    fn alter_column_carries_the_type() {
        let d = MssqlDialect;
        assert_eq!(
            d.statement(
                "t",
                &TableChange::SetNullable {
                    name: "age".into(),
                    data_type: DataType::Integer,
                    nullable: false
                }
            ),
            "ALTER TABLE [t] ALTER COLUMN [age] INT NOT NULL;"
        );
    }

    #[test]
    fn identity_change_is_a_skippable_comment() {
        let d = MssqlDialect;
        let stmt = d.statement(
            "t",
            &TableChange::SetAutoIncrement {
                name: "id".into(),
                data_type: DataType::Integer,
                enabled: true,
            },
        );
        assert!(stmt.starts_with("--"));
    }

    #[test]
    fn defaults_use_named_df_constraints() {
        let d = MssqlDialect;
        assert_eq!(
            d.statement(
                "t",
                &TableChange::SetDefault {
                    name: "status".into(),
                    value: DefaultValue::String("new".into())
                }
            ),
            "ALTER TABLE [t] ADD CONSTRAINT [df_status] DEFAULT 'new' FOR [status];"
        );
        assert_eq!(
            d.statement(
                "t",
                &TableChange::DropDefault {
                    name: "status".into()
                }
            ),
            "ALTER TABLE [t] DROP CONSTRAINT [df_status];"
        );
    }
}
