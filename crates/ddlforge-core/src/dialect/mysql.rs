//! MySQL statement builder.

use super::{referential_clauses, DdlDialect};
use crate::column::ColumnSpec;
use crate::diff::TableChange;
use crate::table::TableSpec;

/// MySQL / MariaDB dialect. Backtick-quoted identifiers.
pub struct MySqlDialect;

impl DdlDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn column_definition(&self, column: &ColumnSpec) -> String {
        let mut def = format!("{} {}", self.quote(&column.name), column.data_type.to_sql());
        if !column.nullable {
            def.push_str(" NOT NULL");
        }
        if column.auto_increment {
            def.push_str(" AUTO_INCREMENT");
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

        let pk: Vec<String> = table
            .columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| self.quote(&c.name))
            .collect();
        if !pk.is_empty() {
            defs.push(format!("PRIMARY KEY ({})", pk.join(", ")));
        }

        for column in table.columns.iter().filter(|c| c.unique) {
            defs.push(format!("UNIQUE ({})", self.quote(&column.name)));
        }

        for column in &table.columns {
            if let Some(fk) = &column.foreign_key {
                defs.push(format!(
                    "FOREIGN KEY ({}) REFERENCES {}({}){}",
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
                format!("RENAME TABLE {t} TO {};", self.quote(to))
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
                "ALTER TABLE {t} CHANGE {} {} {};",
                self.quote(from),
                self.quote(&column.name),
                column.data_type.to_sql()
            ),
            TableChange::SetDataType { column } => format!(
                "ALTER TABLE {t} MODIFY {} {};",
                self.quote(&column.name),
                column.data_type.to_sql()
            ),
            TableChange::SetNullable {
                name,
                data_type,
                nullable,
            } => format!(
                "ALTER TABLE {t} MODIFY {} {}{};",
                self.quote(name),
                data_type.to_sql(),
                if *nullable { " NULL" } else { " NOT NULL" }
            ),
            TableChange::SetPrimaryKey {
                name,
                enabled: true,
            } => format!("ALTER TABLE {t} ADD PRIMARY KEY ({});", self.quote(name)),
            TableChange::SetPrimaryKey { enabled: false, .. } => {
                format!("ALTER TABLE {t} DROP PRIMARY KEY;")
            }
            TableChange::SetUnique {
                name,
                enabled: true,
            } => format!("ALTER TABLE {t} ADD UNIQUE ({});", self.quote(name)),
            TableChange::SetUnique {
                name,
                enabled: false,
            } => format!("ALTER TABLE {t} DROP INDEX {};", self.quote(name)),
            TableChange::SetAutoIncrement {
                name,
                data_type,
                enabled,
            } => format!(
                "ALTER TABLE {t} MODIFY {} {}{};",
                self.quote(name),
                data_type.to_sql(),
                if *enabled { " NOT NULL AUTO_INCREMENT" } else { "" }
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
                "ALTER TABLE {t} DROP FOREIGN KEY {};",
                self.quote(&format!("fk_{name}"))
            ),
            TableChange::SetDefault { name, value } => format!(
                "ALTER TABLE {t} ALTER {} SET DEFAULT {};",
                self.quote(name),
                value.to_sql()
            ),
            TableChange::DropDefault { name } => {
                format!("ALTER TABLE {t} ALTER {} DROP DEFAULT;", self.quote(name))
            }
        }
    }
}
