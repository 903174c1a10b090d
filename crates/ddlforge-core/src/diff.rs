//! Schema differ.
//!
//! Compares a freshly reflected table against a desired table and
//! produces an ordered list of typed changes. Columns are matched by
//! stable identity (the reflected name recorded in
//! [`ColumnSpec::source`](crate::column::ColumnSpec::source), falling
//! back to the column's own name), so insertions and removals anywhere
//! in the column list are attributed correctly and a changed name is a
//! rename rather than a drop-and-add.
//!
//! The differ is pure: the same pair of tables always produces the same
//! (possibly empty) diff.

use std::collections::{BTreeMap, BTreeSet};

use crate::column::{ColumnSpec, DefaultValue, ForeignKeyRef};
use crate::dialect::Dialect;
use crate::table::TableSpec;
use crate::types::DataType;

/// One typed change to a table.
///
/// Variants carry the column's data type where a dialect needs it to
/// render the statement (MySQL `CHANGE`/`MODIFY`, MSSQL `ALTER COLUMN`).
#[derive(Debug, Clone, PartialEq)]
pub enum TableChange {
    /// Rename the table. Always first in a diff; later changes
    /// reference the new name.
    RenameTable {
        /// New table name.
        to: String,
    },
    /// Add one or more columns, emitted as a single statement.
    AddColumns {
        /// Columns to add, in desired order.
        columns: Vec<ColumnSpec>,
    },
    /// Drop a column.
    DropColumn {
        /// Column to drop.
        name: String,
    },
    /// Rename a column. `column` is the full desired spec (its data
    /// type is needed by MySQL's `CHANGE`).
    RenameColumn {
        /// Current column name.
        from: String,
        /// Desired column.
        column: ColumnSpec,
    },
    /// Change a column's data type (length changes included).
    SetDataType {
        /// Desired column.
        column: ColumnSpec,
    },
    /// Toggle nullability.
    SetNullable {
        /// Column name.
        name: String,
        /// Column data type.
        data_type: DataType,
        /// New nullability.
        nullable: bool,
    },
    /// Add or drop primary key membership.
    SetPrimaryKey {
        /// Column name.
        name: String,
        /// `true` adds the key, `false` drops it.
        enabled: bool,
    },
    /// Add or drop a unique constraint.
    SetUnique {
        /// Column name.
        name: String,
        /// `true` adds the constraint, `false` drops it.
        enabled: bool,
    },
    /// Enable or disable auto-increment.
    SetAutoIncrement {
        /// Column name.
        name: String,
        /// Column data type.
        data_type: DataType,
        /// `true` enables, `false` disables.
        enabled: bool,
    },
    /// Add a foreign key constraint.
    AddForeignKey {
        /// Referencing column.
        name: String,
        /// Referenced table and column plus actions.
        reference: ForeignKeyRef,
    },
    /// Drop the foreign key constraint on a column.
    DropForeignKey {
        /// Referencing column.
        name: String,
    },
    /// Set or replace a column default.
    SetDefault {
        /// Column name.
        name: String,
        /// New default.
        value: DefaultValue,
    },
    /// Drop a column default.
    DropDefault {
        /// Column name.
        name: String,
    },
}

/// Ordered set of changes turning one table into another.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDiff {
    /// Table name before any rename.
    pub table: String,
    /// Changes in emission order.
    pub changes: Vec<TableChange>,
}

impl SchemaDiff {
    /// Returns `true` when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Renders the diff as executable statements for a dialect.
    #[must_use]
    pub fn statements(&self, dialect: Dialect) -> Vec<String> {
        dialect.builder().statements(self)
    }
}

/// Computes the changes turning `old` into `new`.
///
/// Change order: table rename, then per-column changes in old column
/// order (a column's rename before its other changes), then grouped
/// additions, then drops.
#[must_use]
pub fn diff_tables(old: &TableSpec, new: &TableSpec) -> SchemaDiff {
    let mut changes = Vec::new();

    if new.name != old.name {
        changes.push(TableChange::RenameTable {
            to: new.name.clone(),
        });
    }

    let old_names: BTreeSet<&str> = old.columns.iter().map(|c| c.name.as_str()).collect();
    let desired: BTreeMap<&str, &ColumnSpec> =
        new.columns.iter().map(|c| (c.key(), c)).collect();

    for old_col in &old.columns {
        if let Some(new_col) = desired.get(old_col.name.as_str()).copied() {
            diff_column(old_col, new_col, &mut changes);
        }
    }

    let added: Vec<ColumnSpec> = new
        .columns
        .iter()
        .filter(|c| !old_names.contains(c.key()))
        .cloned()
        .collect();
    if !added.is_empty() {
        changes.push(TableChange::AddColumns { columns: added });
    }

    for old_col in &old.columns {
        if !desired.contains_key(old_col.name.as_str()) {
            changes.push(TableChange::DropColumn {
                name: old_col.name.clone(),
            });
        }
    }

    SchemaDiff {
        table: old.name.clone(),
        changes,
    }
}

/// Compares one matched pair of columns.
///
/// Every attribute is compared two-sidedly: clearing a previously set
/// flag emits the corresponding DROP-equivalent change. The one
/// exception is nullability on an auto-incrementing column, which is
/// implied NOT NULL and not emitted separately.
fn diff_column(old: &ColumnSpec, new: &ColumnSpec, changes: &mut Vec<TableChange>) {
    if new.name != old.name {
        changes.push(TableChange::RenameColumn {
            from: old.name.clone(),
            column: new.clone(),
        });
    }

    if new.data_type != old.data_type {
        changes.push(TableChange::SetDataType {
            column: new.clone(),
        });
    }

    if new.nullable != old.nullable && !new.auto_increment {
        changes.push(TableChange::SetNullable {
            name: new.name.clone(),
            data_type: new.data_type.clone(),
            nullable: new.nullable,
        });
    }

    if new.primary_key != old.primary_key {
        changes.push(TableChange::SetPrimaryKey {
            name: new.name.clone(),
            enabled: new.primary_key,
        });
    }

    if new.unique != old.unique {
        changes.push(TableChange::SetUnique {
            name: new.name.clone(),
            enabled: new.unique,
        });
    }

    if new.auto_increment != old.auto_increment {
        changes.push(TableChange::SetAutoIncrement {
            name: new.name.clone(),
            data_type: new.data_type.clone(),
            enabled: new.auto_increment,
        });
    }

    match (&old.foreign_key, &new.foreign_key) {
        (None, Some(fk)) => changes.push(TableChange::AddForeignKey {
            name: new.name.clone(),
            reference: fk.clone(),
        }),
        (Some(_), None) => changes.push(TableChange::DropForeignKey {
            name: new.name.clone(),
        }),
        (Some(old_fk), Some(new_fk)) if old_fk != new_fk => {
            changes.push(TableChange::DropForeignKey {
                name: new.name.clone(),
            });
            changes.push(TableChange::AddForeignKey {
                name: new.name.clone(),
                reference: new_fk.clone(),
            });
        }
        _ => {}
    }

    match (&old.default, &new.default) {
        (None, Some(value)) => changes.push(TableChange::SetDefault {
            name: new.name.clone(),
            value: value.clone(),
        }),
        (Some(_), None) => changes.push(TableChange::DropDefault {
            name: new.name.clone(),
        }),
        (Some(old_v), Some(new_v)) if old_v != new_v => {
            changes.push(TableChange::SetDefault {
                name: new.name.clone(),
                value: new_v.clone(),
            });
        }
        _ => {}
    }
}
