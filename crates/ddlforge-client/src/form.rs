//! Desired-schema forms.
//!
//! [`TableForm`] is the JSON shape the CLI round-trips: `snapshot`
//! writes one from a reflected table, the user edits it, and `plan` /
//! `apply` / `create-table` read it back. Fields mirror what a dialog
//! would capture: string-typed data type and length, checkbox flags,
//! and a `"table column"` foreign-key reference.

use ddlforge_core::column::{ColumnSpec, DefaultValue, ForeignKeyRef, ReferentialAction};
use ddlforge_core::{DataType, TableSpec};
use serde::{Deserialize, Serialize};

use crate::error::{DbError, Result};

/// One table as captured from (or presented to) the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableForm {
    /// Desired table name.
    pub table_name: String,
    /// Reflected table name this form was seeded from. Differing from
    /// `table_name` means a rename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_table: Option<String>,
    /// Columns in desired order.
    pub columns: Vec<ColumnForm>,
}

/// One column as captured from the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnForm {
    /// Desired column name.
    pub name: String,
    /// Reflected column name this entry was seeded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Base type keyword, e.g. `"VARCHAR"`.
    pub data_type: String,
    /// Length or `"precision,scale"` modifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    /// NULL allowed.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Primary key membership.
    #[serde(default)]
    pub primary_key: bool,
    /// Unique constraint.
    #[serde(default)]
    pub unique: bool,
    /// Auto-increment / identity.
    #[serde(default)]
    pub auto_increment: bool,
    /// Foreign key as `"table column"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    /// ON DELETE action keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
    /// ON UPDATE action keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
    /// Default value as typed by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

const fn default_nullable() -> bool {
    true
}

impl TableForm {
    /// The table to reflect when planning against this form.
    #[must_use]
    pub fn reflected_table(&self) -> &str {
        self.source_table.as_deref().unwrap_or(&self.table_name)
    }

    /// Converts the form into a core table specification.
    pub fn to_spec(&self) -> Result<TableSpec> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            columns.push(column.to_spec()?);
        }
        Ok(TableSpec {
            name: self.table_name.clone(),
            columns,
        })
    }

    /// Builds a form from a reflected table, pre-filling `source` and
    /// `source_table` so later diffs are keyed on the reflected names.
    #[must_use]
    pub fn from_spec(spec: &TableSpec) -> Self {
        Self {
            table_name: spec.name.clone(),
            source_table: Some(spec.name.clone()),
            columns: spec.columns.iter().map(ColumnForm::from_spec).collect(),
        }
    }
}

impl ColumnForm {
    /// Converts the form entry into a core column specification.
    pub fn to_spec(&self) -> Result<ColumnSpec> {
        let type_text = match &self.length {
            Some(len) => format!("{}({len})", self.data_type),
            None => self.data_type.clone(),
        };

        let foreign_key = match &self.foreign_key {
            Some(raw) => Some(self.parse_foreign_key(raw)?),
            None => None,
        };

        Ok(ColumnSpec {
            name: self.name.clone(),
            data_type: DataType::parse(&type_text),
            nullable: self.nullable && !self.auto_increment && !self.primary_key,
            primary_key: self.primary_key,
            unique: self.unique,
            auto_increment: self.auto_increment,
            default: self.default.as_deref().map(parse_default),
            foreign_key,
            source: self.source.clone(),
        })
    }

    fn parse_foreign_key(&self, raw: &str) -> Result<ForeignKeyRef> {
        let (table, column) = raw.trim().split_once(' ').ok_or_else(|| {
            DbError::Form(format!(
                "column '{}': foreign key '{raw}' must be 'table column'",
                self.name
            ))
        })?;
        Ok(ForeignKeyRef {
            table: table.to_string(),
            column: column.trim().to_string(),
            on_delete: self.parse_action(self.on_delete.as_deref())?,
            on_update: self.parse_action(self.on_update.as_deref())?,
        })
    }

    fn parse_action(&self, raw: Option<&str>) -> Result<Option<ReferentialAction>> {
        match raw {
            None => Ok(None),
            Some(text) => ReferentialAction::parse(text).map(Some).ok_or_else(|| {
                DbError::Form(format!(
                    "column '{}': unknown referential action '{text}'",
                    self.name
                ))
            }),
        }
    }

    /// Builds a form entry from a reflected column.
    #[must_use]
    pub fn from_spec(spec: &ColumnSpec) -> Self {
        let rendered = spec.data_type.to_sql();
        let (data_type, length) = match rendered.split_once('(') {
            Some((base, rest)) => (
                base.to_string(),
                Some(rest.trim_end_matches(')').to_string()),
            ),
            None => (rendered, None),
        };

        Self {
            name: spec.name.clone(),
            source: spec.source.clone(),
            data_type,
            length,
            nullable: spec.nullable,
            primary_key: spec.primary_key,
            unique: spec.unique,
            auto_increment: spec.auto_increment,
            foreign_key: spec
                .foreign_key
                .as_ref()
                .map(|fk| format!("{} {}", fk.table, fk.column)),
            on_delete: spec
                .foreign_key
                .as_ref()
                .and_then(|fk| fk.on_delete)
                .map(|a| a.as_sql().to_string()),
            on_update: spec
                .foreign_key
                .as_ref()
                .and_then(|fk| fk.on_update)
                .map(|a| a.as_sql().to_string()),
            default: spec.default.as_ref().map(render_default),
        }
    }
}

/// Interprets a user-typed default value.
///
/// `NULL`, booleans and numbers get their typed forms; anything with a
/// call shape or an all-caps keyword (`CURRENT_TIMESTAMP`) is kept as a
/// raw expression; everything else is a string literal.
#[must_use]
pub fn parse_default(raw: &str) -> DefaultValue {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("null") {
        return DefaultValue::Null;
    }
    if raw.eq_ignore_ascii_case("true") {
        return DefaultValue::Boolean(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return DefaultValue::Boolean(false);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return DefaultValue::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return DefaultValue::Float(f);
    }
    let stripped = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''));
    if let Some(inner) = stripped {
        return DefaultValue::String(inner.to_string());
    }
    let looks_like_expression = raw.contains('(')
        || (raw.len() > 1
            && raw
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
    if looks_like_expression {
        DefaultValue::Expression(raw.to_string())
    } else {
        DefaultValue::String(raw.to_string())
    }
}

fn render_default(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Null => String::from("NULL"),
        DefaultValue::Boolean(b) => b.to_string(),
        DefaultValue::Integer(i) => i.to_string(),
        // Keeps the decimal point on integral values so the text
        // re-parses as a float, not an integer.
        DefaultValue::Float(f) => format!("{f:?}"),
        DefaultValue::String(s) | DefaultValue::Expression(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddlforge_core::column::{integer, varchar};

    fn form_column(name: &str, data_type: &str) -> ColumnForm {
        ColumnForm {
            name: name.to_string(),
            source: None,
            data_type: data_type.to_string(),
            length: None,
            nullable: true,
            primary_key: false,
            unique: false,
            auto_increment: false,
            foreign_key: None,
            on_delete: None,
            on_update: None,
            default: None,
        }
    }

    #[test]
    fn length_folds_into_the_type() {
        let mut col = form_column("name", "VARCHAR");
        col.length = Some("255".to_string());
        let spec = col.to_spec().unwrap();
        assert_eq!(spec.data_type, DataType::Varchar(Some(255)));
    }

    #[test]
    fn foreign_key_string_splits_on_space() {
        let mut col = form_column("user_id", "INT");
        col.foreign_key = Some("users id".to_string());
        col.on_delete = Some("CASCADE".to_string());
        let spec = col.to_spec().unwrap();
        let fk = spec.foreign_key.unwrap();
        assert_eq!(fk.table, "users");
        assert_eq!(fk.column, "id");
        assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
    }

    #[test]
    fn malformed_foreign_key_is_a_form_error() {
        let mut col = form_column("user_id", "INT");
        col.foreign_key = Some("users.id".to_string());
        assert!(matches!(col.to_spec(), Err(DbError::Form(_))));
    }

    #[test]
    fn flags_imply_not_null() {
        let mut col = form_column("id", "BIGINT");
        col.auto_increment = true;
        assert!(!col.to_spec().unwrap().nullable);

        let mut col = form_column("id", "BIGINT");
        col.primary_key = true;
        assert!(!col.to_spec().unwrap().nullable);
    }

    #[test]
    fn default_interpretation() {
        assert_eq!(parse_default("42"), DefaultValue::Integer(42));
        assert_eq!(parse_default("NULL"), DefaultValue::Null);
        assert_eq!(parse_default("true"), DefaultValue::Boolean(true));
        assert_eq!(
            parse_default("CURRENT_TIMESTAMP"),
            DefaultValue::Expression("CURRENT_TIMESTAMP".into())
        );
        assert_eq!(
            parse_default("GETDATE()"),
            DefaultValue::Expression("GETDATE()".into())
        );
        assert_eq!(
            parse_default("pending"),
            DefaultValue::String("pending".into())
        );
        assert_eq!(
            parse_default("'quoted'"),
            DefaultValue::String("quoted".into())
        );
    }

    #[test]
    fn integral_float_default_survives_the_roundtrip() {
        use ddlforge_core::diff_tables;

        let spec = TableSpec::new("t").with_column(
            ddlforge_core::column::decimal("price", 10, 2)
                .default_value(DefaultValue::Float(2.0))
                .source("price")
                .build(),
        );

        let form = TableForm::from_spec(&spec);
        assert_eq!(form.columns[0].default.as_deref(), Some("2.0"));

        let back = form.to_spec().unwrap();
        assert_eq!(back.columns[0].default, Some(DefaultValue::Float(2.0)));
        assert!(diff_tables(&spec, &back).is_empty());
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let spec = TableSpec::new("users")
            .with_column(integer("id").primary_key().auto_increment().source("id").build())
            .with_column(varchar("name", 255).not_null().source("name").build());

        let form = TableForm::from_spec(&spec);
        assert_eq!(form.source_table.as_deref(), Some("users"));
        assert_eq!(form.columns[1].length.as_deref(), Some("255"));

        let json = serde_json::to_string(&form).unwrap();
        let back: TableForm = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_spec().unwrap(), spec);
    }

    #[test]
    fn reflected_table_falls_back_to_the_desired_name() {
        let form = TableForm {
            table_name: "t2".to_string(),
            source_table: None,
            columns: Vec::new(),
        };
        assert_eq!(form.reflected_table(), "t2");
    }
}
