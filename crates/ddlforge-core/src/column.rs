//! Column specifications and the fluent builder.

use core::fmt;

use crate::types::DataType;

/// Referential action for `ON DELETE` / `ON UPDATE` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    /// No action.
    NoAction,
    /// Cascade the operation.
    Cascade,
    /// Set the referencing column to NULL.
    SetNull,
    /// Set the referencing column to its default.
    SetDefault,
}

impl ReferentialAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }

    /// Parses the SQL keyword form (`"SET NULL"`, `"cascade"`, ...).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "NO ACTION" => Some(Self::NoAction),
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "SET DEFAULT" => Some(Self::SetDefault),
            _ => None,
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A single-column foreign key reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    /// Referenced table.
    pub table: String,
    /// Referenced column.
    pub column: String,
    /// ON DELETE action, if any.
    pub on_delete: Option<ReferentialAction>,
    /// ON UPDATE action, if any.
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKeyRef {
    /// Creates a reference without referential actions.
    #[must_use]
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            on_delete: None,
            on_update: None,
        }
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Boolean default.
    Boolean(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default (quoted and escaped on render).
    String(String),
    /// Raw SQL expression (e.g. `CURRENT_TIMESTAMP`).
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of the default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Boolean(true) => String::from("TRUE"),
            Self::Boolean(false) => String::from("FALSE"),
            Self::Integer(i) => i.to_string(),
            // {:?} keeps the decimal point on integral values
            Self::Float(f) => format!("{f:?}"),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

/// One column, either observed (reflected from the live database) or
/// desired (captured from a form).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Data type (length/precision included).
    pub data_type: DataType,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Primary key membership.
    pub primary_key: bool,
    /// Unique constraint membership.
    pub unique: bool,
    /// Whether the column auto-increments. Implies NOT NULL.
    pub auto_increment: bool,
    /// Default value, if any.
    pub default: Option<DefaultValue>,
    /// Foreign key reference, if any.
    pub foreign_key: Option<ForeignKeyRef>,
    /// Reflected column name this spec was seeded from.
    ///
    /// This is the stable identity used by the differ: a desired column
    /// whose `source` differs from `name` is a rename, and a desired
    /// column without a matching `source` is an addition. Reflected
    /// columns always carry `source = Some(name)`.
    pub source: Option<String>,
}

impl ColumnSpec {
    /// Creates a nullable column with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            primary_key: false,
            unique: false,
            auto_increment: false,
            default: None,
            foreign_key: None,
            source: None,
        }
    }

    /// The identity the differ matches this column on: `source` when
    /// present, the column's own name otherwise.
    #[must_use]
    pub fn key(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.name)
    }
}

/// Fluent builder for [`ColumnSpec`].
#[derive(Debug, Clone)]
pub struct ColumnBuilder {
    spec: ColumnSpec,
}

impl ColumnBuilder {
    /// Creates a builder with name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            spec: ColumnSpec::new(name, data_type),
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.spec.nullable = false;
        self
    }

    /// Marks the column as PRIMARY KEY (implies NOT NULL).
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.spec.primary_key = true;
        self.spec.nullable = false;
        self
    }

    /// Marks the column UNIQUE.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.spec.unique = true;
        self
    }

    /// Marks the column auto-incrementing (implies NOT NULL).
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.spec.auto_increment = true;
        self.spec.nullable = false;
        self
    }

    /// Sets a default value.
    #[must_use]
    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.spec.default = Some(value);
        self
    }

    /// Sets a raw SQL expression as default.
    #[must_use]
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.spec.default = Some(DefaultValue::Expression(expr.into()));
        self
    }

    /// Sets a foreign key reference.
    #[must_use]
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.spec.foreign_key = Some(ForeignKeyRef::new(table, column));
        self
    }

    /// Sets a foreign key reference with referential actions.
    #[must_use]
    pub fn references_full(
        mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        on_delete: Option<ReferentialAction>,
        on_update: Option<ReferentialAction>,
    ) -> Self {
        self.spec.foreign_key = Some(ForeignKeyRef {
            table: table.into(),
            column: column.into(),
            on_delete,
            on_update,
        });
        self
    }

    /// Records the reflected name this column was seeded from.
    #[must_use]
    pub fn source(mut self, name: impl Into<String>) -> Self {
        self.spec.source = Some(name.into());
        self
    }

    /// Builds the column specification.
    #[must_use]
    pub fn build(self) -> ColumnSpec {
        self.spec
    }
}

// Shorthand constructors for the common types.

/// Creates an INT column builder.
#[must_use]
pub fn integer(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Integer)
}

/// Creates a BIGINT column builder.
#[must_use]
pub fn bigint(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::BigInt)
}

/// Creates a SMALLINT column builder.
#[must_use]
pub fn smallint(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::SmallInt)
}

/// Creates a VARCHAR column builder.
#[must_use]
pub fn varchar(name: impl Into<String>, len: u32) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Varchar(Some(len)))
}

/// Creates a TEXT column builder.
#[must_use]
pub fn text(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Text)
}

/// Creates a DECIMAL column builder.
#[must_use]
pub fn decimal(name: impl Into<String>, precision: u16, scale: u16) -> ColumnBuilder {
    ColumnBuilder::new(
        name,
        DataType::Decimal {
            precision: Some(precision),
            scale: Some(scale),
        },
    )
}

/// Creates a BOOLEAN column builder.
#[must_use]
pub fn boolean(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Boolean)
}

/// Creates a DATE column builder.
#[must_use]
pub fn date(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Date)
}

/// Creates a TIMESTAMP column builder.
#[must_use]
pub fn timestamp(name: impl Into<String>) -> ColumnBuilder {
    ColumnBuilder::new(name, DataType::Timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_column() {
        let col = integer("age").build();
        assert_eq!(col.name, "age");
        assert_eq!(col.data_type, DataType::Integer);
        assert!(col.nullable);
        assert!(!col.primary_key);
        assert_eq!(col.key(), "age");
    }

    #[test]
    fn primary_key_implies_not_null() {
        let col = bigint("id").primary_key().build();
        assert!(col.primary_key);
        assert!(!col.nullable);
    }

    #[test]
    fn auto_increment_implies_not_null() {
        let col = bigint("id").auto_increment().build();
        assert!(col.auto_increment);
        assert!(!col.nullable);
    }

    #[test]
    fn source_drives_identity() {
        let col = varchar("full_name", 255).source("name").build();
        assert_eq!(col.key(), "name");
        assert_eq!(col.name, "full_name");
    }

    #[test]
    fn foreign_key_with_actions() {
        let col = bigint("user_id")
            .not_null()
            .references_full("users", "id", Some(ReferentialAction::Cascade), None)
            .build();
        let fk = col.foreign_key.unwrap();
        assert_eq!(fk.table, "users");
        assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
        assert_eq!(fk.on_update, None);
    }

    #[test]
    fn default_value_rendering() {
        assert_eq!(DefaultValue::Null.to_sql(), "NULL");
        assert_eq!(DefaultValue::Boolean(true).to_sql(), "TRUE");
        assert_eq!(DefaultValue::Integer(42).to_sql(), "42");
        assert_eq!(DefaultValue::Float(2.0).to_sql(), "2.0");
        assert_eq!(DefaultValue::Float(3.25).to_sql(), "3.25");
        assert_eq!(DefaultValue::String("it's".into()).to_sql(), "'it''s'");
        assert_eq!(
            DefaultValue::Expression("CURRENT_TIMESTAMP".into()).to_sql(),
            "CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn referential_action_parse() {
        assert_eq!(
            ReferentialAction::parse("set null"),
            Some(ReferentialAction::SetNull)
        );
        assert_eq!(
            ReferentialAction::parse("NO ACTION"),
            Some(ReferentialAction::NoAction)
        );
        assert_eq!(ReferentialAction::parse("RESTRICT"), None);
    }
}
