//! SQL data type definitions.

use core::fmt;

/// SQL data types shared by the supported dialects.
///
/// Length and precision modifiers are part of the type, so a length
/// change on a column is a type change in the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    // Integer types
    /// Single bit / MySQL BIT.
    Bit,
    /// Tiny integer (1 byte).
    TinyInt,
    /// Small integer (2 bytes).
    SmallInt,
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    BigInt,

    // Floating point
    /// Dialect-default float.
    Float,
    /// Real (4-byte float).
    Real,
    /// Double precision (8-byte float).
    Double,
    /// Decimal with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after the decimal point.
        scale: Option<u16>,
    },
    /// Numeric (alias for Decimal).
    Numeric {
        /// Total number of digits.
        precision: Option<u16>,
        /// Number of digits after the decimal point.
        scale: Option<u16>,
    },

    // String types
    /// Fixed-length character string.
    Char(Option<u32>),
    /// Variable-length character string.
    Varchar(Option<u32>),
    /// Fixed-length national character string (MSSQL).
    NChar(Option<u32>),
    /// Variable-length national character string (MSSQL).
    NVarchar(Option<u32>),
    /// Text (variable length, no limit).
    Text,

    // Binary types
    /// Fixed-length binary.
    Binary(Option<u32>),
    /// Variable-length binary.
    Varbinary(Option<u32>),
    /// Binary large object.
    Blob,

    // Date/time types
    /// Date.
    Date,
    /// Time.
    Time,
    /// Date and time.
    Datetime,
    /// Timestamp.
    Timestamp,

    // Boolean
    /// Boolean.
    Boolean,

    /// Database-specific type kept verbatim.
    Custom(String),
}

impl DataType {
    /// Parses a reflected type string such as `"VARCHAR(255)"` or
    /// `"decimal(10,2)"` into a [`DataType`].
    ///
    /// The base keyword is matched case-insensitively; a parenthesised
    /// modifier is parsed as a length or a `precision,scale` pair.
    /// Unknown keywords become [`DataType::Custom`] with the raw text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (base, inner) = match raw.split_once('(') {
            Some((base, rest)) => (
                base.trim(),
                rest.split(')').next().map(str::trim).filter(|s| !s.is_empty()),
            ),
            None => (raw, None),
        };

        let length = inner.and_then(|s| s.parse::<u32>().ok());
        let (precision, scale) = match inner {
            Some(s) => {
                let mut parts = s.splitn(2, ',');
                let p = parts.next().and_then(|p| p.trim().parse::<u16>().ok());
                let sc = parts.next().and_then(|p| p.trim().parse::<u16>().ok());
                (p, sc)
            }
            None => (None, None),
        };

        match base.to_ascii_uppercase().as_str() {
            "BIT" => Self::Bit,
            "TINYINT" => Self::TinyInt,
            "SMALLINT" => Self::SmallInt,
            "INT" | "INTEGER" => Self::Integer,
            "BIGINT" => Self::BigInt,
            "FLOAT" => Self::Float,
            "REAL" => Self::Real,
            "DOUBLE" | "DOUBLE PRECISION" => Self::Double,
            "DECIMAL" | "DEC" => Self::Decimal { precision, scale },
            "NUMERIC" => Self::Numeric { precision, scale },
            "CHAR" | "CHARACTER" => Self::Char(length),
            "VARCHAR" | "CHARACTER VARYING" => Self::Varchar(length),
            "NCHAR" => Self::NChar(length),
            "NVARCHAR" => Self::NVarchar(length),
            "TEXT" => Self::Text,
            "BINARY" => Self::Binary(length),
            "VARBINARY" => Self::Varbinary(length),
            "BLOB" => Self::Blob,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::Datetime,
            "TIMESTAMP" | "TIMESTAMP WITHOUT TIME ZONE" | "TIMESTAMP WITH TIME ZONE" => {
                Self::Timestamp
            }
            "BOOLEAN" | "BOOL" => Self::Boolean,
            _ => Self::Custom(raw.to_string()),
        }
    }

    /// Returns the dialect-neutral SQL rendering of the type.
    ///
    /// Dialects remap a handful of these (`DOUBLE PRECISION`, `BYTEA`,
    /// `IMAGE`, ...); everything else passes through unchanged.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Bit => String::from("BIT"),
            Self::TinyInt => String::from("TINYINT"),
            Self::SmallInt => String::from("SMALLINT"),
            Self::Integer => String::from("INT"),
            Self::BigInt => String::from("BIGINT"),
            Self::Float => String::from("FLOAT"),
            Self::Real => String::from("REAL"),
            Self::Double => String::from("DOUBLE"),
            Self::Decimal { precision, scale } => with_precision("DECIMAL", *precision, *scale),
            Self::Numeric { precision, scale } => with_precision("NUMERIC", *precision, *scale),
            Self::Char(len) => with_length("CHAR", *len),
            Self::Varchar(len) => with_length("VARCHAR", *len),
            Self::NChar(len) => with_length("NCHAR", *len),
            Self::NVarchar(len) => with_length("NVARCHAR", *len),
            Self::Text => String::from("TEXT"),
            Self::Binary(len) => with_length("BINARY", *len),
            Self::Varbinary(len) => with_length("VARBINARY", *len),
            Self::Blob => String::from("BLOB"),
            Self::Date => String::from("DATE"),
            Self::Time => String::from("TIME"),
            Self::Datetime => String::from("DATETIME"),
            Self::Timestamp => String::from("TIMESTAMP"),
            Self::Boolean => String::from("BOOLEAN"),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Returns `true` for the integer family (candidates for
    /// SERIAL/IDENTITY substitution on auto-increment columns).
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::TinyInt | Self::SmallInt | Self::Integer | Self::BigInt
        )
    }
}

fn with_length(base: &str, len: Option<u32>) -> String {
    match len {
        Some(n) => format!("{base}({n})"),
        None => base.to_string(),
    }
}

fn with_precision(base: &str, precision: Option<u16>, scale: Option<u16>) -> String {
    match (precision, scale) {
        (Some(p), Some(s)) => format!("{base}({p},{s})"),
        (Some(p), None) => format!("{base}({p})"),
        _ => base.to_string(),
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}
