//! Schema diffing and dialect-aware DDL generation.
//!
//! `ddlforge-core` compares a reflected table layout against a desired
//! one and renders the difference as DDL for MySQL, PostgreSQL or
//! Microsoft SQL Server. The crate is pure: nothing here touches a
//! database, and the same inputs always produce the same statements.
//!
//! ```
//! use ddlforge_core::{diff_tables, Dialect, TableSpec};
//! use ddlforge_core::column::{integer, varchar};
//!
//! let old = TableSpec::new("users")
//!     .with_column(integer("id").primary_key().source("id").build())
//!     .with_column(varchar("name", 64).source("name").build());
//! let new = old.clone().with_column(varchar("email", 128).not_null().build());
//!
//! let sql = diff_tables(&old, &new).statements(Dialect::PostgreSql);
//! assert_eq!(
//!     sql,
//!     vec!["ALTER TABLE \"users\" ADD COLUMN \"email\" VARCHAR(128) NOT NULL;"]
//! );
//! ```

pub mod column;
pub mod dialect;
pub mod diff;
pub mod table;
pub mod types;

pub use column::{ColumnBuilder, ColumnSpec, DefaultValue, ForeignKeyRef, ReferentialAction};
pub use dialect::{DdlDialect, Dialect, MssqlDialect, MySqlDialect, PostgresDialect};
pub use diff::{diff_tables, SchemaDiff, TableChange};
pub use table::TableSpec;
pub use types::DataType;
