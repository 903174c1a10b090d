//! Client side of ddlforge.
//!
//! Everything impure lives here: the flat-file connection registry,
//! live connections with schema reflection, the DDL runner, and the
//! JSON table forms the CLI round-trips. Pure diffing and statement
//! generation stay in `ddlforge-core`.
//!
//! The flow mirrors an alter-table dialog: reflect a table into a
//! [`form::TableForm`], let the user edit it, convert it back to a
//! [`ddlforge_core::TableSpec`], diff against a fresh reflection, and
//! hand the statements to the [`executor::DdlRunner`].

pub mod connection;
pub mod error;
pub mod executor;
pub mod form;
pub mod registry;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::connection::Connection;
    pub use crate::error::{DbError, Result};
    pub use crate::executor::{DdlRunner, Execute};
    pub use crate::form::{ColumnForm, TableForm};
    pub use crate::registry::{ConnectionEntry, Registry};
    pub use ddlforge_core::{diff_tables, Dialect, SchemaDiff, TableSpec};
}
