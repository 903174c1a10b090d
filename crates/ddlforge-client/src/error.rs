//! Error types for the client.

/// Errors surfaced by the client crate.
///
/// Connection, reflection and execution failures are distinct kinds so
/// callers can tell a network problem from a bad statement.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Could not reach or authenticate against the server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Schema reflection failed (table metadata unavailable).
    #[error("Schema reflection failed: {0}")]
    Reflection(String),

    /// A statement was rejected by the server.
    #[error("Statement failed: {sql}: {message}")]
    Execution {
        /// The statement that failed.
        sql: String,
        /// Server error message.
        message: String,
    },

    /// No registry entry under that name.
    #[error("No registered database named '{0}'")]
    UnknownDatabase(String),

    /// A table form could not be converted to a specification.
    #[error("Invalid table description: {0}")]
    Form(String),

    /// Unknown dialect name.
    #[error(transparent)]
    Dialect(#[from] ddlforge_core::dialect::UnknownDialect),

    /// Registry file IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registry or form JSON error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, DbError>;
