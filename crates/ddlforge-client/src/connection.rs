//! Live connections: connect, reflect, execute.
//!
//! One [`Connection`] wraps whichever driver the dialect needs — sqlx
//! pools for MySQL and PostgreSQL, a tiberius client for MSSQL — and
//! exposes the three operations the rest of the crate uses: list
//! tables, reflect one table into a [`TableSpec`], and run a statement.

use ddlforge_core::column::{ColumnSpec, DefaultValue, ForeignKeyRef, ReferentialAction};
use ddlforge_core::{DataType, Dialect, TableSpec};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::{MySqlPool, PgPool, Row};
use tiberius::{AuthMethod, Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use crate::error::{DbError, Result};
use crate::form::parse_default;
use crate::registry::ConnectionEntry;

type MssqlClient = Client<Compat<TcpStream>>;

/// An open connection to one registered database.
pub struct Connection {
    backend: Backend,
    dialect: Dialect,
    database: String,
}

enum Backend {
    MySql(MySqlPool),
    Postgres(PgPool),
    Mssql(Box<MssqlClient>),
}

/// Builds the sqlx connection URL for a registry entry. `database` is
/// omitted for server-level connections (creating or dropping the
/// database itself).
pub(crate) fn server_url(entry: &ConnectionEntry, database: Option<&str>) -> String {
    let scheme = match entry.dialect {
        Dialect::MySql => "mysql",
        Dialect::PostgreSql => "postgres",
        Dialect::Mssql => "mssql",
    };
    let base = format!(
        "{scheme}://{}:{}@{}:{}",
        entry.user, entry.password, entry.host, entry.port
    );
    match database {
        Some(db) => format!("{base}/{db}"),
        None => base,
    }
}

fn connect_err<E: std::fmt::Display>(e: E) -> DbError {
    DbError::Connection(e.to_string())
}

fn reflect_err<E: std::fmt::Display>(e: E) -> DbError {
    DbError::Reflection(e.to_string())
}

async fn open(entry: &ConnectionEntry, database: Option<&str>) -> Result<Backend> {
    let backend = match entry.dialect {
        Dialect::MySql => {
            let pool = MySqlPoolOptions::new()
                .max_connections(5)
                .connect(&server_url(entry, database))
                .await
                .map_err(connect_err)?;
            Backend::MySql(pool)
        }
        Dialect::PostgreSql => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&server_url(entry, database))
                .await
                .map_err(connect_err)?;
            Backend::Postgres(pool)
        }
        Dialect::Mssql => {
            let mut config = Config::new();
            config.host(&entry.host);
            config.port(entry.port);
            if let Some(db) = database {
                config.database(db);
            }
            config.authentication(AuthMethod::sql_server(&entry.user, &entry.password));
            config.trust_cert();

            let tcp = TcpStream::connect(config.get_addr())
                .await
                .map_err(connect_err)?;
            tcp.set_nodelay(true).map_err(connect_err)?;
            let client = Client::connect(config, tcp.compat_write())
                .await
                .map_err(connect_err)?;
            Backend::Mssql(Box::new(client))
        }
    };
    Ok(backend)
}

/// CREATE DATABASE statement for a dialect.
pub(crate) fn create_database_sql(dialect: Dialect, name: &str) -> String {
    format!("CREATE DATABASE {};", dialect.builder().quote(name))
}

/// DROP DATABASE statement for a dialect.
pub(crate) fn drop_database_sql(dialect: Dialect, name: &str) -> String {
    format!("DROP DATABASE IF EXISTS {};", dialect.builder().quote(name))
}

/// DROP TABLE statement for a dialect.
pub(crate) fn drop_table_sql(dialect: Dialect, table: &str) -> String {
    format!("DROP TABLE {};", dialect.builder().quote(table))
}

impl Connection {
    /// Connects to the database described by a registry entry.
    pub async fn connect(entry: &ConnectionEntry) -> Result<Self> {
        debug!(dialect = %entry.dialect, host = %entry.host, db = %entry.name, "Connecting");
        Ok(Self {
            backend: open(entry, Some(&entry.name)).await?,
            dialect: entry.dialect,
            database: entry.name.clone(),
        })
    }

    /// Connects at the server level, without selecting the entry's
    /// database. Used to create or drop the database itself. MySQL
    /// accepts a bare connection; PostgreSQL and MSSQL need their
    /// maintenance databases.
    pub async fn connect_server(entry: &ConnectionEntry) -> Result<Self> {
        debug!(dialect = %entry.dialect, host = %entry.host, "Connecting (server level)");
        let database = match entry.dialect {
            Dialect::MySql => None,
            Dialect::PostgreSql => Some("postgres"),
            Dialect::Mssql => Some("master"),
        };
        Ok(Self {
            backend: open(entry, database).await?,
            dialect: entry.dialect,
            database: entry.name.clone(),
        })
    }

    /// Creates the database named by the entry. Needs a server-level
    /// connection from [`Self::connect_server`].
    pub async fn create_database(&mut self) -> Result<()> {
        let sql = create_database_sql(self.dialect, &self.database);
        self.execute(&sql).await
    }

    /// Drops the database named by the entry if it exists. Needs a
    /// server-level connection from [`Self::connect_server`].
    pub async fn drop_database(&mut self) -> Result<()> {
        let sql = drop_database_sql(self.dialect, &self.database);
        self.execute(&sql).await
    }

    /// Drops one table of the connected database.
    pub async fn drop_table(&mut self, table: &str) -> Result<()> {
        let sql = drop_table_sql(self.dialect, table);
        self.execute(&sql).await
    }

    /// The dialect this connection speaks.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Lists the tables of the connected database.
    pub async fn tables(&mut self) -> Result<Vec<String>> {
        match &mut self.backend {
            Backend::MySql(pool) => {
                let rows = sqlx::query(
                    "SELECT table_name FROM information_schema.tables \
                     WHERE table_schema = ? ORDER BY table_name",
                )
                .bind(&self.database)
                .fetch_all(&*pool)
                .await
                .map_err(reflect_err)?;
                rows.iter()
                    .map(|r| r.try_get::<String, _>(0).map_err(reflect_err))
                    .collect()
            }
            Backend::Postgres(pool) => {
                let rows = sqlx::query(
                    "SELECT table_name FROM information_schema.tables \
                     WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
                     ORDER BY table_name",
                )
                .fetch_all(&*pool)
                .await
                .map_err(reflect_err)?;
                rows.iter()
                    .map(|r| r.try_get::<String, _>(0).map_err(reflect_err))
                    .collect()
            }
            Backend::Mssql(client) => {
                let rows = client
                    .query(
                        "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES \
                         WHERE TABLE_TYPE = 'BASE TABLE' ORDER BY TABLE_NAME",
                        &[],
                    )
                    .await
                    .map_err(reflect_err)?
                    .into_first_result()
                    .await
                    .map_err(reflect_err)?;
                Ok(rows
                    .iter()
                    .filter_map(|r| r.get::<&str, _>(0).map(str::to_string))
                    .collect())
            }
        }
    }

    /// Reflects one table into a [`TableSpec`].
    ///
    /// Columns come back in ordinal order with `source` set to the
    /// reflected name, so a form seeded from this spec diffs by stable
    /// identity.
    pub async fn table_spec(&mut self, table: &str) -> Result<TableSpec> {
        let (columns, keys, fks) = match &mut self.backend {
            Backend::MySql(pool) => reflect_mysql(pool, &self.database, table).await?,
            Backend::Postgres(pool) => reflect_postgres(pool, table).await?,
            Backend::Mssql(client) => reflect_mssql(client, table).await?,
        };
        if columns.is_empty() {
            return Err(DbError::Reflection(format!(
                "table '{table}' has no columns or does not exist"
            )));
        }
        Ok(assemble(table, columns, &keys, &fks))
    }

    /// Executes one statement.
    pub async fn execute(&mut self, sql: &str) -> Result<()> {
        let fail = |e: &dyn std::fmt::Display| DbError::Execution {
            sql: sql.to_string(),
            message: e.to_string(),
        };
        match &mut self.backend {
            Backend::MySql(pool) => sqlx::query(sql)
                .execute(&*pool)
                .await
                .map(|_| ())
                .map_err(|e| fail(&e)),
            Backend::Postgres(pool) => sqlx::query(sql)
                .execute(&*pool)
                .await
                .map(|_| ())
                .map_err(|e| fail(&e)),
            Backend::Mssql(client) => client
                .execute(sql, &[])
                .await
                .map(|_| ())
                .map_err(|e| fail(&e)),
        }
    }
}

/// One reflected column before constraints are merged in.
struct RawColumn {
    name: String,
    type_text: String,
    nullable: bool,
    default: Option<String>,
    auto_increment: bool,
}

/// Primary-key or unique membership, per column name.
enum KeyKind {
    Primary,
    Unique,
}

/// Referencing column, referenced table, referenced column, rules.
struct RawForeignKey {
    column: String,
    table: String,
    references: String,
    on_delete: Option<String>,
    on_update: Option<String>,
}

fn assemble(
    table: &str,
    columns: Vec<RawColumn>,
    keys: &[(String, KeyKind)],
    fks: &[RawForeignKey],
) -> TableSpec {
    let spec_columns = columns
        .into_iter()
        .map(|raw| {
            let primary_key = keys
                .iter()
                .any(|(name, kind)| *name == raw.name && matches!(kind, KeyKind::Primary));
            let unique = keys
                .iter()
                .any(|(name, kind)| *name == raw.name && matches!(kind, KeyKind::Unique));
            let foreign_key = fks.iter().find(|fk| fk.column == raw.name).map(|fk| {
                ForeignKeyRef {
                    table: fk.table.clone(),
                    column: fk.references.clone(),
                    on_delete: fk.on_delete.as_deref().and_then(ReferentialAction::parse),
                    on_update: fk.on_update.as_deref().and_then(ReferentialAction::parse),
                }
            });
            ColumnSpec {
                source: Some(raw.name.clone()),
                name: raw.name,
                data_type: DataType::parse(&raw.type_text),
                nullable: raw.nullable && !raw.auto_increment && !primary_key,
                primary_key,
                unique,
                auto_increment: raw.auto_increment,
                default: raw.default.as_deref().and_then(normalize_default),
                foreign_key,
            }
        })
        .collect();
    TableSpec {
        name: table.to_string(),
        columns: spec_columns,
    }
}

/// Normalizes a reflected default expression before interpretation.
///
/// Strips PostgreSQL `::type` casts and MSSQL constraint parentheses,
/// and drops sequence defaults (those surface as auto-increment).
fn normalize_default(raw: &str) -> Option<DefaultValue> {
    let mut text = raw.trim();
    while let Some(inner) = text
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        text = inner.trim();
    }
    if let Some(pos) = text.find("::") {
        text = text[..pos].trim();
    }
    if text.is_empty() || text.starts_with("nextval(") {
        return None;
    }
    Some(parse_default(text))
}

async fn reflect_mysql(
    pool: &MySqlPool,
    database: &str,
    table: &str,
) -> Result<(Vec<RawColumn>, Vec<(String, KeyKind)>, Vec<RawForeignKey>)> {
    let rows = sqlx::query(
        "SELECT column_name, column_type, is_nullable, column_default, extra, column_key \
         FROM information_schema.columns \
         WHERE table_schema = ? AND table_name = ? \
         ORDER BY ordinal_position",
    )
    .bind(database)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(reflect_err)?;

    let mut columns = Vec::with_capacity(rows.len());
    let mut keys = Vec::new();
    for row in &rows {
        let name: String = row.try_get(0).map_err(reflect_err)?;
        let column_type: String = row.try_get(1).map_err(reflect_err)?;
        let is_nullable: String = row.try_get(2).map_err(reflect_err)?;
        let default: Option<String> = row.try_get(3).map_err(reflect_err)?;
        let extra: String = row.try_get(4).map_err(reflect_err)?;
        let column_key: String = row.try_get(5).map_err(reflect_err)?;

        match column_key.as_str() {
            "PRI" => keys.push((name.clone(), KeyKind::Primary)),
            "UNI" => keys.push((name.clone(), KeyKind::Unique)),
            _ => {}
        }
        columns.push(RawColumn {
            auto_increment: extra.contains("auto_increment"),
            nullable: is_nullable == "YES",
            type_text: column_type,
            default,
            name,
        });
    }

    let fk_rows = sqlx::query(
        "SELECT k.column_name, k.referenced_table_name, k.referenced_column_name, \
                r.delete_rule, r.update_rule \
         FROM information_schema.key_column_usage k \
         JOIN information_schema.referential_constraints r \
           ON k.constraint_name = r.constraint_name \
          AND k.constraint_schema = r.constraint_schema \
         WHERE k.table_schema = ? AND k.table_name = ? \
           AND k.referenced_table_name IS NOT NULL",
    )
    .bind(database)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(reflect_err)?;

    let mut fks = Vec::with_capacity(fk_rows.len());
    for row in &fk_rows {
        fks.push(RawForeignKey {
            column: row.try_get(0).map_err(reflect_err)?,
            table: row.try_get(1).map_err(reflect_err)?,
            references: row.try_get(2).map_err(reflect_err)?,
            on_delete: row.try_get(3).map_err(reflect_err)?,
            on_update: row.try_get(4).map_err(reflect_err)?,
        });
    }
    Ok((columns, keys, fks))
}

async fn reflect_postgres(
    pool: &PgPool,
    table: &str,
) -> Result<(Vec<RawColumn>, Vec<(String, KeyKind)>, Vec<RawForeignKey>)> {
    let rows = sqlx::query(
        "SELECT column_name, data_type, character_maximum_length, \
                numeric_precision, numeric_scale, is_nullable, column_default, is_identity \
         FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name = $1 \
         ORDER BY ordinal_position",
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(reflect_err)?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.try_get(0).map_err(reflect_err)?;
        let data_type: String = row.try_get(1).map_err(reflect_err)?;
        let char_len: Option<i32> = row.try_get(2).map_err(reflect_err)?;
        let precision: Option<i32> = row.try_get(3).map_err(reflect_err)?;
        let scale: Option<i32> = row.try_get(4).map_err(reflect_err)?;
        let is_nullable: String = row.try_get(5).map_err(reflect_err)?;
        let default: Option<String> = row.try_get(6).map_err(reflect_err)?;
        let is_identity: String = row.try_get(7).map_err(reflect_err)?;

        let type_text = match (char_len, data_type.as_str()) {
            (Some(len), _) => format!("{data_type}({len})"),
            (None, "numeric") => match (precision, scale) {
                (Some(p), Some(s)) => format!("numeric({p},{s})"),
                _ => data_type.clone(),
            },
            _ => data_type.clone(),
        };
        let sequence_default = default
            .as_deref()
            .is_some_and(|d| d.starts_with("nextval("));
        columns.push(RawColumn {
            auto_increment: is_identity == "YES" || sequence_default,
            nullable: is_nullable == "YES",
            type_text,
            default,
            name,
        });
    }

    let key_rows = sqlx::query(
        "SELECT kcu.column_name, tc.constraint_type \
         FROM information_schema.table_constraints tc \
         JOIN information_schema.key_column_usage kcu \
           ON tc.constraint_name = kcu.constraint_name \
          AND tc.table_schema = kcu.table_schema \
         WHERE tc.table_schema = 'public' AND tc.table_name = $1 \
           AND tc.constraint_type IN ('PRIMARY KEY', 'UNIQUE')",
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(reflect_err)?;

    let mut keys = Vec::with_capacity(key_rows.len());
    for row in &key_rows {
        let column: String = row.try_get(0).map_err(reflect_err)?;
        let kind: String = row.try_get(1).map_err(reflect_err)?;
        keys.push((
            column,
            if kind == "PRIMARY KEY" {
                KeyKind::Primary
            } else {
                KeyKind::Unique
            },
        ));
    }

    let fk_rows = sqlx::query(
        "SELECT kcu.column_name, ccu.table_name, ccu.column_name, \
                rc.delete_rule, rc.update_rule \
         FROM information_schema.referential_constraints rc \
         JOIN information_schema.key_column_usage kcu \
           ON rc.constraint_name = kcu.constraint_name \
          AND rc.constraint_schema = kcu.constraint_schema \
         JOIN information_schema.constraint_column_usage ccu \
           ON rc.unique_constraint_name = ccu.constraint_name \
          AND rc.unique_constraint_schema = ccu.constraint_schema \
         WHERE kcu.table_schema = 'public' AND kcu.table_name = $1",
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(reflect_err)?;

    let mut fks = Vec::with_capacity(fk_rows.len());
    for row in &fk_rows {
        fks.push(RawForeignKey {
            column: row.try_get(0).map_err(reflect_err)?,
            table: row.try_get(1).map_err(reflect_err)?,
            references: row.try_get(2).map_err(reflect_err)?,
            on_delete: row.try_get(3).map_err(reflect_err)?,
            on_update: row.try_get(4).map_err(reflect_err)?,
        });
    }
    Ok((columns, keys, fks))
}

async fn reflect_mssql(
    client: &mut MssqlClient,
    table: &str,
) -> Result<(Vec<RawColumn>, Vec<(String, KeyKind)>, Vec<RawForeignKey>)> {
    let rows = client
        .query(
            "SELECT c.COLUMN_NAME, c.DATA_TYPE, c.CHARACTER_MAXIMUM_LENGTH, \
                    CAST(c.NUMERIC_PRECISION AS INT), CAST(c.NUMERIC_SCALE AS INT), \
                    c.IS_NULLABLE, c.COLUMN_DEFAULT, \
                    COLUMNPROPERTY(OBJECT_ID(c.TABLE_SCHEMA + '.' + c.TABLE_NAME), \
                                   c.COLUMN_NAME, 'IsIdentity') \
             FROM INFORMATION_SCHEMA.COLUMNS c \
             WHERE c.TABLE_NAME = @P1 \
             ORDER BY c.ORDINAL_POSITION",
            &[&table],
        )
        .await
        .map_err(reflect_err)?
        .into_first_result()
        .await
        .map_err(reflect_err)?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let name = row
            .get::<&str, _>(0)
            .ok_or_else(|| DbError::Reflection("missing column name".to_string()))?
            .to_string();
        let data_type = row.get::<&str, _>(1).unwrap_or_default().to_string();
        let char_len: Option<i32> = row.get(2);
        let precision: Option<i32> = row.get(3);
        let scale: Option<i32> = row.get(4);
        let is_nullable = row.get::<&str, _>(5).unwrap_or_default();
        let default = row.get::<&str, _>(6).map(str::to_string);
        let is_identity: Option<i32> = row.get(7);

        let type_text = match (char_len, data_type.as_str()) {
            // -1 is (MAX)
            (Some(len), _) if len > 0 => format!("{data_type}({len})"),
            (_, "decimal" | "numeric") => match (precision, scale) {
                (Some(p), Some(s)) => format!("{data_type}({p},{s})"),
                _ => data_type.clone(),
            },
            _ => data_type.clone(),
        };
        columns.push(RawColumn {
            auto_increment: is_identity == Some(1),
            nullable: is_nullable == "YES",
            type_text,
            default,
            name,
        });
    }

    let key_rows = client
        .query(
            "SELECT kcu.COLUMN_NAME, tc.CONSTRAINT_TYPE \
             FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc \
             JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu \
               ON tc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME \
             WHERE tc.TABLE_NAME = @P1 \
               AND tc.CONSTRAINT_TYPE IN ('PRIMARY KEY', 'UNIQUE')",
            &[&table],
        )
        .await
        .map_err(reflect_err)?
        .into_first_result()
        .await
        .map_err(reflect_err)?;

    let mut keys = Vec::with_capacity(key_rows.len());
    for row in &key_rows {
        let column = row.get::<&str, _>(0).unwrap_or_default().to_string();
        let kind = row.get::<&str, _>(1).unwrap_or_default();
        keys.push((
            column,
            if kind == "PRIMARY KEY" {
                KeyKind::Primary
            } else {
                KeyKind::Unique
            },
        ));
    }

    let fk_rows = client
        .query(
            "SELECT kcu.COLUMN_NAME, ccu.TABLE_NAME, ccu.COLUMN_NAME, \
                    rc.DELETE_RULE, rc.UPDATE_RULE \
             FROM INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc \
             JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu \
               ON rc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME \
             JOIN INFORMATION_SCHEMA.CONSTRAINT_COLUMN_USAGE ccu \
               ON rc.UNIQUE_CONSTRAINT_NAME = ccu.CONSTRAINT_NAME \
             WHERE kcu.TABLE_NAME = @P1",
            &[&table],
        )
        .await
        .map_err(reflect_err)?
        .into_first_result()
        .await
        .map_err(reflect_err)?;

    let mut fks = Vec::with_capacity(fk_rows.len());
    for row in &fk_rows {
        fks.push(RawForeignKey {
            column: row.get::<&str, _>(0).unwrap_or_default().to_string(),
            table: row.get::<&str, _>(1).unwrap_or_default().to_string(),
            references: row.get::<&str, _>(2).unwrap_or_default().to_string(),
            on_delete: row.get::<&str, _>(3).map(str::to_string),
            on_update: row.get::<&str, _>(4).map(str::to_string),
        });
    }
    Ok((columns, keys, fks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dialect: Dialect) -> ConnectionEntry {
        ConnectionEntry {
            dialect,
            name: "shop".to_string(),
            user: "admin".to_string(),
            password: "pw".to_string(),
            host: "db.local".to_string(),
            port: 5432,
        }
    }

    #[test]
    fn url_building() {
        assert_eq!(
            server_url(&entry(Dialect::MySql), Some("shop")),
            "mysql://admin:pw@db.local:5432/shop"
        );
        assert_eq!(
            server_url(&entry(Dialect::PostgreSql), Some("shop")),
            "postgres://admin:pw@db.local:5432/shop"
        );
        // Server-level connections carry no database path.
        assert_eq!(
            server_url(&entry(Dialect::MySql), None),
            "mysql://admin:pw@db.local:5432"
        );
    }

    #[test]
    fn lifecycle_statements_quote_per_dialect() {
        assert_eq!(
            create_database_sql(Dialect::MySql, "shop"),
            "CREATE DATABASE `shop`;"
        );
        assert_eq!(
            create_database_sql(Dialect::Mssql, "shop"),
            "CREATE DATABASE [shop];"
        );
        assert_eq!(
            drop_database_sql(Dialect::PostgreSql, "shop"),
            "DROP DATABASE IF EXISTS \"shop\";"
        );
        assert_eq!(drop_table_sql(Dialect::MySql, "users"), "DROP TABLE `users`;");
        assert_eq!(
            drop_table_sql(Dialect::Mssql, "users"),
            "DROP TABLE [users];"
        );
    }

    #[test]
    fn default_normalization() {
        assert_eq!(
            normalize_default("'new'::character varying"),
            Some(DefaultValue::String("new".into()))
        );
        assert_eq!(normalize_default("((0))"), Some(DefaultValue::Integer(0)));
        assert_eq!(
            normalize_default("('abc')"),
            Some(DefaultValue::String("abc".into()))
        );
        assert_eq!(normalize_default("nextval('users_id_seq'::regclass)"), None);
        assert_eq!(
            normalize_default("CURRENT_TIMESTAMP"),
            Some(DefaultValue::Expression("CURRENT_TIMESTAMP".into()))
        );
    }

    #[test]
    fn assemble_merges_keys_and_foreign_keys() {
        let columns = vec![
            RawColumn {
                name: "id".into(),
                type_text: "int".into(),
                nullable: false,
                default: None,
                auto_increment: true,
            },
            RawColumn {
                name: "group_id".into(),
                type_text: "int".into(),
                nullable: true,
                default: None,
                auto_increment: false,
            },
        ];
        let keys = vec![("id".to_string(), KeyKind::Primary)];
        let fks = vec![RawForeignKey {
            column: "group_id".into(),
            table: "groups".into(),
            references: "id".into(),
            on_delete: Some("CASCADE".into()),
            on_update: Some("RESTRICT".into()),
        }];

        let spec = assemble("users", columns, &keys, &fks);
        assert_eq!(spec.name, "users");
        let id = spec.column("id").unwrap();
        assert!(id.primary_key && id.auto_increment && !id.nullable);
        assert_eq!(id.source.as_deref(), Some("id"));

        let fk = spec.column("group_id").unwrap().foreign_key.as_ref().unwrap();
        assert_eq!(fk.table, "groups");
        assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
        // RESTRICT has no portable mapping and is dropped.
        assert_eq!(fk.on_update, None);
    }
}
