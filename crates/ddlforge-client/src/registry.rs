//! Flat-file connection registry.
//!
//! One JSON file per dialect (`mysql.json`, `postgresql.json`,
//! `mssql.json`) in the registry directory, each mapping a logical
//! database name to a `[dialect, name, user, password, host, port]`
//! tuple. Credentials are stored in plaintext; keep the directory
//! private.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ddlforge_core::Dialect;
use serde::{Deserialize, Serialize};

use crate::error::{DbError, Result};

type EntryTuple = (String, String, String, String, String, u16);

/// One registered connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryTuple", into = "EntryTuple")]
pub struct ConnectionEntry {
    /// Target dialect.
    pub dialect: Dialect,
    /// Database name (also the registry key).
    pub name: String,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl TryFrom<EntryTuple> for ConnectionEntry {
    type Error = ddlforge_core::dialect::UnknownDialect;

    fn try_from(t: EntryTuple) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            dialect: t.0.parse()?,
            name: t.1,
            user: t.2,
            password: t.3,
            host: t.4,
            port: t.5,
        })
    }
}

impl From<ConnectionEntry> for EntryTuple {
    fn from(e: ConnectionEntry) -> Self {
        (
            e.dialect.as_str().to_string(),
            e.name,
            e.user,
            e.password,
            e.host,
            e.port,
        )
    }
}

const DIALECTS: [Dialect; 3] = [Dialect::MySql, Dialect::PostgreSql, Dialect::Mssql];

/// The registry directory and its per-dialect files.
#[derive(Debug, Clone)]
pub struct Registry {
    dir: PathBuf,
}

impl Registry {
    /// Opens a registry rooted at `dir`. The directory is created on
    /// first write, not here.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file(&self, dialect: Dialect) -> PathBuf {
        self.dir.join(format!("{dialect}.json"))
    }

    /// Loads the entries for one dialect. A missing file is an empty
    /// registry, not an error.
    pub fn load(&self, dialect: Dialect) -> Result<BTreeMap<String, ConnectionEntry>> {
        read_entries(&self.file(dialect))
    }

    /// Loads every entry across all dialect files.
    pub fn load_all(&self) -> Result<Vec<ConnectionEntry>> {
        let mut out = Vec::new();
        for dialect in DIALECTS {
            out.extend(self.load(dialect)?.into_values());
        }
        Ok(out)
    }

    /// Finds an entry by database name, searching all dialect files.
    pub fn get(&self, name: &str) -> Result<ConnectionEntry> {
        for dialect in DIALECTS {
            if let Some(entry) = self.load(dialect)?.remove(name) {
                return Ok(entry);
            }
        }
        Err(DbError::UnknownDatabase(name.to_string()))
    }

    /// Records (or replaces) an entry in its dialect's file.
    pub fn record(&self, entry: &ConnectionEntry) -> Result<()> {
        let path = self.file(entry.dialect);
        let mut entries = read_entries(&path)?;
        entries.insert(entry.name.clone(), entry.clone());
        write_entries(&path, &entries)
    }

    /// Removes an entry by name. Returns the removed entry.
    pub fn remove(&self, name: &str) -> Result<ConnectionEntry> {
        for dialect in DIALECTS {
            let path = self.file(dialect);
            let mut entries = read_entries(&path)?;
            if let Some(entry) = entries.remove(name) {
                write_entries(&path, &entries)?;
                return Ok(entry);
            }
        }
        Err(DbError::UnknownDatabase(name.to_string()))
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, ConnectionEntry>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn write_entries(path: &Path, entries: &BTreeMap<String, ConnectionEntry>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(entries)?)?;
    Ok(())
}
