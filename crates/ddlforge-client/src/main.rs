//! ddlforge CLI
//!
//! Command-line front end: manage registered connections, browse
//! reflected schema, and plan or apply table changes described by a
//! JSON table form.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ddlforge_client::prelude::*;

/// Schema diffing and DDL generation for MySQL, PostgreSQL and MSSQL.
#[derive(Parser)]
#[command(name = "ddlforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the per-dialect connection registry files.
    #[arg(short, long, env = "DDLFORGE_REGISTRY", default_value = "connections")]
    registry: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered databases.
    Databases,

    /// Register a database (verifies the connection first).
    Register {
        /// Dialect: mysql, postgresql or mssql.
        dialect: Dialect,

        /// Database name.
        name: String,

        /// Login user.
        #[arg(short, long)]
        user: String,

        /// Login password.
        #[arg(short, long, env = "DDLFORGE_PASSWORD")]
        password: String,

        /// Server host.
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Server port.
        #[arg(long)]
        port: u16,
    },

    /// Remove a database from the registry.
    Forget {
        /// Registered database name.
        name: String,
    },

    /// Create a database on the server and register it.
    CreateDatabase {
        /// Dialect: mysql, postgresql or mssql.
        dialect: Dialect,

        /// Name of the database to create.
        name: String,

        /// Login user.
        #[arg(short, long)]
        user: String,

        /// Login password.
        #[arg(short, long, env = "DDLFORGE_PASSWORD")]
        password: String,

        /// Server host.
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Server port.
        #[arg(long)]
        port: u16,
    },

    /// Drop a registered database and forget it.
    DropDatabase {
        /// Registered database name.
        name: String,
    },

    /// Drop a table from a registered database.
    DropTable {
        /// Registered database name.
        db: String,
        /// Table name.
        table: String,
    },

    /// List the tables of a registered database.
    Tables {
        /// Registered database name.
        db: String,
    },

    /// Show the reflected columns of a table.
    Columns {
        /// Registered database name.
        db: String,
        /// Table name.
        table: String,
    },

    /// Dump a reflected table as an editable JSON form.
    Snapshot {
        /// Registered database name.
        db: String,
        /// Table name.
        table: String,
    },

    /// Show the DDL a table form would produce, without executing.
    Plan {
        /// Registered database name.
        db: String,
        /// Path to the edited table form.
        file: PathBuf,
    },

    /// Apply a table form's changes to the live database.
    Apply {
        /// Registered database name.
        db: String,
        /// Path to the edited table form.
        file: PathBuf,

        /// Show SQL without executing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Create a new table from a table form.
    CreateTable {
        /// Registered database name.
        db: String,
        /// Path to the table form.
        file: PathBuf,
    },
}

fn read_form(path: &std::path::Path) -> anyhow::Result<TableForm> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let registry = Registry::new(&cli.registry);

    match cli.command {
        Commands::Databases => {
            let entries = registry.load_all()?;
            if entries.is_empty() {
                info!("No databases registered.");
            } else {
                for entry in entries {
                    println!(
                        "{:<12} {:<24} {}@{}:{}",
                        entry.dialect, entry.name, entry.user, entry.host, entry.port
                    );
                }
            }
        }

        Commands::Register {
            dialect,
            name,
            user,
            password,
            host,
            port,
        } => {
            let entry = ConnectionEntry {
                dialect,
                name,
                user,
                password,
                host,
                port,
            };
            Connection::connect(&entry).await?;
            registry.record(&entry)?;
            info!(db = %entry.name, dialect = %entry.dialect, "Database registered");
        }

        Commands::Forget { name } => {
            let entry = registry.remove(&name)?;
            info!(db = %entry.name, dialect = %entry.dialect, "Database removed");
        }

        Commands::CreateDatabase {
            dialect,
            name,
            user,
            password,
            host,
            port,
        } => {
            let entry = ConnectionEntry {
                dialect,
                name,
                user,
                password,
                host,
                port,
            };
            let mut connection = Connection::connect_server(&entry).await?;
            connection.create_database().await?;
            registry.record(&entry)?;
            info!(db = %entry.name, dialect = %entry.dialect, "Database created and registered");
        }

        Commands::DropDatabase { name } => {
            let entry = registry.get(&name)?;
            let mut connection = Connection::connect_server(&entry).await?;
            connection.drop_database().await?;
            registry.remove(&name)?;
            info!(db = %entry.name, dialect = %entry.dialect, "Database dropped and forgotten");
        }

        Commands::DropTable { db, table } => {
            let mut connection = Connection::connect(&registry.get(&db)?).await?;
            connection.drop_table(&table).await?;
            info!(db = %db, table = %table, "Table dropped");
        }

        Commands::Tables { db } => {
            let mut connection = Connection::connect(&registry.get(&db)?).await?;
            for table in connection.tables().await? {
                println!("{table}");
            }
        }

        Commands::Columns { db, table } => {
            let mut connection = Connection::connect(&registry.get(&db)?).await?;
            let spec = connection.table_spec(&table).await?;
            for column in &spec.columns {
                let mut flags = Vec::new();
                if column.primary_key {
                    flags.push("PK".to_string());
                }
                if column.unique {
                    flags.push("UNIQUE".to_string());
                }
                if !column.nullable {
                    flags.push("NOT NULL".to_string());
                }
                if column.auto_increment {
                    flags.push("AUTO".to_string());
                }
                if let Some(fk) = &column.foreign_key {
                    flags.push(format!("FK -> {}.{}", fk.table, fk.column));
                }
                println!(
                    "{:<24} {:<20} {}",
                    column.name,
                    column.data_type.to_sql(),
                    flags.join(", ")
                );
            }
        }

        Commands::Snapshot { db, table } => {
            let mut connection = Connection::connect(&registry.get(&db)?).await?;
            let spec = connection.table_spec(&table).await?;
            let form = TableForm::from_spec(&spec);
            println!("{}", serde_json::to_string_pretty(&form)?);
        }

        Commands::Plan { db, file } => {
            let form = read_form(&file)?;
            let desired = form.to_spec()?;

            let mut connection = Connection::connect(&registry.get(&db)?).await?;
            let current = connection.table_spec(form.reflected_table()).await?;

            let diff = diff_tables(&current, &desired);
            if diff.is_empty() {
                info!(table = %diff.table, "No changes detected");
            } else {
                for sql in diff.statements(connection.dialect()) {
                    println!("{sql}");
                }
            }
        }

        Commands::Apply { db, file, dry_run } => {
            let form = read_form(&file)?;
            let desired = form.to_spec()?;

            let mut connection = Connection::connect(&registry.get(&db)?).await?;
            let current = connection.table_spec(form.reflected_table()).await?;

            let diff = diff_tables(&current, &desired);
            let mut runner = DdlRunner::new(connection).dry_run(dry_run);
            runner.apply(&diff).await?;
        }

        Commands::CreateTable { db, file } => {
            let form = read_form(&file)?;
            let table = form.to_spec()?;

            let connection = Connection::connect(&registry.get(&db)?).await?;
            let mut runner = DdlRunner::new(connection);
            runner.create_table(&table).await?;
        }
    }

    Ok(())
}
