//! # Database Module
//!
//! This module owns everything behind the [`CampRepository`] seam:
//! the domain records, the change sets used to stage writes, and the two
//! repository implementations.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      DATABASE LAYER                              │
//! │                                                                  │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │              CampRepository (trait object)                │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! │                 │                            │                   │
//! │                 ▼                            ▼                   │
//! │  ┌──────────────────────────┐   ┌──────────────────────────┐    │
//! │  │   PgCampRepository       │   │ InMemoryCampRepository   │    │
//! │  │   (deadpool-postgres)    │   │ (tokio RwLock store)     │    │
//! │  └──────────────────────────┘   └──────────────────────────┘    │
//! │                 │                                                │
//! │     ┌───────────┼───────────┐                                    │
//! │     ▼           ▼           ▼                                    │
//! │  ┌───────┐  ┌────────┐  ┌────────┐                               │
//! │  │ camps │  │speakers│  │ talks  │                               │
//! │  └───────┘  └────────┘  └────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod changes;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod queries;

use async_trait::async_trait;
use deadpool_postgres::{Config, Pool, Runtime};
use thiserror::Error;
use tokio_postgres::{Config as TokioConfig, NoTls};
use tracing::info;

pub use changes::{Change, ChangeSet};
pub use memory::InMemoryCampRepository;
pub use models::*;
pub use postgres::PgCampRepository;

/// Schema for camps, speakers and talks. Every statement is idempotent.
const SCHEMA_SQL: &str = include_str!("../../migrations/001_initial_schema.sql");

/// The Atlanta Code Camp sample rows. Safe to apply repeatedly.
const SAMPLE_DATA_SQL: &str = include_str!("../../migrations/002_sample_data.sql");

/// Database-related errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to connect to the database
    #[error("Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryError(#[from] tokio_postgres::Error),

    /// Migration failed
    #[error("Migration failed: {0}")]
    MigrationError(String),

    /// A staged change violates a storage invariant
    #[error("Invalid change: {0}")]
    InvalidChange(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// Storage operations the talk endpoints depend on.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// faults. Writes are staged in a [`ChangeSet`] and only reach storage
/// through [`save_changes`](CampRepository::save_changes).
#[async_trait]
pub trait CampRepository: Send + Sync {
    /// Find a camp by its moniker.
    async fn get_camp(&self, moniker: &str) -> Result<Option<Camp>, DatabaseError>;

    /// All talks of the camp with this moniker, ordered by id.
    ///
    /// An unknown moniker yields an empty list.
    async fn get_talks_by_moniker(
        &self,
        moniker: &str,
        include_speakers: bool,
    ) -> Result<Vec<Talk>, DatabaseError>;

    /// One talk, only if it belongs to the camp with this moniker.
    async fn get_talk_by_moniker(
        &self,
        moniker: &str,
        talk_id: i32,
        include_speakers: bool,
    ) -> Result<Option<Talk>, DatabaseError>;

    /// Find a speaker by id.
    async fn get_speaker(&self, speaker_id: i32) -> Result<Option<Speaker>, DatabaseError>;

    /// Commit every staged change atomically.
    ///
    /// Returns `true` when at least one row was affected. Ids generated for
    /// inserted talks are written back into `changes`.
    async fn save_changes(&self, changes: &mut ChangeSet) -> Result<bool, DatabaseError>;

    /// Whether the backing store is reachable.
    async fn is_healthy(&self) -> bool;
}

/// Database connection wrapper.
///
/// This struct wraps the connection pool and provides
/// methods for connecting and preparing the schema.
///
/// ## Usage
///
/// ```rust,ignore
/// let db = Database::connect("postgres://...", 10).await?;
/// db.run_migrations(true).await?;
/// let repository = PgCampRepository::new(db);
/// ```
#[derive(Clone)]
pub struct Database {
    /// The connection pool
    pool: Pool,
}

impl Database {
    /// Connect to the PostgreSQL database.
    ///
    /// ## Arguments
    ///
    /// * `database_url` - PostgreSQL connection string
    /// * `max_size` - Maximum number of pooled connections
    ///
    /// ## Returns
    ///
    /// * `Ok(Database)` - Connected successfully
    /// * `Err(DatabaseError)` - Connection failed
    pub async fn connect(database_url: &str, max_size: usize) -> Result<Self, DatabaseError> {
        info!("Connecting to database...");

        let tokio_config = database_url
            .parse::<TokioConfig>()
            .map_err(|e| DatabaseError::ConfigError(format!("Invalid database URL: {}", e)))?;

        let mut config = Config::new();

        if let Some(dbname) = tokio_config.get_dbname() {
            config.dbname = Some(dbname.to_string());
        }
        if let Some(user) = tokio_config.get_user() {
            config.user = Some(user.to_string());
        }
        if let Some(password) = tokio_config.get_password() {
            config.password = Some(String::from_utf8_lossy(password).to_string());
        }
        if let Some(tokio_postgres::config::Host::Tcp(host)) = tokio_config.get_hosts().first() {
            config.host = Some(host.clone());
        }
        if let Some(port) = tokio_config.get_ports().first() {
            config.port = Some(*port);
        }

        config.pool = Some(deadpool_postgres::PoolConfig {
            max_size,
            ..Default::default()
        });

        let pool = config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        // Fail at startup rather than on the first request
        let client = pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;
        client
            .query("SELECT 1", &[])
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        info!("Database connection established (pool size {})", max_size);

        Ok(Self { pool })
    }

    /// Create the schema and, if asked, load the sample camp.
    ///
    /// Both scripts are embedded in the binary and written to be re-run on
    /// every startup.
    pub async fn run_migrations(&self, seed_sample_data: bool) -> Result<(), DatabaseError> {
        info!("Running database migrations...");

        let client = self
            .pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        client
            .batch_execute(SCHEMA_SQL)
            .await
            .map_err(|e| DatabaseError::MigrationError(describe_db_error(&e)))?;

        if seed_sample_data {
            client
                .batch_execute(SAMPLE_DATA_SQL)
                .await
                .map_err(|e| DatabaseError::MigrationError(describe_db_error(&e)))?;
            info!("Sample data loaded");
        }

        info!("Migrations completed successfully");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

/// Flatten a PostgreSQL error into one line with its code and detail.
fn describe_db_error(e: &tokio_postgres::Error) -> String {
    match e.as_db_error() {
        Some(db_err) => format!(
            "{} (code {}, detail: {})",
            db_err.message(),
            db_err.code().code(),
            db_err.detail().unwrap_or("none")
        ),
        None => e.to_string(),
    }
}
