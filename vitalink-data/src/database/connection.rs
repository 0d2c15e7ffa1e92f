//! Database connection module for the VitaLink application
//!
//! SQLite is the only supported backend. The pool is created once at startup
//! and shared process-wide; when the configured database file cannot be
//! opened, an in-memory database is used instead so the service can still
//! come up in read-only environments.

use std::env;
use std::sync::Arc;
use once_cell::sync::OnceCell;
use tracing::{error, info, warn};

use super::DatabaseError;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// SQLite connection pool shared across repositories
#[derive(Debug, Clone)]
pub struct DatabasePool {
    inner: Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>,
}

impl DatabasePool {
    /// Check out a connection from the pool
    pub fn conn(
        &self,
    ) -> Result<r2d2::PooledConnection<r2d2_sqlite::SqliteConnectionManager>, DatabaseError> {
        self.inner
            .get()
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))
    }

    /// Pool state for diagnostics
    pub fn state(&self) -> r2d2::State {
        self.inner.state()
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub sqlite_path: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: "./data/vitalink.db".to_string(),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Self {
        let sqlite_path =
            env::var("DB_SQLITE_PATH").unwrap_or_else(|_| "./data/vitalink.db".to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        info!(
            "Database configuration: path={}, max_connections={}, timeout={}s",
            sqlite_path, max_connections, timeout_seconds
        );

        DatabaseConfig {
            sqlite_path,
            max_connections,
            timeout_seconds,
        }
    }
}

/// Initialize the database connection pool
pub fn initialize_database_pool() -> Result<(), DatabaseError> {
    // Tests reinitialize the pool; OnceCell can't be reset, so a second call
    // against an already-set cell is treated as success in that environment.
    if std::env::var("DB_POOL_RESET").is_ok() {
        info!("Test environment detected - proceeding with initialization anyway");
    } else if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let config = DatabaseConfig::from_env();
    let pool = initialize_sqlite_pool(&config)?;

    if std::env::var("DB_POOL_RESET").is_ok() && DB_POOL.get().is_some() {
        return Ok(());
    }

    match DB_POOL.set(pool) {
        Ok(_) => {
            run_migrations()?;
            Ok(())
        }
        Err(_) => {
            if std::env::var("DB_POOL_RESET").is_ok() {
                Ok(())
            } else {
                Err(DatabaseError::PoolAlreadyInitialized)
            }
        }
    }
}

/// Get the database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get().cloned().ok_or(DatabaseError::PoolNotInitialized)
}

/// Initialize the SQLite connection pool
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;

    info!("Initializing SQLite database at: {}", config.sqlite_path);

    // Create parent directory if it doesn't exist
    if let Some(parent) = Path::new(&config.sqlite_path).parent() {
        if !parent.exists() {
            match fs::create_dir_all(parent) {
                Ok(_) => info!("Created directory: {:?}", parent),
                Err(e) => {
                    warn!(
                        "Failed to create directory: {}, falling back to in-memory database",
                        e
                    );
                    return initialize_in_memory_pool(config);
                }
            }
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(&config.sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    match r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager)
    {
        Ok(pool) => match pool.get() {
            Ok(_) => {
                info!("SQLite connection pool created successfully");
                Ok(DatabasePool { inner: Arc::new(pool) })
            }
            Err(e) => {
                error!("Failed to connect to SQLite database: {}", e);
                warn!("Falling back to in-memory SQLite database");
                initialize_in_memory_pool(config)
            }
        },
        Err(e) => {
            error!("Failed to create SQLite connection pool: {}", e);
            warn!("Falling back to in-memory SQLite database");
            initialize_in_memory_pool(config)
        }
    }
}

/// Initialize an in-memory SQLite database as fallback
fn initialize_in_memory_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = r2d2_sqlite::SqliteConnectionManager::memory();

    let pool = r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .build(manager)
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    Ok(DatabasePool { inner: Arc::new(pool) })
}

/// Run database migrations
pub fn run_migrations() -> Result<(), DatabaseError> {
    let pool = get_db_pool()?;

    info!("Running database migrations");

    let conn = pool.conn()?;
    run_sqlite_migrations(&conn)?;

    info!("Database migrations completed successfully");

    Ok(())
}

/// Run SQLite migrations
fn run_sqlite_migrations(conn: &rusqlite::Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS user_profiles (
            id TEXT PRIMARY KEY,
            surname TEXT NOT NULL,
            first_name TEXT NOT NULL,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone_number TEXT,
            age INTEGER,
            gender TEXT,
            device_id TEXT,
            diet_summary TEXT,
            mental_health_summary TEXT,
            model_context TEXT,
            premium_plan INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS connections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            monitored_id TEXT NOT NULL REFERENCES user_profiles (id) ON DELETE CASCADE,
            monitored_by_id TEXT NOT NULL REFERENCES user_profiles (id) ON DELETE CASCADE,
            accepted INTEGER NOT NULL DEFAULT 0,
            is_professional INTEGER NOT NULL DEFAULT 0,
            access_diet_data INTEGER NOT NULL DEFAULT 0,
            access_mental_health_data INTEGER NOT NULL DEFAULT 0,
            access_vital_signs_data INTEGER NOT NULL DEFAULT 0,
            UNIQUE (monitored_id, monitored_by_id)
        );

        CREATE TABLE IF NOT EXISTS device_records (
            id TEXT PRIMARY KEY,
            device_id TEXT,
            timestamp TEXT NOT NULL,
            temp REAL,
            heart_rate INTEGER,
            blood_oxygen REAL,
            sbp INTEGER,
            dbp INTEGER,
            ecg_sensor_frame TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_device_records_timestamp
        ON device_records (timestamp DESC);

        CREATE TABLE IF NOT EXISTS demographic_defaults (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            age INTEGER NOT NULL,
            gender TEXT NOT NULL
        );",
    )
    .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(())
}

/// Get information about the current database connection
pub fn get_connection_info() -> Option<String> {
    let pool = DB_POOL.get()?;

    match pool.conn() {
        Ok(conn) => {
            let connection_info = match conn.query_row_and_then(
                "PRAGMA database_list",
                [],
                |row| row.get::<_, String>(2),
            ) {
                Ok(path) => {
                    if path.is_empty() || path == ":memory:" {
                        "SQLite in-memory database".to_string()
                    } else {
                        format!("SQLite database at {}", path)
                    }
                }
                Err(_) => "SQLite database (path unknown)".to_string(),
            };

            let state = pool.state();
            Some(format!(
                "{} (connections: active={}, idle={})",
                connection_info, state.connections, state.idle_connections
            ))
        }
        Err(e) => {
            error!("Failed to get SQLite connection: {}", e);
            Some(format!("SQLite connection error: {}", e))
        }
    }
}
