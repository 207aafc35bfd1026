//! Connection bootstrap: DSN engine detection and pool knobs mapped onto
//! `sea_orm::ConnectOptions`.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::{DaoError, Result};

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    MySql,
    Sqlite,
}

/// Connection options; each backend applies the subset it supports.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    /// Maximum number of connections in the pool.
    pub max_conns: Option<u32>,
    /// Minimum number of connections in the pool.
    pub min_conns: Option<u32>,
    /// Timeout to acquire a connection from the pool.
    pub acquire_timeout: Option<Duration>,
    /// Idle timeout before a connection is closed.
    pub idle_timeout: Option<Duration>,
    /// Maximum lifetime for a connection.
    pub max_lifetime: Option<Duration>,
    /// Log every executed statement through `tracing`.
    pub statement_logging: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            max_lifetime: None,
            statement_logging: false,
        }
    }
}

/// Detect engine by DSN.
///
/// Note: we only check scheme prefixes and don't mutate the tail
/// (credentials etc.).
pub fn detect(dsn: &str) -> Result<DbEngine> {
    // Trim only leading spaces/newlines to be forgiving with env files.
    let s = dsn.trim_start();

    if s.starts_with("postgres://") || s.starts_with("postgresql://") {
        Ok(DbEngine::Postgres)
    } else if s.starts_with("mysql://") {
        Ok(DbEngine::MySql)
    } else if s.starts_with("sqlite:") || s.starts_with("sqlite://") {
        Ok(DbEngine::Sqlite)
    } else {
        Err(DaoError::UnknownDsn(dsn.to_string()))
    }
}

/// Connect and build a SeaORM connection, failing fast on unknown DSNs.
pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<DatabaseConnection> {
    let engine = detect(dsn)?;
    tracing::debug!(?engine, "connecting database");

    let mut o = ConnectOptions::new(dsn.to_string());
    if let Some(n) = opts.max_conns {
        o.max_connections(n);
    }
    if let Some(n) = opts.min_conns {
        o.min_connections(n);
    }
    if let Some(t) = opts.acquire_timeout {
        o.connect_timeout(t);
    }
    if let Some(t) = opts.idle_timeout {
        o.idle_timeout(t);
    }
    if let Some(t) = opts.max_lifetime {
        o.max_lifetime(t);
    }
    o.sqlx_logging(opts.statement_logging);

    Ok(Database::connect(o).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_detection() {
        assert_eq!(detect("sqlite://test.db").unwrap(), DbEngine::Sqlite);
        assert_eq!(detect("sqlite::memory:").unwrap(), DbEngine::Sqlite);
        assert_eq!(
            detect("postgres://localhost/test").unwrap(),
            DbEngine::Postgres
        );
        assert_eq!(
            detect("postgresql://localhost/test").unwrap(),
            DbEngine::Postgres
        );
        assert_eq!(detect("mysql://localhost/test").unwrap(), DbEngine::MySql);
        assert!(matches!(
            detect("unknown://test"),
            Err(DaoError::UnknownDsn(_))
        ));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn sqlite_connection() -> Result<()> {
        let db = connect("sqlite::memory:", ConnectOpts::default()).await?;
        assert!(db.ping().await.is_ok());
        Ok(())
    }
}
