use std::time::Duration;

use bb8::{Pool, RunError};
use bb8_postgres::PostgresConnectionManager;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio::{task, time::timeout};
pub use tokio_postgres::types::ToSql;
pub use tokio_postgres::Config as PostgresConfig;
use tokio_postgres::{config::SslMode, Error as PgError, Row, ToStatement};
use tracing::{error, info};

use crate::manifest::cluster::{ClusterDetails, ClusterSslMode};

const CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(thiserror::Error, Debug)]
pub enum PostgresConnectionError {
    #[error("Connection pool error: {0}")]
    ConnectionPoolError(#[from] tokio_postgres::Error),

    #[error("Connection pool runtime error: {0}")]
    ConnectionPoolRuntimeError(#[from] RunError<tokio_postgres::Error>),

    #[error("Can not connect to the warehouse at {0} please make sure the cluster details are correct")]
    CanNotConnectToDatabase(String),

    #[error("Could not parse connection string make sure it is correctly formatted")]
    CouldNotParseConnectionString,

    #[error("Could not create tls connector")]
    CouldNotCreateTlsConnector,
}

#[derive(thiserror::Error, Debug)]
pub enum PostgresError {
    #[error("PgError {0}")]
    PgError(#[from] PgError),

    #[error("Connection pool error: {0}")]
    ConnectionPoolError(#[from] RunError<tokio_postgres::Error>),
}

impl PostgresError {
    /// The SQLSTATE code reported by the server, if the error came from the server.
    pub fn code(&self) -> Option<&str> {
        match self {
            PostgresError::PgError(e) => e.code().map(|code| code.code()),
            PostgresError::ConnectionPoolError(RunError::User(e)) => e.code().map(|c| c.code()),
            PostgresError::ConnectionPoolError(_) => None,
        }
    }
}

/// Client over a pool holding exactly one connection. Every statement runs outside an explicit
/// transaction so the server commits it as soon as it completes.
pub struct PostgresClient {
    pool: Pool<PostgresConnectionManager<MakeTlsConnector>>,
}

impl PostgresClient {
    pub async fn new(cluster: &ClusterDetails) -> Result<Self, PostgresConnectionError> {
        info!("Connecting to {}", cluster.target());
        Self::from_config(cluster.to_config(), cluster.ssl_mode, cluster.target()).await
    }

    pub async fn from_connection_string(
        connection_str: &str,
    ) -> Result<Self, PostgresConnectionError> {
        let config: PostgresConfig = connection_str
            .parse()
            .map_err(|_| PostgresConnectionError::CouldNotParseConnectionString)?;
        let ssl_mode = if connection_str.contains("sslmode=require") {
            ClusterSslMode::Require
        } else if connection_str.contains("sslmode=disable") {
            ClusterSslMode::Disable
        } else {
            ClusterSslMode::Prefer
        };

        Self::from_config(config, ssl_mode, "connection string".to_string()).await
    }

    pub async fn from_config(
        config: PostgresConfig,
        ssl_mode: ClusterSslMode,
        target: String,
    ) -> Result<Self, PostgresConnectionError> {
        async fn _new(
            mut config: PostgresConfig,
            ssl_mode: ClusterSslMode,
            target: String,
            disable_ssl: bool,
        ) -> Result<PostgresClient, PostgresConnectionError> {
            match ssl_mode {
                _ if disable_ssl => config.ssl_mode(SslMode::Disable),
                ClusterSslMode::Disable => config.ssl_mode(SslMode::Disable),
                ClusterSslMode::Prefer => config.ssl_mode(SslMode::Prefer),
                ClusterSslMode::Require => config.ssl_mode(SslMode::Require),
            };

            let connector = TlsConnector::builder()
                .build()
                .map_err(|_| PostgresConnectionError::CouldNotCreateTlsConnector)?;
            let tls_connector = MakeTlsConnector::new(connector);

            // Perform a direct connection test
            let connect_result =
                timeout(CONNECT_TIMEOUT, config.connect(tls_connector.clone())).await;
            let (client, connection) = match connect_result {
                Ok(Ok((client, connection))) => (client, connection),
                Ok(Err(e)) => {
                    // retry without ssl if ssl was only preferred
                    if !disable_ssl && ssl_mode == ClusterSslMode::Prefer {
                        return Box::pin(_new(config, ssl_mode, target, true)).await;
                    }
                    error!("Error connecting to {}: {}", target, e);
                    return Err(PostgresConnectionError::CanNotConnectToDatabase(target));
                }
                Err(e) => {
                    error!("Timeout connecting to {}: {}", target, e);
                    return Err(PostgresConnectionError::CanNotConnectToDatabase(target));
                }
            };

            let connection_handle = task::spawn(connection);

            if let Err(e) = client.query_one("SELECT 1", &[]).await {
                error!("Connection check against {} failed: {}", target, e);
                return Err(PostgresConnectionError::CanNotConnectToDatabase(target));
            }

            drop(client);
            match connection_handle.await {
                Ok(Ok(())) => (),
                Ok(Err(_)) | Err(_) => {
                    return Err(PostgresConnectionError::CanNotConnectToDatabase(target))
                }
            }

            let manager = PostgresConnectionManager::new(config, tls_connector);

            let pool = Pool::builder().max_size(1).build(manager).await?;

            Ok(PostgresClient { pool })
        }

        _new(config, ssl_mode, target, false).await
    }

    /// Runs `sql` over the simple query protocol. Used for DDL and `COPY`, which return no rows.
    pub async fn batch_execute(&self, sql: &str) -> Result<(), PostgresError> {
        let conn = self.pool.get().await?;
        conn.batch_execute(sql).await.map_err(PostgresError::PgError)
    }

    pub async fn execute<T>(
        &self,
        query: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, PostgresError>
    where
        T: ?Sized + ToStatement,
    {
        let conn = self.pool.get().await?;
        conn.execute(query, params).await.map_err(PostgresError::PgError)
    }

    pub async fn query<T>(
        &self,
        query: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, PostgresError>
    where
        T: ?Sized + ToStatement,
    {
        let conn = self.pool.get().await?;
        let rows = conn.query(query, params).await.map_err(PostgresError::PgError)?;
        Ok(rows)
    }

    pub async fn query_one<T>(
        &self,
        query: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Row, PostgresError>
    where
        T: ?Sized + ToStatement,
    {
        let conn = self.pool.get().await?;
        let row = conn.query_one(query, params).await.map_err(PostgresError::PgError)?;
        Ok(row)
    }
}
