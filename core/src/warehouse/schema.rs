use tracing::info;

use crate::{
    database::postgres::{
        client::PostgresClient,
        statement::{execute_statements, ExecuteStatementError},
    },
    manifest::core::Dialect,
    warehouse::tables::{create_table_statements, drop_table_statements},
};

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("Could not drop tables: {0}")]
    CouldNotDropTables(ExecuteStatementError),

    #[error("Could not create tables: {0}")]
    CouldNotCreateTables(ExecuteStatementError),
}

pub async fn drop_tables(client: &PostgresClient) -> Result<(), SchemaError> {
    info!("Dropping tables");
    execute_statements(client, &drop_table_statements())
        .await
        .map_err(SchemaError::CouldNotDropTables)
}

pub async fn create_tables(client: &PostgresClient, dialect: Dialect) -> Result<(), SchemaError> {
    info!("Creating tables for the {} dialect", dialect);
    execute_statements(client, &create_table_statements(dialect))
        .await
        .map_err(SchemaError::CouldNotCreateTables)
}

/// Drops then recreates all tables. A failure part way leaves the schema as far as it got.
pub async fn reset_schema(client: &PostgresClient, dialect: Dialect) -> Result<(), SchemaError> {
    drop_tables(client).await?;
    create_tables(client, dialect).await?;
    info!("Schema reset complete");
    Ok(())
}
