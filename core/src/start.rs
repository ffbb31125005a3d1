use std::path::PathBuf;

use tracing::info;

use crate::{
    database::postgres::{
        client::{PostgresClient, PostgresConnectionError, PostgresError},
        statement::SqlStatement,
    },
    manifest::{
        core::Manifest,
        yaml::{read_manifest, ReadManifestError},
    },
    warehouse::{
        report::{count_table_rows, TableRowCount},
        schema::{reset_schema, SchemaError},
        staging::{copy_table_statements, load_staging_tables, StagingError},
        tables::{create_table_statements, drop_table_statements},
        transform::{insert_table_statements, insert_tables, InsertedRows, TransformError},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Drop and recreate every table.
    CreateTables,

    /// Load the staging tables then populate the star schema from them.
    Etl,
}

pub struct CreateTablesDetails {
    pub manifest_path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EtlOptions {
    /// Use whatever is already in the staging tables instead of copying from S3.
    pub skip_staging_load: bool,

    /// Count the rows of every table once the inserts finish.
    pub report_row_counts: bool,
}

pub struct EtlDetails {
    pub manifest_path: PathBuf,
    pub options: EtlOptions,
}

#[derive(Debug, Clone, Default)]
pub struct EtlSummary {
    pub inserted: Vec<InsertedRows>,
    pub row_counts: Option<Vec<TableRowCount>>,
}

#[derive(thiserror::Error, Debug)]
pub enum StartSparkifyError {
    #[error("Could not read manifest: {0}")]
    CouldNotReadManifest(#[from] ReadManifestError),

    #[error("{0}")]
    PostgresConnectionError(#[from] PostgresConnectionError),

    #[error("{0}")]
    SchemaError(#[from] SchemaError),

    #[error("{0}")]
    StagingError(#[from] StagingError),

    #[error("{0}")]
    TransformError(#[from] TransformError),

    #[error("Could not count table rows: {0}")]
    CouldNotCountRows(PostgresError),
}

/// The statements a stage runs, in execution order.
pub fn plan_statements(
    manifest: &Manifest,
    stage: Stage,
    options: &EtlOptions,
) -> Result<Vec<SqlStatement>, StartSparkifyError> {
    let statements = match stage {
        Stage::CreateTables => {
            let mut statements = drop_table_statements();
            statements.extend(create_table_statements(manifest.dialect));
            statements
        }
        Stage::Etl => {
            let mut statements = if options.skip_staging_load {
                vec![]
            } else {
                copy_table_statements(manifest)?
            };
            statements.extend(insert_table_statements().into_iter().map(|(_, s)| s));
            statements
        }
    };

    Ok(statements)
}

pub async fn create_tables_pipeline(manifest: &Manifest) -> Result<(), StartSparkifyError> {
    let client = PostgresClient::new(&manifest.cluster).await?;
    reset_schema(&client, manifest.dialect).await?;
    Ok(())
}

pub async fn etl_pipeline(
    manifest: &Manifest,
    options: &EtlOptions,
) -> Result<EtlSummary, StartSparkifyError> {
    let client = PostgresClient::new(&manifest.cluster).await?;

    if options.skip_staging_load {
        info!("Skipping staging load, using the rows already staged");
    } else {
        load_staging_tables(&client, manifest).await?;
    }

    let inserted = insert_tables(&client).await?;

    let row_counts = if options.report_row_counts {
        Some(count_table_rows(&client).await.map_err(StartSparkifyError::CouldNotCountRows)?)
    } else {
        None
    };

    Ok(EtlSummary { inserted, row_counts })
}

pub async fn start_create_tables(details: CreateTablesDetails) -> Result<(), StartSparkifyError> {
    let manifest = read_manifest(&details.manifest_path)?;

    info!("Resetting the {} schema", manifest.name);
    create_tables_pipeline(&manifest).await
}

pub async fn start_etl(details: EtlDetails) -> Result<EtlSummary, StartSparkifyError> {
    let manifest = read_manifest(&details.manifest_path)?;

    info!("Running the {} ETL", manifest.name);
    let summary = etl_pipeline(&manifest, &details.options).await?;
    info!("ETL complete");

    Ok(summary)
}
