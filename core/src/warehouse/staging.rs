use tracing::info;

use crate::{
    database::postgres::{
        client::PostgresClient,
        statement::{execute_statements, ExecuteStatementError, SqlStatement},
    },
    helpers::quote_literal,
    manifest::core::{Dialect, Manifest},
    warehouse::tables::Table,
};

/// How the JSON keys are mapped onto the target columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonMapping {
    /// Keys are matched to column names.
    Auto,

    /// A JSON-paths file in S3 maps keys to columns by position.
    JsonPaths(String),
}

/// A Redshift `COPY` of JSON files from S3 into one table.
#[derive(Debug, Clone)]
pub struct CopyStatement {
    pub table: Table,
    pub source_uri: String,
    pub iam_role_arn: String,
    pub mapping: JsonMapping,
    pub epoch_millis_timestamps: bool,
    pub region: String,
}

impl CopyStatement {
    pub fn to_sql(&self) -> String {
        let mapping = match &self.mapping {
            JsonMapping::Auto => quote_literal("auto"),
            JsonMapping::JsonPaths(uri) => quote_literal(uri),
        };

        let mut sql = format!(
            "COPY {} FROM {} CREDENTIALS {} FORMAT AS JSON {}",
            self.table.name(),
            quote_literal(&self.source_uri),
            quote_literal(&format!("aws_iam_role={}", self.iam_role_arn)),
            mapping,
        );

        if self.epoch_millis_timestamps {
            sql.push_str(" TIMEFORMAT 'epochmillisecs'");
        }

        sql.push_str(&format!(" REGION {}", quote_literal(&self.region)));
        sql
    }

    pub fn to_statement(&self) -> SqlStatement {
        SqlStatement::new(format!("copy {}", self.table.name()), self.to_sql())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StagingError {
    #[error("COPY from S3 needs the redshift dialect but the manifest uses {0}")]
    CopyNotSupported(Dialect),

    #[error("The manifest has no `{0}` section so the staging tables can not be loaded")]
    MissingSection(&'static str),

    #[error("Could not load staging tables: {0}")]
    CouldNotLoad(ExecuteStatementError),
}

pub fn copy_statements(manifest: &Manifest) -> Result<Vec<CopyStatement>, StagingError> {
    if !manifest.dialect.supports_s3_copy() {
        return Err(StagingError::CopyNotSupported(manifest.dialect));
    }

    let s3 = manifest.s3.as_ref().ok_or(StagingError::MissingSection("s3"))?;
    let iam_role = manifest.iam_role.as_ref().ok_or(StagingError::MissingSection("iam_role"))?;

    Ok(vec![
        CopyStatement {
            table: Table::StagingEvents,
            source_uri: s3.log_data.clone(),
            iam_role_arn: iam_role.arn.clone(),
            mapping: JsonMapping::JsonPaths(s3.log_jsonpath.clone()),
            epoch_millis_timestamps: true,
            region: s3.region.clone(),
        },
        CopyStatement {
            table: Table::StagingSongs,
            source_uri: s3.song_data.clone(),
            iam_role_arn: iam_role.arn.clone(),
            mapping: JsonMapping::Auto,
            epoch_millis_timestamps: false,
            region: s3.region.clone(),
        },
    ])
}

pub fn copy_table_statements(manifest: &Manifest) -> Result<Vec<SqlStatement>, StagingError> {
    Ok(copy_statements(manifest)?.iter().map(CopyStatement::to_statement).collect())
}

/// Bulk loads both staging tables. Whatever the warehouse reports for a failed copy is passed
/// through as is.
pub async fn load_staging_tables(
    client: &PostgresClient,
    manifest: &Manifest,
) -> Result<(), StagingError> {
    let statements = copy_table_statements(manifest)?;

    info!("Loading staging tables from S3");
    execute_statements(client, &statements).await.map_err(StagingError::CouldNotLoad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{
        cluster::{ClusterDetails, ClusterSslMode},
        iam::IamRoleDetails,
        s3::S3Details,
    };

    fn manifest(dialect: Dialect) -> Manifest {
        Manifest {
            name: "sparkify".to_string(),
            description: None,
            dialect,
            cluster: ClusterDetails {
                host: "localhost".to_string(),
                db_name: "dwh".to_string(),
                user: "dwhuser".to_string(),
                password: "Passw0rd".to_string(),
                port: 5439,
                ssl_mode: ClusterSslMode::Prefer,
            },
            s3: Some(S3Details {
                log_data: "s3://udacity-dend/log_data".to_string(),
                log_jsonpath: "s3://udacity-dend/log_json_path.json".to_string(),
                song_data: "s3://udacity-dend/song_data".to_string(),
                region: "us-west-2".to_string(),
            }),
            iam_role: Some(IamRoleDetails {
                arn: "arn:aws:iam::123456789012:role/dwhRole".to_string(),
            }),
        }
    }

    #[test]
    fn test_copy_staging_events() {
        let statements = copy_table_statements(&manifest(Dialect::Redshift)).unwrap();

        assert_eq!(statements[0].label, "copy staging_events");
        assert_eq!(
            statements[0].sql,
            "COPY staging_events FROM 's3://udacity-dend/log_data' \
             CREDENTIALS 'aws_iam_role=arn:aws:iam::123456789012:role/dwhRole' \
             FORMAT AS JSON 's3://udacity-dend/log_json_path.json' \
             TIMEFORMAT 'epochmillisecs' REGION 'us-west-2'"
        );
    }

    #[test]
    fn test_copy_staging_songs() {
        let statements = copy_table_statements(&manifest(Dialect::Redshift)).unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].label, "copy staging_songs");
        assert_eq!(
            statements[1].sql,
            "COPY staging_songs FROM 's3://udacity-dend/song_data' \
             CREDENTIALS 'aws_iam_role=arn:aws:iam::123456789012:role/dwhRole' \
             FORMAT AS JSON 'auto' REGION 'us-west-2'"
        );
    }

    #[test]
    fn test_copy_targets_only_staging_tables() {
        for copy in copy_statements(&manifest(Dialect::Redshift)).unwrap() {
            assert!(copy.table.is_staging());
        }
    }

    #[test]
    fn test_copy_escapes_quotes() {
        let mut manifest = manifest(Dialect::Redshift);
        if let Some(s3) = manifest.s3.as_mut() {
            s3.log_data = "s3://bucket/it's".to_string();
        }

        let statements = copy_table_statements(&manifest).unwrap();

        assert!(statements[0].sql.starts_with("COPY staging_events FROM 's3://bucket/it''s' "));
    }

    #[test]
    fn test_copy_not_supported_for_postgres() {
        let result = copy_table_statements(&manifest(Dialect::Postgres));

        assert!(matches!(result, Err(StagingError::CopyNotSupported(Dialect::Postgres))));
    }

    #[test]
    fn test_copy_missing_iam_role() {
        let mut manifest = manifest(Dialect::Redshift);
        manifest.iam_role = None;

        let result = copy_table_statements(&manifest);

        assert!(matches!(result, Err(StagingError::MissingSection("iam_role"))));
    }
}
