// public
pub mod manifest;
pub mod warehouse;

mod database;
pub use database::postgres::{
    client::{PostgresClient, PostgresConfig, PostgresConnectionError, PostgresError, ToSql},
    statement::{execute_statements, ExecuteStatementError, SqlStatement},
};

mod helpers;
pub use helpers::{format_duration, load_env_from_project_path, write_file, WriteFileError};

mod logger;
pub use logger::{setup_debug_logger, setup_info_logger};

mod start;
pub use start::{
    create_tables_pipeline, etl_pipeline, plan_statements, start_create_tables, start_etl,
    CreateTablesDetails, EtlDetails, EtlOptions, EtlSummary, Stage, StartSparkifyError,
};
