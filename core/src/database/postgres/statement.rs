use std::{
    fmt::{Display, Formatter},
    time::Instant,
};

use tracing::{debug, info};

use crate::{
    database::postgres::client::{PostgresClient, PostgresError},
    helpers::format_duration,
};

/// A single SQL statement and the label it is logged and reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub label: String,
    pub sql: String,
}

impl SqlStatement {
    pub fn new(label: impl Into<String>, sql: impl Into<String>) -> Self {
        SqlStatement { label: label.into(), sql: sql.into() }
    }
}

impl Display for SqlStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "-- {}\n{};", self.label, self.sql.trim())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExecuteStatementError {
    #[error("Statement `{0}` failed: {1}")]
    StatementFailed(String, PostgresError),
}

/// Executes the statements one after another, each committed on its own. Stops at the first
/// failure, leaving every earlier statement applied.
pub async fn execute_statements(
    client: &PostgresClient,
    statements: &[SqlStatement],
) -> Result<(), ExecuteStatementError> {
    for statement in statements {
        let started = Instant::now();
        debug!("{}", statement.sql);

        client
            .batch_execute(&statement.sql)
            .await
            .map_err(|e| ExecuteStatementError::StatementFailed(statement.label.clone(), e))?;

        info!("{} - took {}", statement.label, format_duration(started.elapsed()));
    }

    Ok(())
}
