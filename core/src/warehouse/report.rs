use tracing::info;

use crate::{
    database::postgres::client::{PostgresClient, PostgresError},
    warehouse::tables::Table,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRowCount {
    pub table: Table,
    pub rows: i64,
}

pub fn count_rows_sql(table: Table) -> String {
    format!("SELECT COUNT(*) FROM {}", table.name())
}

/// Counts the rows of every table, in creation order.
pub async fn count_table_rows(client: &PostgresClient) -> Result<Vec<TableRowCount>, PostgresError> {
    let mut counts = Vec::with_capacity(Table::CREATE_ORDER.len());

    for table in Table::CREATE_ORDER {
        let row = client.query_one(count_rows_sql(table).as_str(), &[]).await?;
        let rows: i64 = row.get(0);
        info!("{} has {} rows", table, rows);
        counts.push(TableRowCount { table, rows });
    }

    Ok(counts)
}
