use postgres::{Row, types::FromSqlOwned};

/// One row of a grammar's list-tables query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub schema: String,
    /// Total relation size in bytes, `-1` where the dialect does not expose it.
    pub size: i64,
    pub comment: Option<String>,
}

pub fn decode_table_row(row: &Row) -> Result<TableInfo, postgres::Error> {
    Ok(TableInfo {
        name: row_value(row, "name")?,
        schema: row_value(row, "schema")?,
        size: row_value(row, "size")?,
        comment: row_value(row, "comment")?,
    })
}

fn row_value<T>(row: &Row, column: &str) -> Result<T, postgres::Error>
where
    T: FromSqlOwned,
{
    row.try_get(column)
}
