//! SQLite-backed tool source: schema metadata and read-only query execution.
//!
//! `fetch_metadata_as_json` describes every column of every user table (with primary
//! and foreign key constraints); `execute_sql` runs one statement on a read-only
//! connection and returns the rows as JSON. Blocking work runs on `spawn_blocking`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{params, Batch, Connection, OpenFlags};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::{
    ToolCallContent, ToolSource, ToolSourceError, ToolSpec, TOOL_EXECUTE_SQL, TOOL_FETCH_METADATA,
};

/// Rows returned by `execute_sql` before the result is marked truncated.
pub const DEFAULT_ROW_LIMIT: usize = 200;

fn storage_err(e: impl std::fmt::Display) -> ToolSourceError {
    ToolSourceError::Execution(e.to_string())
}

fn fetch_metadata_spec() -> ToolSpec {
    ToolSpec {
        name: TOOL_FETCH_METADATA.to_string(),
        description: Some(
            "Fetch database metadata as a JSON list: one record per column with schema_name, \
             table_name, column_name, data_type, column_description, constraint_name and \
             constraint_type. Optionally restrict to one table."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "table_name": { "type": "string", "description": "Only describe this table (optional)" }
            }
        }),
    }
}

fn execute_sql_spec() -> ToolSpec {
    ToolSpec {
        name: TOOL_EXECUTE_SQL.to_string(),
        description: Some(
            "Execute a single read-only SQL query and return columns and rows as JSON.".to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "One SELECT statement" }
            },
            "required": ["query"]
        }),
    }
}

/// Tool source over one SQLite database file.
///
/// **Interaction**: Offered to `data_gather_information` (metadata), `sql_generation`
/// (metadata) and `sql_execution` (execute_sql) by the pipeline.
pub struct SqliteToolSource {
    db_path: PathBuf,
    row_limit: usize,
}

impl SqliteToolSource {
    /// Opens (read-only) `path` once to check it is a usable database.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ToolSourceError> {
        let db_path = path.as_ref().to_path_buf();
        Connection::open_with_flags(&db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(storage_err)?;
        Ok(Self {
            db_path,
            row_limit: DEFAULT_ROW_LIMIT,
        })
    }

    /// Maximum rows returned by one `execute_sql` call.
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }

    fn open(db_path: &Path) -> Result<Connection, ToolSourceError> {
        Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(storage_err)
    }

    fn metadata(db_path: &Path, only_table: Option<&str>) -> Result<Value, ToolSourceError> {
        let conn = Self::open(db_path)?;
        let mut tables_stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .map_err(storage_err)?;
        let tables: Vec<String> = tables_stmt
            .query_map([], |row| row.get(0))
            .map_err(storage_err)?
            .collect::<Result<_, _>>()
            .map_err(storage_err)?;

        let mut columns_stmt = conn
            .prepare("SELECT name, type, pk FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(storage_err)?;
        let mut fks_stmt = conn
            .prepare("SELECT \"from\" FROM pragma_foreign_key_list(?1)")
            .map_err(storage_err)?;

        let mut records = Vec::new();
        for table in tables.iter().filter(|t| only_table.map_or(true, |o| o == t.as_str())) {
            let foreign_keys: Vec<String> = fks_stmt
                .query_map(params![table], |row| row.get(0))
                .map_err(storage_err)?
                .collect::<Result<_, _>>()
                .map_err(storage_err)?;
            let columns: Vec<(String, String, i64)> = columns_stmt
                .query_map(params![table], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
                .map_err(storage_err)?
                .collect::<Result<_, _>>()
                .map_err(storage_err)?;

            for (column, data_type, pk) in columns {
                let (constraint_name, constraint_type) = if pk > 0 {
                    (json!(format!("{}_pkey", table)), json!("PRIMARY KEY"))
                } else if foreign_keys.contains(&column) {
                    (json!(format!("{}_{}_fkey", table, column)), json!("FOREIGN KEY"))
                } else {
                    (Value::Null, Value::Null)
                };
                records.push(json!({
                    "schema_name": "main",
                    "table_name": table,
                    "column_name": column,
                    "data_type": data_type,
                    "column_description": Value::Null,
                    "constraint_name": constraint_name,
                    "constraint_type": constraint_type,
                }));
            }
        }
        Ok(Value::Array(records))
    }

    fn execute(db_path: &Path, query: &str, row_limit: usize) -> Result<Value, ToolSourceError> {
        let sql = query.trim().trim_end_matches(';').trim();
        if sql.is_empty() {
            return Err(ToolSourceError::InvalidInput("empty query".into()));
        }

        let conn = Self::open(db_path)?;
        // Statement boundaries come from SQLite's parser, so `;` inside literals is fine.
        let mut batch = Batch::new(&conn, sql);
        let mut stmt = batch
            .next()
            .map_err(storage_err)?
            .ok_or_else(|| ToolSourceError::InvalidInput("empty query".into()))?;
        if !matches!(batch.next(), Ok(None)) {
            return Err(ToolSourceError::InvalidInput(
                "only a single statement is allowed".into(),
            ));
        }
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows_out = Vec::new();
        let mut truncated = false;
        let mut rows = stmt.query([]).map_err(storage_err)?;
        while let Some(row) = rows.next().map_err(storage_err)? {
            if rows_out.len() == row_limit {
                truncated = true;
                break;
            }
            let mut obj = Map::new();
            for (i, name) in columns.iter().enumerate() {
                let value = match row.get_ref(i).map_err(storage_err)? {
                    ValueRef::Null => Value::Null,
                    ValueRef::Integer(n) => json!(n),
                    ValueRef::Real(f) => serde_json::Number::from_f64(f)
                        .map(Value::Number)
                        .unwrap_or(Value::Null),
                    ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
                    ValueRef::Blob(b) => Value::String(format!("<blob {} bytes>", b.len())),
                };
                obj.insert(name.clone(), value);
            }
            rows_out.push(Value::Object(obj));
        }

        Ok(json!({
            "columns": columns,
            "rows": rows_out,
            "truncated": truncated,
        }))
    }
}

#[async_trait]
impl ToolSource for SqliteToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(vec![fetch_metadata_spec(), execute_sql_spec()])
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let db_path = self.db_path.clone();
        let row_limit = self.row_limit;
        let value = match name {
            TOOL_FETCH_METADATA => {
                let only_table = arguments
                    .get("table_name")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                tokio::task::spawn_blocking(move || Self::metadata(&db_path, only_table.as_deref()))
                    .await
                    .map_err(storage_err)??
            }
            TOOL_EXECUTE_SQL => {
                let query = arguments
                    .get("query")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ToolSourceError::InvalidInput("missing 'query'".into()))?
                    .to_string();
                debug!(query = %query, "Executing SQL");
                tokio::task::spawn_blocking(move || Self::execute(&db_path, &query, row_limit))
                    .await
                    .map_err(storage_err)??
            }
            other => return Err(ToolSourceError::NotFound(other.to_string())),
        };
        Ok(ToolCallContent {
            text: value.to_string(),
        })
    }
}
