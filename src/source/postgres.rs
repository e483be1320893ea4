use indexmap::IndexMap;
use tokio::runtime::{Builder, Runtime};
use tokio_postgres::{Client, NoTls, Row, Statement};
use tracing::{debug, warn};

use crate::dataset::{Dataset, Value};
use crate::{Result, SnapcheckError};

use super::{Connector, DataSource};

/// Environment variable consulted when no connection string is configured.
pub const DATABASE_URL_ENV: &str = "SNAPCHECK_DATABASE_URL";

/// Opens [`PostgresSource`]s for a connection string.
///
/// Without an explicit string, `$SNAPCHECK_DATABASE_URL` is read on every
/// connect.
#[derive(Debug, Clone, Default)]
pub struct PostgresConnector {
    url: Option<String>,
}

impl PostgresConnector {
    #[must_use]
    pub const fn new(url: Option<String>) -> Self {
        Self { url }
    }

    fn resolve_url(&self) -> Result<String> {
        self.url
            .clone()
            .or_else(|| std::env::var(DATABASE_URL_ENV).ok())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                SnapcheckError::query(
                    "connect",
                    format!("no connection string: set source.url or ${DATABASE_URL_ENV}"),
                )
            })
    }
}

impl Connector for PostgresConnector {
    fn connect(&self) -> Result<Box<dyn DataSource>> {
        Ok(Box::new(PostgresSource::connect(&self.resolve_url()?)?))
    }
}

/// A single Postgres connection driven by its own current-thread runtime.
///
/// The connection closes when the source is dropped.
pub struct PostgresSource {
    runtime: Runtime,
    client: Client,
}

impl PostgresSource {
    /// Connect to `url`.
    ///
    /// # Errors
    /// Returns a `Query` error if the runtime cannot start or the server
    /// refuses the connection.
    pub fn connect(url: &str) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SnapcheckError::query("connect", e))?;

        let (client, connection) = runtime
            .block_on(tokio_postgres::connect(url, NoTls))
            .map_err(|e| SnapcheckError::query("connect", e))?;
        runtime.spawn(async move {
            if let Err(e) = connection.await {
                warn!("Postgres connection error: {e}");
            }
        });
        debug!("Postgres connection established");

        Ok(Self { runtime, client })
    }
}

impl PostgresSource {
    fn prepare(&self, sql: &str, text: &str) -> Result<Statement> {
        self.runtime
            .block_on(self.client.prepare(text))
            .map_err(|e| SnapcheckError::query(sql, e))
    }
}

impl DataSource for PostgresSource {
    fn execute_query(&mut self, sql: &str) -> Result<Dataset> {
        let mut statement = self.prepare(sql, sql)?;
        let mut columns: IndexMap<String, Vec<Value>> = IndexMap::new();
        for column in statement.columns() {
            if columns.insert(column.name().to_string(), Vec::new()).is_some() {
                return Err(SnapcheckError::query(
                    sql,
                    format!("duplicate column name '{}'; alias it in the query", column.name()),
                ));
            }
        }

        let wrapped = with_text_casts(
            sql,
            statement
                .columns()
                .iter()
                .map(|c| (c.name(), c.type_().name())),
        );
        if let Some(wrapped) = wrapped {
            debug!(sql, "reading columns without a native decoding as text");
            statement = self.prepare(sql, &wrapped)?;
        }

        let rows = self
            .runtime
            .block_on(self.client.query(&statement, &[]))
            .map_err(|e| SnapcheckError::query(sql, e))?;
        debug!(sql, rows = rows.len(), "query executed");

        for row in &rows {
            for (idx, values) in columns.values_mut().enumerate() {
                values.push(decode(row, idx).map_err(|e| SnapcheckError::query(sql, e))?);
            }
        }
        Dataset::new(sql, columns)
    }
}

/// Postgres types decoded directly into a [`Value`].
const NATIVE_TYPES: &[&str] = &[
    "bool", "int2", "int4", "int8", "oid", "float4", "float8", "text", "varchar", "bpchar",
    "name", "unknown",
];

/// Wrap `sql` so every column of a type outside [`NATIVE_TYPES`] comes back
/// as its Postgres text rendering. Returns `None` when no column needs it.
fn with_text_casts<'a>(
    sql: &str,
    columns: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Option<String> {
    let mut needs_cast = false;
    let list: Vec<String> = columns
        .into_iter()
        .map(|(name, type_name)| {
            let quoted = quote_ident(name);
            if NATIVE_TYPES.contains(&type_name) {
                quoted
            } else {
                needs_cast = true;
                format!("{quoted}::text AS {quoted}")
            }
        })
        .collect();
    if !needs_cast {
        return None;
    }
    let inner = sql.trim().trim_end_matches(';').trim_end();
    Some(format!(
        "SELECT {} FROM ({inner}) AS snapcheck_source",
        list.join(", ")
    ))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

type DecodeError = Box<dyn std::error::Error + Send + Sync>;

fn decode(row: &Row, idx: usize) -> std::result::Result<Value, DecodeError> {
    let column = &row.columns()[idx];
    let value = match column.type_().name() {
        "bool" => row.try_get::<_, Option<bool>>(idx)?.map(|b| Value::Int(i64::from(b))),
        "int2" => row.try_get::<_, Option<i16>>(idx)?.map(|i| Value::Int(i64::from(i))),
        "int4" => row.try_get::<_, Option<i32>>(idx)?.map(|i| Value::Int(i64::from(i))),
        "int8" => row.try_get::<_, Option<i64>>(idx)?.map(Value::Int),
        "oid" => row.try_get::<_, Option<u32>>(idx)?.map(|i| Value::Int(i64::from(i))),
        "float4" => row.try_get::<_, Option<f32>>(idx)?.map(|f| Value::Float(f64::from(f))),
        "float8" => row.try_get::<_, Option<f64>>(idx)?.map(Value::Float),
        "text" | "varchar" | "bpchar" | "name" | "unknown" => {
            row.try_get::<_, Option<String>>(idx)?.map(Value::Text)
        }
        other => {
            return Err(format!("column '{}' has undecodable type {other}", column.name()).into());
        }
    };
    Ok(value.unwrap_or(Value::Null))
}

#[cfg(test)]
#[path = "postgres_tests.rs"]
mod tests;
