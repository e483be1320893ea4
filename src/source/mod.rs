//! Data sources that checks read datasets from.
//!
//! A [`Connector`] opens a fresh [`DataSource`] for each dataset load. The
//! source is dropped as soon as the load finishes, so connections never
//! outlive the step that needed them.

mod fixture;
mod postgres;

pub use fixture::{FixtureConnector, FixtureSource};
pub use postgres::{DATABASE_URL_ENV, PostgresConnector, PostgresSource};

use crate::Result;
use crate::dataset::Dataset;

/// A live connection able to run a query.
pub trait DataSource {
    /// Execute `sql` and return the full result set, column-oriented.
    ///
    /// # Errors
    /// Returns a `Query` error if the query fails.
    fn execute_query(&mut self, sql: &str) -> Result<Dataset>;
}

/// Opens data source connections.
pub trait Connector {
    /// Open a new connection.
    ///
    /// # Errors
    /// Returns a `Query` error if the connection cannot be established.
    fn connect(&self) -> Result<Box<dyn DataSource>>;
}

/// Query used to materialize a whole table.
#[must_use]
pub fn table_query(table: &str) -> String {
    format!("SELECT * FROM {table}")
}
