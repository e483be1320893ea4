use std::collections::HashMap;

use tracing::debug;

use crate::Result;
use crate::dataset::Dataset;

/// Run-scoped cache of datasets keyed by identifier.
///
/// The first `fetch` for an identifier runs its loader; every later `fetch`
/// returns the same dataset without querying again, so several checks against
/// one table observe a single, query-time-consistent view.
#[derive(Debug, Default)]
pub struct TabularCache {
    datasets: HashMap<String, Dataset>,
}

impl TabularCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `identifier`, loading it on first use.
    ///
    /// A failed load caches nothing, so the next fetch tries again.
    ///
    /// # Errors
    /// Propagates the loader's error unchanged.
    pub fn fetch<F>(&mut self, identifier: &str, loader: F) -> Result<&Dataset>
    where
        F: FnOnce() -> Result<Dataset>,
    {
        if self.datasets.contains_key(identifier) {
            debug!(dataset = identifier, "cache hit");
        } else {
            debug!(dataset = identifier, "cache miss, loading");
            let dataset = loader()?;
            self.datasets.insert(identifier.to_string(), dataset);
        }
        Ok(&self.datasets[identifier])
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.datasets.contains_key(identifier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
