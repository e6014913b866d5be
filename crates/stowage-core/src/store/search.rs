// ── Search store module ──

use std::sync::Arc;

use stowage_api::{Error, RegistryClient};

use super::cache::SingleCache;
use crate::model::SearchResults;

/// State container for the registry-wide search. Holds one aggregate
/// result set rather than a list; each query replaces it.
pub struct Search {
    client: Arc<RegistryClient>,
    cache: SingleCache<SearchResults>,
}

impl Search {
    pub(crate) fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            cache: SingleCache::new(),
        }
    }

    pub fn cache(&self) -> &SingleCache<SearchResults> {
        &self.cache
    }

    /// `GET /v1/search?value=&description=`.
    ///
    /// Overlapping queries are sequenced: a slower response that lost
    /// the race against a newer query is discarded.
    pub async fn query(
        &self,
        value: &str,
        description: Option<&str>,
    ) -> Result<SearchResults, Error> {
        let mut params = vec![("value", value)];
        if let Some(description) = description {
            params.push(("description", description));
        }

        let token = self.cache.begin_fetch();
        match self
            .client
            .get_with_query::<SearchResults>("search", &params)
            .await
        {
            Ok(results) => {
                self.cache.finish_fetch(token, results.clone());
                Ok(results)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }
}
