// ── Tokens store module ──
//
// API tokens are user-scoped; every path is parameterized by the
// owning username. Tokens are addressed by id -- they have no
// human-meaningful natural key.

use std::sync::Arc;

use tracing::debug;

use stowage_api::{Error, RegistryClient};

use super::cache::ResourceCache;
use crate::model::{Identified, Token};

pub struct Tokens {
    client: Arc<RegistryClient>,
    cache: ResourceCache<Token>,
}

impl Tokens {
    pub(crate) fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache<Token> {
        &self.cache
    }

    /// `GET /v1/users/{username}/tokens` -- full cache replace.
    pub async fn list(&self, username: &str) -> Result<Vec<Token>, Error> {
        let token = self.cache.begin_fetch();
        match self
            .client
            .get::<Vec<Token>>(&format!("users/{username}/tokens"))
            .await
        {
            Ok(tokens) => {
                self.cache.finish_fetch(token, tokens.clone());
                Ok(tokens)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `POST /v1/users/{username}/tokens` -- the response carries the
    /// generated token value, shown to the user exactly once.
    pub async fn create(&self, username: &str, token: &Token) -> Result<Token, Error> {
        self.cache.start();
        match self
            .client
            .post::<Token>(&format!("users/{username}/tokens"), &token.write_payload())
            .await
        {
            Ok(created) => {
                debug!(id = %created.id, "token created");
                self.cache.upsert(created.clone());
                self.cache.succeed();
                Ok(created)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    /// `PUT /v1/users/{username}/tokens/{id}`.
    pub async fn update(&self, username: &str, token: &Token) -> Result<Token, Error> {
        self.cache.start();
        match self
            .client
            .put::<Token>(
                &format!("users/{username}/tokens/{}", token.id),
                &token.write_payload(),
            )
            .await
        {
            Ok(updated) => {
                self.cache.upsert(updated.clone());
                self.cache.succeed();
                Ok(updated)
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }

    /// `DELETE /v1/users/{username}/tokens/{id}`.
    pub async fn delete(&self, username: &str, token: &Token) -> Result<(), Error> {
        self.cache.start();
        match self
            .client
            .delete(&format!("users/{username}/tokens/{}", token.id))
            .await
        {
            Ok(()) => {
                self.cache.remove(token.id());
                self.cache.succeed();
                Ok(())
            }
            Err(err) => {
                self.cache.fail();
                Err(err)
            }
        }
    }
}
