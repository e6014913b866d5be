// ── Passkeys store module ──
//
// Enrollment runs through the browser's WebAuthn ceremony; this layer
// only lists and revokes credentials on the current user's account.

use std::sync::Arc;

use stowage_api::{Error, RegistryClient};

use super::cache::ResourceCache;
use crate::model::{Identified, Passkey};

pub struct Passkeys {
    client: Arc<RegistryClient>,
    cache: ResourceCache<Passkey>,
}

impl Passkeys {
    pub(crate) fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache<Passkey> {
        &self.cache
    }

    /// `GET /v1/users/{username}/passkeys` -- full cache replace.
    pub async fn list(&self, username: &str) -> Result<Vec<Passkey>, Error> {
        let token = self.cache.begin_fetch();
        match self
            .client
            .get::<Vec<Passkey>>(&format!("users/{username}/passkeys"))
            .await
        {
            Ok(passkeys) => {
                self.cache.finish_fetch(token, passkeys.clone());
                Ok(passkeys)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }

    /// `DELETE /v1/users/{username}/passkeys/{id}`.
    pub async fn delete(&self, username: &str, passkey: &Passkey) -> Result<(), Error> {
        self.cache.start();
        match self
            .client
            .delete(&format!("users/{username}/passkeys/{}", passkey.id))
            .await
        {
            Ok(()) => {
                self.cache.remove(passkey.id());
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
