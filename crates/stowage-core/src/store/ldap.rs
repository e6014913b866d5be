// ── LDAP store module (admin view) ──

use std::sync::Arc;

use stowage_api::{Error, RegistryClient};

use super::cache::SingleCache;
use crate::model::LdapStatus;

/// State container for the admin directory-sync status panel.
pub struct Ldap {
    client: Arc<RegistryClient>,
    cache: SingleCache<LdapStatus>,
}

impl Ldap {
    pub(crate) fn new(client: Arc<RegistryClient>) -> Self {
        Self {
            client,
            cache: SingleCache::new(),
        }
    }

    pub fn cache(&self) -> &SingleCache<LdapStatus> {
        &self.cache
    }

    /// `GET /v1/ldap/status`.
    pub async fn status(&self) -> Result<LdapStatus, Error> {
        let token = self.cache.begin_fetch();
        match self.client.get::<LdapStatus>("ldap/status").await {
            Ok(status) => {
                self.cache.finish_fetch(token, status.clone());
                Ok(status)
            }
            Err(err) => {
                self.cache.fail_fetch(token);
                Err(err)
            }
        }
    }
}
