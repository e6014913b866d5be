// ── Session lifecycle and module composition ──
//
// `Registry` is the application context object: it owns the single
// transport client, the session state (bearer token + current user),
// and one instance of every resource store module. It is explicitly
// constructed and passed by reference -- there is no ambient global, so
// tests and multi-tenant hosts can run independent sessions side by
// side.

pub mod persist;

use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, warn};

use stowage_api::{Error, FailureInterceptor, RegistryClient};

use crate::config::RegistryConfig;
use crate::model::User;
use crate::store::{
    Collections, Containers, Entities, Groups, Images, Ldap, Manifests, Passkeys,
    ResolveCollection, ResourceStatus, Search, Tokens, Users,
};
use persist::{CredentialStore, PersistedSession};

/// Response of `POST /v1/get-token`: the bearer token together with
/// the authenticated account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginGrant {
    token: String,
    user: User,
}

/// Response of `POST /v1/get-download-token`: a short-lived pull
/// credential and the location it is valid for.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGrant {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// The root aggregator: session lifecycle plus one instance of every
/// resource store module, all sharing one [`RegistryClient`].
pub struct Registry {
    client: Arc<RegistryClient>,
    credentials: Arc<dyn CredentialStore>,
    auth_status: watch::Sender<ResourceStatus>,
    current_user: RwLock<Option<User>>,

    users: Users,
    tokens: Tokens,
    entities: Entities,
    collections: Arc<Collections>,
    containers: Containers,
    groups: Groups,
    images: Images,
    manifests: Manifests,
    search: Search,
    ldap: Ldap,
    passkeys: Passkeys,
}

impl Registry {
    /// Build a registry context from configuration.
    ///
    /// Reads any persisted session from the credential store: when a
    /// token exists, the client sends it as a bearer credential from
    /// the first request on.
    pub fn new(
        config: &RegistryConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, Error> {
        let client = Arc::new(RegistryClient::new(
            config.url.clone(),
            &config.transport(),
        )?);
        Ok(Self::assemble(client, credentials))
    }

    /// Build a registry context around a pre-built client (tests,
    /// shared transports).
    pub fn with_client(client: Arc<RegistryClient>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self::assemble(client, credentials)
    }

    fn assemble(client: Arc<RegistryClient>, credentials: Arc<dyn CredentialStore>) -> Self {
        let persisted = credentials.load();
        if let Some(session) = &persisted {
            debug!(username = %session.user.username, "resuming persisted session");
            client.set_bearer(session.token.clone());
        }
        let (auth_status, _) = watch::channel(ResourceStatus::Idle);

        let collections = Arc::new(Collections::new(Arc::clone(&client)));
        let resolver: Arc<dyn ResolveCollection> = collections.clone();

        Self {
            users: Users::new(Arc::clone(&client)),
            tokens: Tokens::new(Arc::clone(&client)),
            entities: Entities::new(Arc::clone(&client)),
            containers: Containers::new(Arc::clone(&client), resolver),
            groups: Groups::new(Arc::clone(&client)),
            images: Images::new(Arc::clone(&client)),
            manifests: Manifests::new(Arc::clone(&client)),
            search: Search::new(Arc::clone(&client)),
            ldap: Ldap::new(Arc::clone(&client)),
            passkeys: Passkeys::new(Arc::clone(&client)),
            collections,
            current_user: RwLock::new(persisted.map(|s| s.user)),
            auth_status,
            client,
            credentials,
        }
    }

    // ── Module accessors ─────────────────────────────────────────────

    pub fn users(&self) -> &Users {
        &self.users
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn containers(&self) -> &Containers {
        &self.containers
    }

    pub fn groups(&self) -> &Groups {
        &self.groups
    }

    pub fn images(&self) -> &Images {
        &self.images
    }

    pub fn manifests(&self) -> &Manifests {
        &self.manifests
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn ldap(&self) -> &Ldap {
        &self.ldap
    }

    pub fn passkeys(&self) -> &Passkeys {
        &self.passkeys
    }

    /// The shared transport client.
    pub fn client(&self) -> &Arc<RegistryClient> {
        &self.client
    }

    // ── Session state ────────────────────────────────────────────────

    /// Status of the most recently settled auth call.
    pub fn auth_status(&self) -> ResourceStatus {
        *self.auth_status.borrow()
    }

    pub fn subscribe_auth_status(&self) -> watch::Receiver<ResourceStatus> {
        self.auth_status.subscribe()
    }

    /// Snapshot of the authenticated account.
    pub fn current_user(&self) -> Option<User> {
        self.current_user.read().expect("session lock poisoned").clone()
    }

    /// Derived getter: a session counts as logged in only when a
    /// current-user record is present -- a stale token without a
    /// resolved user does not.
    pub fn is_logged_in(&self) -> bool {
        self.current_user
            .read()
            .expect("session lock poisoned")
            .is_some()
    }

    /// Register the global failure interceptor: invoked exactly once
    /// per failed response, before the error reaches the caller.
    pub fn register_interceptor(&self, handler: Arc<FailureInterceptor>) {
        self.client.set_failure_interceptor(handler);
    }

    // ── Auth lifecycle ───────────────────────────────────────────────

    /// `POST /v1/get-token`: authenticate and open a session.
    ///
    /// On success the token and user snapshot are persisted, the
    /// client's bearer credential is configured, and per-user module
    /// caches are reset so nothing from a previous session leaks into
    /// this one. On failure any persisted session is cleared.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<User, Error> {
        self.auth_status.send_replace(ResourceStatus::Loading);
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        match self.client.post::<LoginGrant>("get-token", &body).await {
            Ok(grant) => {
                debug!(username = %grant.user.username, "login successful");
                self.client.set_bearer(grant.token.clone());
                if let Err(e) = self.credentials.store(&PersistedSession {
                    token: grant.token,
                    user: grant.user.clone(),
                }) {
                    warn!(error = %e, "failed to persist session (non-fatal)");
                }
                *self.current_user.write().expect("session lock poisoned") =
                    Some(grant.user.clone());
                self.users.reset_user_state();
                self.auth_status.send_replace(ResourceStatus::Success);
                Ok(grant.user)
            }
            Err(err) => {
                self.clear_session();
                self.auth_status.send_replace(ResourceStatus::Failed);
                Err(err)
            }
        }
    }

    /// End the session: clear session state, persisted credentials,
    /// the bearer header, and per-user caches. Cannot fail.
    pub fn logout(&self) {
        debug!("logging out");
        self.clear_session();
        self.auth_status.send_replace(ResourceStatus::Idle);
    }

    fn clear_session(&self) {
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "failed to clear persisted session (non-fatal)");
        }
        self.client.clear_bearer();
        *self.current_user.write().expect("session lock poisoned") = None;
        self.users.reset_user_state();
    }

    // ── Download tokens ──────────────────────────────────────────────

    /// `POST /v1/get-download-token`: a short-lived pull credential for
    /// the given resource.
    pub async fn request_download_token(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<DownloadGrant, Error> {
        let body = json!({ "type": resource_type, "id": id });
        self.client.post::<DownloadGrant>("get-download-token", &body).await
    }
}
