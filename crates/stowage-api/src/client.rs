// Registry HTTP client
//
// Wraps `reqwest::Client` with registry-specific URL construction,
// envelope unwrapping, and bearer credential management. Every endpoint
// returns the unwrapped `data` payload -- the envelope is stripped before
// the caller sees it.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Handler invoked once per failed request, before the error is
/// returned to the caller. Registered by the application composition
/// root (e.g. for global error reporting); the client never inspects
/// what the handler does.
pub type FailureInterceptor = dyn Fn(&Error) + Send + Sync;

/// Envelope every registry endpoint wraps its payload in:
/// `{ "data": <object or array> }`.
#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Error body shape for non-2xx responses: `{ "message": "..." }`.
/// The field is optional -- some proxies return bare bodies.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

const BODY_PREVIEW_LEN: usize = 200;

/// Leading slice of a response body for error messages, truncated on a
/// char boundary so multi-byte UTF-8 content never panics the slice.
fn body_preview(body: &str) -> &str {
    let mut end = body.len().min(BODY_PREVIEW_LEN);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Raw HTTP client for the registry's `/v1` API.
///
/// Owns the bearer credential shared by every resource module: the
/// session layer sets it after login and clears it on logout, and each
/// request picks up whatever is current at send time.
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: Url,
    /// Bearer token applied to every request while a session is active.
    bearer: RwLock<Option<String>>,
    /// Single extension point observing failed requests, invoked
    /// exactly once per failed response.
    interceptor: RwLock<Option<Arc<FailureInterceptor>>>,
}

impl RegistryClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the registry root (e.g. `https://registry.example.org`);
    /// the `/v1` prefix is applied per request.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            bearer: RwLock::new(None),
            interceptor: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (tests).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            bearer: RwLock::new(None),
            interceptor: RwLock::new(None),
        }
    }

    /// The registry base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Credential management ────────────────────────────────────────

    /// Set the bearer token used on all subsequent requests.
    pub fn set_bearer(&self, token: String) {
        debug!("storing bearer credential");
        *self.bearer.write().expect("bearer lock poisoned") = Some(token);
    }

    /// Remove the bearer token (logout).
    pub fn clear_bearer(&self) {
        debug!("clearing bearer credential");
        *self.bearer.write().expect("bearer lock poisoned") = None;
    }

    /// Whether a bearer token is currently configured.
    pub fn has_bearer(&self) -> bool {
        self.bearer.read().expect("bearer lock poisoned").is_some()
    }

    /// Register the failure interceptor, replacing any previous one.
    pub fn set_failure_interceptor(&self, handler: Arc<FailureInterceptor>) {
        *self.interceptor.write().expect("interceptor lock poisoned") = Some(handler);
    }

    /// Apply the stored bearer token to a request builder.
    fn apply_bearer(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.bearer.read().expect("bearer lock poisoned");
        match guard.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Funnel for failed requests: notify the interceptor once, then
    /// hand the unmodified error back.
    fn fail(&self, err: Error) -> Error {
        if let Some(handler) = self
            .interceptor
            .read()
            .expect("interceptor lock poisoned")
            .as_ref()
        {
            handler(&err);
        }
        err
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/v1/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let full = format!("{base}/v1/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("GET {}", url);

        let resp = self
            .apply_bearer(self.http.get(url))
            .send()
            .await
            .map_err(|e| self.fail(Error::Transport(e)))?;

        self.parse_envelope(resp).await
    }

    /// Send a GET request with query parameters and unwrap the envelope.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let mut url = self.api_url(path);
        url.query_pairs_mut().extend_pairs(query);
        debug!("GET {}", url);

        let resp = self
            .apply_bearer(self.http.get(url))
            .send()
            .await
            .map_err(|e| self.fail(Error::Transport(e)))?;

        self.parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("POST {}", url);

        let resp = self
            .apply_bearer(self.http.post(url).json(body))
            .send()
            .await
            .map_err(|e| self.fail(Error::Transport(e)))?;

        self.parse_envelope(resp).await
    }

    /// Send a bodyless POST request and unwrap the envelope.
    ///
    /// Some mutation endpoints (e.g. starring a container) carry all
    /// their input in the path.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("POST {}", url);

        let resp = self
            .apply_bearer(self.http.post(url))
            .send()
            .await
            .map_err(|e| self.fail(Error::Transport(e)))?;

        self.parse_envelope(resp).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("PUT {}", url);

        let resp = self
            .apply_bearer(self.http.put(url).json(body))
            .send()
            .await
            .map_err(|e| self.fail(Error::Transport(e)))?;

        self.parse_envelope(resp).await
    }

    /// Send a DELETE request and unwrap the envelope.
    ///
    /// For the few mutation endpoints that answer a delete with an
    /// authoritative replacement payload (e.g. unstarring a container
    /// returns the updated star list).
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("DELETE {}", url);

        let resp = self
            .apply_bearer(self.http.delete(url))
            .send()
            .await
            .map_err(|e| self.fail(Error::Transport(e)))?;

        self.parse_envelope(resp).await
    }

    /// Send a DELETE request, discarding any response payload.
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.api_url(path);
        debug!("DELETE {}", url);

        let resp = self
            .apply_bearer(self.http.delete(url))
            .send()
            .await
            .map_err(|e| self.fail(Error::Transport(e)))?;

        let status = resp.status();
        if status.is_success() {
            trace!("DELETE ok ({status})");
            return Ok(());
        }
        Err(self.error_from_response(resp).await)
    }

    // ── Response handling ────────────────────────────────────────────

    /// Parse the `{ data }` envelope, returning the unwrapped payload on
    /// success or a typed error otherwise. Failed responses pass through
    /// the interceptor funnel exactly once.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }

        let body = resp.text().await.map_err(|e| self.fail(Error::Transport(e)))?;

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            let preview = body_preview(&body);
            self.fail(Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            })
        })?;

        Ok(envelope.data)
    }

    /// Build a typed error from a non-2xx response and run it through
    /// the interceptor funnel.
    async fn error_from_response(&self, resp: reqwest::Response) -> Error {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| body_preview(&body).to_owned());

        let err = if status == reqwest::StatusCode::UNAUTHORIZED {
            Error::Authentication { message }
        } else {
            Error::Api {
                status: status.as_u16(),
                message,
            }
        };
        self.fail(err)
    }
}
