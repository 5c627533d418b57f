//! Authenticated HTTP client for the Spark Canvas API.
//!
//! Every outbound call goes through [`ApiClient`], which:
//!
//! 1. Resolves the relative path against the configured base URL
//! 2. Applies default headers, per-call overrides, and the request timeout
//! 3. Sets `Authorization: Bearer <token>` when the session holds a token
//! 4. On a 401, clears the session and notifies the unauthorized hook
//! 5. Returns the decoded body, or an [`ApiError`] carrying the server message

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, server_message};
use crate::navigation::{Unauthorized, UnauthorizedHandler};
use crate::session::Session;

/// Per-call header overrides.
///
/// Overrides replace the client's default header of the same name. The
/// `Authorization` header is always derived from the session and cannot be
/// overridden here.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: HeaderMap,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a header from strings.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the name or value is not a valid header.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, ApiError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidRequest(format!("header {name}: {e}")))?;
        Ok(self.header(name, value))
    }
}

/// Spark Canvas API client.
///
/// Cheap to clone; clones share the connection pool, session, and hook.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    /// `None` outside a session-capable host: requests go out unauthenticated
    session: Option<Session>,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    config: ClientConfig,
    session: Option<Session>,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl ApiClientBuilder {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            session: None,
            on_unauthorized: None,
        }
    }

    /// Session the client reads the token from and clears on 401.
    #[must_use]
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Hook invoked once per 401 response, after the session is cleared.
    #[must_use]
    pub fn on_unauthorized(mut self, handler: impl UnauthorizedHandler + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(handler));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the HTTP client cannot be created.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let http = reqwest::Client::builder()
            .default_headers(self.config.default_headers)
            .timeout(self.config.request_timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: self.config.base_url,
                timeout: self.config.request_timeout,
                session: self.session,
                on_unauthorized: self.on_unauthorized,
            }),
        })
    }
}

impl ApiClient {
    /// Start building a client from configuration.
    #[must_use]
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.inner.session.as_ref()
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// `GET` a path and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on network failure, timeout, error status, or an
    /// undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None, RequestOptions::default())
            .await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on network failure, timeout, error status, or an
    /// undecodable body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body), RequestOptions::default())
            .await
    }

    /// `PUT` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on network failure, timeout, error status, or an
    /// undecodable body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body), RequestOptions::default())
            .await
    }

    /// `PATCH` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on network failure, timeout, error status, or an
    /// undecodable body.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body), RequestOptions::default())
            .await
    }

    /// `DELETE` a path. An empty response body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on network failure, timeout, error status, or an
    /// undecodable body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, path, None, RequestOptions::default())
            .await
    }

    /// Send a request with an optional JSON body and per-call header overrides.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on network failure, timeout, error status, or an
    /// undecodable body.
    #[instrument(skip(self, body, options))]
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(method, path, options, |builder| match body {
            Some(body) => builder.json(body),
            None => builder,
        })
        .await
    }

    /// `POST` a `multipart/form-data` body.
    ///
    /// The form's own `Content-Type` (with boundary) replaces the JSON default.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on network failure, timeout, error status, or an
    /// undecodable body.
    #[instrument(skip(self, form, options))]
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.execute(Method::POST, path, options, |builder| builder.multipart(form))
            .await
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
        attach_body: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<T, ApiError> {
        let url = self.resolve(path)?;

        let builder = self.inner.http.request(method.clone(), url);
        let mut request = attach_body(builder)
            .headers(options.headers)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        self.authorize(&mut request);

        let response = self
            .inner
            .http
            .execute(request)
            .await
            .map_err(|e| ApiError::from_transport(e, self.inner.timeout))?;

        self.handle_response(&method, path, response).await
    }

    /// Resolve a relative path against the base URL.
    ///
    /// Absolute URLs are rejected so the bearer token never leaves the API host.
    fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        let route = path.split_once(['?', '#']).map_or(path, |(route, _)| route);
        if route.contains("://") || route.starts_with("//") {
            return Err(ApiError::InvalidRequest(format!(
                "expected a path relative to the API base, got {path:?}"
            )));
        }

        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| ApiError::InvalidRequest(format!("invalid path {path:?}: {e}")))
    }

    /// Set the bearer token from the session, if there is one.
    ///
    /// A missing session, missing token, or unreadable store leaves the
    /// request unauthenticated rather than failing it.
    fn authorize(&self, request: &mut reqwest::Request) {
        request.headers_mut().remove(AUTHORIZATION);

        let Some(session) = &self.inner.session else {
            return;
        };

        match session.token() {
            Ok(Some(token)) => {
                match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
                    Ok(mut value) => {
                        value.set_sensitive(true);
                        request.headers_mut().insert(AUTHORIZATION, value);
                    }
                    Err(_) => warn!("Stored token is not a valid header value, sending unauthenticated"),
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read session token, sending unauthenticated"),
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ApiError::from_transport(e, self.inner.timeout))?;
            debug!(status = %status, bytes = bytes.len(), "API response");

            let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
                b"null"
            } else {
                &bytes
            };
            return serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body);

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(method, path, message.as_deref());
        } else {
            debug!(status = %status, message = ?message, "API error response");
        }

        Err(ApiError::Status { status, message })
    }

    /// Clear the session and notify the hook. Runs once per 401 response.
    fn handle_unauthorized(&self, method: &Method, path: &str, message: Option<&str>) {
        if let Some(session) = &self.inner.session {
            match session.clear() {
                Ok(()) => warn!("Session rejected by server, stored credentials cleared"),
                Err(e) => warn!(error = %e, "Session rejected by server, failed to clear credentials"),
            }
        }

        if let Some(handler) = &self.inner.on_unauthorized {
            handler.on_unauthorized(&Unauthorized {
                method,
                path,
                message,
            });
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .field("session", &self.inner.session)
            .field("on_unauthorized", &self.inner.on_unauthorized.is_some())
            .finish_non_exhaustive()
    }
}
