use std::sync::Arc;

use reqwest::header::{ACCEPT, COOKIE};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use shopfront_core::{Order, Product, ProductId, ProfileResponse};
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, Credentials};
use crate::config::ApiConfig;

const BODY_PREVIEW_CHARS: usize = 500;

/// Client for the storefront API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL endpoint paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an absolute endpoint path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if `path` cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// GET `path` and decode a success body as `T`.
    ///
    /// With `Credentials::Include` the session cookie, if any, is sent in the
    /// `Cookie` header.
    ///
    /// # Errors
    ///
    /// - `ApiError::Status` for any non-2xx response (the body is not decoded)
    /// - `ApiError::Http` for transport failures and timeouts
    /// - `ApiError::Parse` if a success body does not decode as `T`
    #[instrument(skip(self, session))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        credentials: Credentials,
        session: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;

        let mut request = self
            .inner
            .client
            .get(url)
            .header(ACCEPT, "application/json");
        if credentials == Credentials::Include
            && let Some(cookie) = session
        {
            request = request.header(COOKIE, cookie.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            // The body is diagnostics only; failing to read it keeps the status.
            let body = response.text().await.unwrap_or_default();
            debug!(
                status = %status,
                body = %preview(&body),
                "API returned non-success status"
            );
            return Err(ApiError::Status { status, body });
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                error = %e,
                body = %preview(&body),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    /// The session's user profile.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn profile(&self, session: Option<&SecretString>) -> Result<ProfileResponse, ApiError> {
        self.get_json("/api/auth/profile", Credentials::Include, session)
            .await
    }

    /// The product catalogue.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/api/products", Credentials::Omit, None).await
    }

    /// A single product. The id is percent-encoded into the path.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let path = product_path(id);
        self.get_json(&path, Credentials::Omit, None).await
    }

    /// The session user's order history.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn orders(&self, session: Option<&SecretString>) -> Result<Vec<Order>, ApiError> {
        self.get_json("/api/user/orders", Credentials::Include, session)
            .await
    }
}

fn product_path(id: &ProductId) -> String {
    format!("/api/products/{}", urlencoding::encode(id.as_str()))
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig::with_base_url(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_absolute_path() {
        let api = client("http://localhost:3000");
        assert_eq!(
            api.endpoint("/api/products").unwrap().as_str(),
            "http://localhost:3000/api/products"
        );
    }

    #[test]
    fn test_endpoint_ignores_base_path() {
        let api = client("https://shop.example.com/app/");
        assert_eq!(
            api.endpoint("/api/user/orders").unwrap().as_str(),
            "https://shop.example.com/api/user/orders"
        );
    }

    #[test]
    fn test_product_path_is_percent_encoded() {
        assert_eq!(product_path(&ProductId::new("42")), "/api/products/42");
        assert_eq!(
            product_path(&ProductId::new("a b/c")),
            "/api/products/a%20b%2Fc"
        );
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let body = "é".repeat(BODY_PREVIEW_CHARS + 10);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_debug_shows_base_url_only() {
        let api = client("http://localhost:3000");
        let debug = format!("{api:?}");
        assert!(debug.contains("http://localhost:3000/"));
    }
}
