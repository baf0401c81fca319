//! Composition root: containers, API client, and navigation.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::app::{Navigation, Route, Storefront};
//! use shopfront_storefront::config::StorefrontConfig;
//!
//! let storefront = Storefront::from_config(&StorefrontConfig::from_env()?)?;
//!
//! let page = storefront
//!     .navigate(&Navigation::new(Route::Home).with_session("session=abc"))
//!     .await?;
//! ```

use std::sync::Arc;

use secrecy::SecretString;
use shopfront_core::{Order, Product, ProductId};
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::error::{PageError, add_breadcrumb, capture_page_error};
use crate::loaders::{
    LayoutLoader, Load, LoadEvent, OrderHistoryLoader, ProductListLoader, ProductLoader,
};
use crate::storage::{FileStorage, Storage};
use crate::stores::{AuthStore, CartState, CartStore};

/// A page of the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Catalogue at `/`.
    Home,
    /// Product detail at `/product/{id}`.
    Product {
        /// Product shown on the page.
        id: ProductId,
    },
    /// Order history at `/dashboard/orders`.
    Orders,
    /// Cart at `/cart`. Rendered from the cart container, no page loader.
    Cart,
}

impl Route {
    /// URL path of the route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Product { id } => format!("/product/{}", urlencoding::encode(id.as_str())),
            Self::Orders => "/dashboard/orders".to_string(),
            Self::Cart => "/cart".to_string(),
        }
    }
}

/// One navigation: where to go and the visitor's session cookie.
#[derive(Debug)]
pub struct Navigation {
    /// Target page.
    pub route: Route,
    /// `Cookie` header value of the visitor, if any.
    pub session: Option<SecretString>,
}

impl Navigation {
    /// Anonymous navigation to `route`.
    #[must_use]
    pub const fn new(route: Route) -> Self {
        Self {
            route,
            session: None,
        }
    }

    /// Attach the visitor's session cookie.
    #[must_use]
    pub fn with_session(mut self, cookie: impl Into<String>) -> Self {
        self.session = Some(SecretString::from(cookie.into()));
        self
    }
}

/// Data a page renders with.
#[derive(Debug, Clone, PartialEq)]
pub enum PageData {
    /// Catalogue.
    Home(Vec<Product>),
    /// Product detail.
    Product(Product),
    /// Order history.
    Orders(Vec<Order>),
    /// Cart contents at the time of navigation.
    Cart(CartState),
}

/// The storefront client.
///
/// This struct is cheaply cloneable via `Arc`; clones share the containers
/// and the API connection pool.
#[derive(Clone, Debug)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

#[derive(Debug)]
struct StorefrontInner {
    api: ApiClient,
    auth: AuthStore,
    cart: CartStore,
}

impl Storefront {
    /// Create the storefront with the cart persisted in `storage`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let cart = CartStore::hydrate(storage);

        Ok(Self {
            inner: Arc::new(StorefrontInner {
                api,
                auth: AuthStore::new(),
                cart,
            }),
        })
    }

    /// Create the storefront with file storage under `config.storage_dir`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ApiError> {
        Self::new(config, Arc::new(FileStorage::new(config.storage_dir.clone())))
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the auth container.
    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.inner.auth
    }

    /// Get a reference to the cart container.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Run the layout loader, then the page loader for `navigation.route`.
    ///
    /// The auth container reflects the layout's outcome before the page loader
    /// starts. Server errors are reported to Sentry.
    ///
    /// # Errors
    ///
    /// Returns the page loader's `PageError`. The layout loader never fails.
    #[instrument(skip_all, fields(path = %navigation.route.path()))]
    pub async fn navigate(&self, navigation: &Navigation) -> Result<PageData, PageError> {
        let path = navigation.route.path();
        add_breadcrumb("navigation", "Navigated", Some(&[("path", path.as_str())]));

        let event = LoadEvent::new(self.api(), self.auth()).with_session(navigation.session.as_ref());

        LayoutLoader.load(&event).await?;

        let result = match &navigation.route {
            Route::Home => ProductListLoader.load(&event).await.map(PageData::Home),
            Route::Product { id } => ProductLoader::new(id.clone())
                .load(&event)
                .await
                .map(PageData::Product),
            Route::Orders => OrderHistoryLoader.load(&event).await.map(PageData::Orders),
            Route::Cart => Ok(PageData::Cart(self.cart().snapshot())),
        };

        match &result {
            Ok(_) => debug!("Page data loaded"),
            Err(e) => {
                if capture_page_error(e, &path).is_none() {
                    debug!(status = %e.status(), "Page load failed");
                }
            }
        }

        result
    }
}
