//! Backend API client.
//!
//! # Architecture
//!
//! - The remote backend owns all persistent state - products, carts, orders,
//!   custom stickers, profiles, and roles. NO local database, direct API
//!   calls over JSON REST.
//! - In-memory caching via `moka` for read responses (5 minute TTL as a
//!   staleness backstop); every mutation explicitly invalidates the cached
//!   reads it could have changed (see [`Mutation`]).
//! - Caller-scoped calls forward the session identity in headers; the
//!   backend enforces authenticity and authorization on every request.
//!
//! # Fail-closed reads
//!
//! Two reads swallow errors into safe defaults instead of propagating:
//! `get_cart_or_default` renders an empty cart and `is_caller_admin`
//! answers `false`. Everything else returns `Err` to the handler.
//!
//! # Example
//!
//! ```rust,ignore
//! use sprtshop_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend)?;
//!
//! let products = client.get_products().await?;
//! client.add_to_cart(&identity, products[0].id, 1).await?;
//! ```

mod cache;
mod error;
mod types;

pub use cache::{CacheKey, CacheValue, Mutation};
pub use error::BackendError;
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use sprtshop_core::{CartItem, CustomSticker, ItemId, Order, OrderId, OrderStatus, PrincipalId, Product, Role, UserProfile};

use crate::config::BackendConfig;
use crate::models::Identity;

/// Header carrying the caller's principal on caller-scoped requests.
const CALLER_PRINCIPAL_HEADER: &str = "x-caller-principal";

/// Header carrying the caller's identity-provider token.
const CALLER_TOKEN_HEADER: &str = "x-caller-token";

/// Total per-request timeout. Bounds a hung backend instead of leaving the
/// page loading forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the backend REST API.
///
/// Cheaply cloneable; all clones share one HTTP connection pool and one
/// response cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
    cache: Cache<String, CacheValue>,
}

impl BackendClient {
    /// Create a new backend API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                api_url: config.api_url.clone(),
                api_key: config.api_key.clone(),
                cache,
            }),
        })
    }

    /// Build a request to `path` carrying the service API key.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, format!("{}{path}", self.inner.api_url))
            .bearer_auth(self.inner.api_key.expose_secret())
    }

    /// Build a caller-scoped request forwarding the session identity.
    fn request_as(&self, method: Method, path: &str, caller: &Identity) -> reqwest::RequestBuilder {
        self.request(method, path)
            .header(CALLER_PRINCIPAL_HEADER, caller.principal.as_str())
            .header(CALLER_TOKEN_HEADER, &caller.token)
    }

    /// Send a request and decode a JSON response body.
    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::from_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    /// Send a request whose success response carries no body.
    async fn send_no_content(&self, request: reqwest::RequestBuilder) -> Result<(), BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::from_status(status, &body));
        }

        Ok(())
    }

    /// Drop every cached read the mutation could have changed.
    async fn invalidate(&self, mutation: Mutation) {
        for key in mutation.invalidated_keys() {
            self.inner.cache.invalidate(&key.to_string()).await;
        }
    }

    /// Number of entries currently cached. Test-facing.
    #[doc(hidden)]
    pub async fn cached_entry_count(&self) -> u64 {
        self.inner.cache.run_pending_tasks().await;
        self.inner.cache.entry_count()
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Get the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, BackendError> {
        let cache_key = CacheKey::Products.to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.send(self.request(Method::GET, "/v1/products")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ItemId) -> Result<Product, BackendError> {
        let cache_key = CacheKey::Product(id).to_string();

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .send(self.request(Method::GET, &format!("/v1/products/{id}")))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Create a product. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the draft or the caller is
    /// not an admin.
    #[instrument(skip(self, caller, draft), fields(name = %draft.name))]
    pub async fn create_product(
        &self,
        caller: &Identity,
        draft: &ProductDraft,
    ) -> Result<ItemId, BackendError> {
        let created: CreatedProduct = self
            .send(
                self.request_as(Method::POST, "/v1/products", caller)
                    .json(draft),
            )
            .await?;

        self.invalidate(Mutation::ProductChanged { id: created.id })
            .await;

        Ok(created.id)
    }

    /// Update a product. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the draft or the caller is
    /// not an admin.
    #[instrument(skip(self, caller, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        caller: &Identity,
        id: ItemId,
        draft: &ProductDraft,
    ) -> Result<(), BackendError> {
        self.send_no_content(
            self.request_as(Method::PUT, &format!("/v1/products/{id}"), caller)
                .json(draft),
        )
        .await?;

        self.invalidate(Mutation::ProductChanged { id }).await;

        Ok(())
    }

    /// Remove a product. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self, caller), fields(product_id = %id))]
    pub async fn delete_product(&self, caller: &Identity, id: ItemId) -> Result<(), BackendError> {
        self.send_no_content(self.request_as(Method::DELETE, &format!("/v1/products/{id}"), caller))
            .await?;

        self.invalidate(Mutation::ProductChanged { id }).await;

        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Get the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, caller))]
    pub async fn get_cart(&self, caller: &Identity) -> Result<Vec<CartItem>, BackendError> {
        let cache_key = CacheKey::Cart(caller.principal.clone()).to_string();

        if let Some(CacheValue::Cart(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for cart");
            return Ok(items);
        }

        let items: Vec<CartItem> = self
            .send(self.request_as(Method::GET, "/v1/cart", caller))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Cart(items.clone()))
            .await;

        Ok(items)
    }

    /// Get the caller's cart, masking failures with an empty cart.
    ///
    /// With no identity the backend is not called at all; signed-out
    /// visitors simply have nothing in their cart.
    pub async fn get_cart_or_default(&self, caller: Option<&Identity>) -> Vec<CartItem> {
        let Some(caller) = caller else {
            return Vec::new();
        };

        match self.get_cart(caller).await {
            Ok(items) => items,
            Err(e) => {
                warn!("Failed to fetch cart, rendering it empty: {e}");
                Vec::new()
            }
        }
    }

    /// Add an item to the caller's cart. The backend merges the quantity
    /// into an existing line for the same item.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the line.
    #[instrument(skip(self, caller), fields(product_id = %product_id, quantity))]
    pub async fn add_to_cart(
        &self,
        caller: &Identity,
        product_id: ItemId,
        quantity: u32,
    ) -> Result<(), BackendError> {
        self.send_no_content(
            self.request_as(Method::POST, "/v1/cart/items", caller)
                .json(&CartLineRequest {
                    product_id,
                    quantity,
                }),
        )
        .await?;

        self.invalidate(Mutation::CartChanged {
            caller: caller.principal.clone(),
        })
        .await;

        Ok(())
    }

    /// Replace a cart line's quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the quantity.
    #[instrument(skip(self, caller), fields(product_id = %product_id, quantity))]
    pub async fn update_cart_item(
        &self,
        caller: &Identity,
        product_id: ItemId,
        quantity: u32,
    ) -> Result<(), BackendError> {
        self.send_no_content(
            self.request_as(Method::PUT, &format!("/v1/cart/items/{product_id}"), caller)
                .json(&QuantityUpdate { quantity }),
        )
        .await?;

        self.invalidate(Mutation::CartChanged {
            caller: caller.principal.clone(),
        })
        .await;

        Ok(())
    }

    /// Remove a line from the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, caller), fields(product_id = %product_id))]
    pub async fn remove_cart_item(
        &self,
        caller: &Identity,
        product_id: ItemId,
    ) -> Result<(), BackendError> {
        self.send_no_content(self.request_as(
            Method::DELETE,
            &format!("/v1/cart/items/{product_id}"),
            caller,
        ))
        .await?;

        self.invalidate(Mutation::CartChanged {
            caller: caller.principal.clone(),
        })
        .await;

        Ok(())
    }

    /// Empty the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, caller))]
    pub async fn clear_cart(&self, caller: &Identity) -> Result<(), BackendError> {
        self.send_no_content(self.request_as(Method::DELETE, "/v1/cart", caller))
            .await?;

        self.invalidate(Mutation::CartChanged {
            caller: caller.principal.clone(),
        })
        .await;

        Ok(())
    }

    // =========================================================================
    // Checkout & Orders
    // =========================================================================

    /// Place an order from the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the checkout (empty cart,
    /// insufficient stock, invalid address).
    #[instrument(skip(self, caller, request))]
    pub async fn checkout(
        &self,
        caller: &Identity,
        request: &CheckoutRequest,
    ) -> Result<CheckoutResponse, BackendError> {
        let response: CheckoutResponse = self
            .send(
                self.request_as(Method::POST, "/v1/checkout", caller)
                    .json(request),
            )
            .await?;

        self.invalidate(Mutation::Checkout {
            caller: caller.principal.clone(),
        })
        .await;

        Ok(response)
    }

    /// Get every order. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self, caller))]
    pub async fn get_all_orders(&self, caller: &Identity) -> Result<Vec<Order>, BackendError> {
        let cache_key = CacheKey::Orders.to_string();

        if let Some(CacheValue::Orders(orders)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for orders");
            return Ok(orders);
        }

        let orders: Vec<Order> = self
            .send(self.request_as(Method::GET, "/v1/orders", caller))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Orders(orders.clone()))
            .await;

        Ok(orders)
    }

    /// Get the caller's own order history.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, caller))]
    pub async fn get_caller_orders(&self, caller: &Identity) -> Result<Vec<Order>, BackendError> {
        let cache_key = CacheKey::UserOrders(caller.principal.clone()).to_string();

        if let Some(CacheValue::Orders(orders)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for caller orders");
            return Ok(orders);
        }

        let orders: Vec<Order> = self
            .send(self.request_as(Method::GET, "/v1/orders/mine", caller))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Orders(orders.clone()))
            .await;

        Ok(orders)
    }

    /// Get a single order.
    ///
    /// Not cached: the backend's owner-or-admin check must run on every
    /// read, and a shared cache entry would bypass it.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the caller may not
    /// see it.
    #[instrument(skip(self, caller), fields(order_id = %id))]
    pub async fn get_order(&self, caller: &Identity, id: OrderId) -> Result<Order, BackendError> {
        self.send(self.request_as(Method::GET, &format!("/v1/orders/{id}"), caller))
            .await
    }

    /// Change an order's status. Admin only.
    ///
    /// `owner` is the identity that placed the order, needed to drop that
    /// user's cached history.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self, caller, owner), fields(order_id = %id, status = %status.as_str()))]
    pub async fn update_order_status(
        &self,
        caller: &Identity,
        id: OrderId,
        status: OrderStatus,
        owner: &PrincipalId,
    ) -> Result<(), BackendError> {
        self.send_no_content(
            self.request_as(Method::POST, &format!("/v1/orders/{id}/status"), caller)
                .json(&StatusUpdate { status }),
        )
        .await?;

        self.invalidate(Mutation::OrderStatusChanged {
            id,
            owner: owner.clone(),
        })
        .await;

        Ok(())
    }

    // =========================================================================
    // Custom Stickers
    // =========================================================================

    /// Get the caller's custom stickers.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, caller))]
    pub async fn get_caller_stickers(
        &self,
        caller: &Identity,
    ) -> Result<Vec<CustomSticker>, BackendError> {
        let cache_key = CacheKey::CallerStickers(caller.principal.clone()).to_string();

        if let Some(CacheValue::Stickers(stickers)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for caller stickers");
            return Ok(stickers);
        }

        let stickers: Vec<CustomSticker> = self
            .send(self.request_as(Method::GET, "/v1/stickers/mine", caller))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Stickers(stickers.clone()))
            .await;

        Ok(stickers)
    }

    /// Get every custom sticker. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self, caller))]
    pub async fn get_all_stickers(
        &self,
        caller: &Identity,
    ) -> Result<Vec<CustomSticker>, BackendError> {
        let cache_key = CacheKey::AllStickers.to_string();

        if let Some(CacheValue::Stickers(stickers)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for all stickers");
            return Ok(stickers);
        }

        let stickers: Vec<CustomSticker> = self
            .send(self.request_as(Method::GET, "/v1/stickers", caller))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Stickers(stickers.clone()))
            .await;

        Ok(stickers)
    }

    /// Get a single custom sticker.
    ///
    /// Not cached: readable only by its creator and admins, so the
    /// backend's check must run on every read.
    ///
    /// # Errors
    ///
    /// Returns an error if the sticker does not exist or the caller may not
    /// see it.
    #[instrument(skip(self, caller), fields(sticker_id = %id))]
    pub async fn get_sticker(
        &self,
        caller: &Identity,
        id: ItemId,
    ) -> Result<CustomSticker, BackendError> {
        self.send(self.request_as(Method::GET, &format!("/v1/stickers/{id}"), caller))
            .await
    }

    /// Create a custom sticker for the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the draft.
    #[instrument(skip(self, caller, draft), fields(name = %draft.name))]
    pub async fn create_sticker(
        &self,
        caller: &Identity,
        draft: &StickerDraft,
    ) -> Result<CustomSticker, BackendError> {
        let sticker: CustomSticker = self
            .send(
                self.request_as(Method::POST, "/v1/stickers", caller)
                    .json(draft),
            )
            .await?;

        self.invalidate(Mutation::StickerCreated {
            creator: caller.principal.clone(),
        })
        .await;

        Ok(sticker)
    }

    // =========================================================================
    // Profiles & Roles
    // =========================================================================

    /// Get the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the caller has never saved a
    /// profile, or another error if the request fails.
    #[instrument(skip(self, caller))]
    pub async fn get_profile(&self, caller: &Identity) -> Result<UserProfile, BackendError> {
        let cache_key = CacheKey::Profile(caller.principal.clone()).to_string();

        if let Some(CacheValue::Profile(profile)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for profile");
            return Ok(profile);
        }

        let profile: UserProfile = self
            .send(self.request_as(Method::GET, "/v1/profile", caller))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Profile(profile.clone()))
            .await;

        Ok(profile)
    }

    /// Get another user's profile. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if no profile exists or the caller is not an admin.
    #[instrument(skip(self, caller, principal))]
    pub async fn get_user_profile(
        &self,
        caller: &Identity,
        principal: &PrincipalId,
    ) -> Result<UserProfile, BackendError> {
        let cache_key = CacheKey::Profile(principal.clone()).to_string();

        if let Some(CacheValue::Profile(profile)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for user profile");
            return Ok(profile);
        }

        let profile: UserProfile = self
            .send(self.request_as(Method::GET, &format!("/v1/profile/{principal}"), caller))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Profile(profile.clone()))
            .await;

        Ok(profile)
    }

    /// Save the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, caller, name))]
    pub async fn save_profile(&self, caller: &Identity, name: &str) -> Result<(), BackendError> {
        self.send_no_content(
            self.request_as(Method::PUT, "/v1/profile", caller)
                .json(&ProfileUpdate {
                    name: name.to_string(),
                }),
        )
        .await?;

        self.invalidate(Mutation::ProfileSaved {
            caller: caller.principal.clone(),
        })
        .await;

        Ok(())
    }

    /// Get the caller's role. Signed-out visitors are guests without a
    /// backend call.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, caller))]
    pub async fn get_caller_role(&self, caller: Option<&Identity>) -> Result<Role, BackendError> {
        let Some(caller) = caller else {
            return Ok(Role::Guest);
        };

        let cache_key = CacheKey::Role(caller.principal.clone()).to_string();

        if let Some(CacheValue::Role(role)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for role");
            return Ok(role);
        }

        let response: RoleResponse = self
            .send(self.request_as(Method::GET, "/v1/me/role", caller))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Role(response.role))
            .await;

        Ok(response.role)
    }

    /// Whether the caller may use the admin console.
    ///
    /// Fail-closed: a missing identity or a failed call both answer
    /// `false`. Never `Err`, and never an optimistic `true`.
    pub async fn is_caller_admin(&self, caller: Option<&Identity>) -> bool {
        let Some(caller) = caller else {
            return false;
        };

        let cache_key = CacheKey::AdminStatus(caller.principal.clone()).to_string();

        if let Some(CacheValue::AdminStatus(is_admin)) = self.inner.cache.get(&cache_key).await {
            return is_admin;
        }

        let request = self.request_as(Method::GET, "/v1/me/is-admin", caller);
        match self.send::<AdminStatusResponse>(request).await {
            Ok(response) => {
                self.inner
                    .cache
                    .insert(cache_key, CacheValue::AdminStatus(response.is_admin))
                    .await;
                response.is_admin
            }
            Err(e) => {
                warn!("Admin status check failed, treating caller as non-admin: {e}");
                false
            }
        }
    }

    /// Assign a role to a user. Admin only.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self, caller, target), fields(role = %role.as_str()))]
    pub async fn assign_role(
        &self,
        caller: &Identity,
        target: PrincipalId,
        role: Role,
    ) -> Result<(), BackendError> {
        self.send_no_content(
            self.request_as(Method::POST, "/v1/roles", caller)
                .json(&RoleAssignment {
                    user: target.clone(),
                    role,
                }),
        )
        .await?;

        self.invalidate(Mutation::RoleAssigned { target }).await;

        Ok(())
    }
}
