//! In-memory cart registry.
//!
//! Each browser session owns one [`CartStore`], found through the cart ID kept
//! in the session. Stores live in a `moka` cache with a time-to-idle, so carts
//! that are not touched for the configured period are dropped. Nothing is
//! persisted.

use std::sync::Arc;

use moka::future::Cache;
use paradise_nursery_core::{CartId, CartStore, CurrencyCode};
use tokio::sync::{Mutex, watch};
use tower_sessions::Session;
use tracing::debug;

use crate::config::StorefrontConfig;
use crate::view::{CartView, CartViewPublisher};

/// Session key under which the cart ID is stored.
pub const CART_ID_KEY: &str = "cart_id";

/// One session's cart store plus the live feed of its rendered view.
///
/// The mutex serializes mutations, so a dispatched intent is fully applied
/// before any later request reads the cart.
#[derive(Clone)]
pub struct SessionCart {
    id: CartId,
    store: Arc<Mutex<CartStore>>,
    updates: watch::Receiver<CartView>,
}

impl SessionCart {
    fn new(id: CartId, currency: CurrencyCode) -> Self {
        let (sender, updates) = watch::channel(CartView::empty(currency));
        let mut store = CartStore::new(currency);
        store.subscribe(Arc::new(CartViewPublisher::new(sender)));

        Self {
            id,
            store: Arc::new(Mutex::new(store)),
            updates,
        }
    }

    #[must_use]
    pub const fn id(&self) -> CartId {
        self.id
    }

    /// The store, for reads and intent dispatch.
    #[must_use]
    pub fn store(&self) -> &Mutex<CartStore> {
        &self.store
    }

    /// A receiver that yields a freshly rendered view after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.updates.clone()
    }
}

/// All live carts, keyed by cart ID.
#[derive(Clone)]
pub struct CartRegistry {
    cache: Cache<CartId, SessionCart>,
    currency: CurrencyCode,
}

impl CartRegistry {
    /// Create a registry sized and timed from configuration.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_carts)
            .time_to_idle(config.cart_idle_timeout)
            .build();

        Self {
            cache,
            currency: config.currency,
        }
    }

    /// The cart for `id`, creating an empty one if it is unknown or expired.
    pub async fn get_or_create(&self, id: CartId) -> SessionCart {
        let currency = self.currency;
        self.cache
            .get_with(id, async move {
                debug!(cart_id = %id, "Creating cart");
                SessionCart::new(id, currency)
            })
            .await
    }

    /// The cart this session already has, if any.
    ///
    /// Never writes to the session, so read-only pages do not start sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn find(
        &self,
        session: &Session,
    ) -> Result<Option<SessionCart>, tower_sessions::session::Error> {
        let Some(id) = session.get::<CartId>(CART_ID_KEY).await? else {
            return Ok(None);
        };
        Ok(self.cache.get(&id).await)
    }

    /// The cart belonging to this session, created on first use.
    ///
    /// A session without a cart ID is assigned a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read or written.
    pub async fn for_session(
        &self,
        session: &Session,
    ) -> Result<SessionCart, tower_sessions::session::Error> {
        let id = match session.get::<CartId>(CART_ID_KEY).await? {
            Some(id) => id,
            None => {
                let id = CartId::generate();
                session.insert(CART_ID_KEY, id).await?;
                id
            }
        };

        Ok(self.get_or_create(id).await)
    }
}
