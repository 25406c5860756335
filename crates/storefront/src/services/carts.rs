//! Server-side cart storage.
//!
//! Each visitor's [`Cart`] lives here behind its own lock, looked up by a
//! [`CartKey`] that the visitor's session carries. A mutation holds the lock
//! from read to write, so two requests on the same session can never both
//! start from the same cart and overwrite each other.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;
use vitrine_core::Cart;

/// Maximum number of live carts.
const MAX_CARTS: u64 = 100_000;

/// Carts untouched for this long are dropped, matching session expiry.
pub const CART_IDLE_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Identifies one visitor's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartKey(Uuid);

impl CartKey {
    /// A fresh, random key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for CartKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// In-memory carts keyed by [`CartKey`].
///
/// Cheaply cloneable; clones share the same carts.
#[derive(Clone)]
pub struct CartStore {
    carts: Cache<CartKey, Arc<Mutex<Cart>>>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_idle_timeout(CART_IDLE_TIMEOUT)
    }

    #[must_use]
    pub fn with_idle_timeout(idle: Duration) -> Self {
        Self {
            carts: Cache::builder()
                .max_capacity(MAX_CARTS)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// A copy of the cart, or an empty cart if `key` has none.
    pub async fn snapshot(&self, key: CartKey) -> Cart {
        match self.carts.get(&key).await {
            Some(cart) => cart.lock().await.clone(),
            None => Cart::default(),
        }
    }

    /// Apply `mutate` to the cart under its lock and return what it returns.
    ///
    /// The cart is created empty on first use.
    pub async fn update<R>(&self, key: CartKey, mutate: impl FnOnce(&mut Cart) -> R) -> R {
        let cart = self
            .carts
            .get_with(key, async { Arc::new(Mutex::new(Cart::default())) })
            .await;
        let mut cart = cart.lock().await;
        mutate(&mut cart)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
