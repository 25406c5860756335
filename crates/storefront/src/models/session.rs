//! Session-related types.

use tower_sessions::Session;

use crate::error::Result;
use crate::services::carts::CartKey;

/// Session keys.
pub mod keys {
    /// Key for the [`CartKey`](crate::services::carts::CartKey) of the
    /// shopper's cart.
    pub const CART: &str = "cart";
}

/// The session's cart key, if a cart was ever started.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn find_cart_key(session: &Session) -> Result<Option<CartKey>> {
    Ok(session.get::<CartKey>(keys::CART).await?)
}

/// The session's cart key, assigning a new one on first use.
///
/// The key never changes once stored, so concurrent requests on one session
/// always agree on it.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn cart_key(session: &Session) -> Result<CartKey> {
    if let Some(key) = find_cart_key(session).await? {
        return Ok(key);
    }
    let key = CartKey::generate();
    session.insert(keys::CART, key).await?;
    Ok(key)
}
