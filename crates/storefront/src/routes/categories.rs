//! Category route handlers.

use axum::{Json, extract::State};
use tracing::instrument;
use vitrine_core::CategoryFilter;

use crate::state::AppState;

/// Categories with product counts for the filter bar.
///
/// Categories whose count is zero, including ones whose count could not be
/// fetched, are left out. `total` backs the "All Categories" entry.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<CategoryFilter> {
    Json(state.browser().fetch_category_filter().await)
}
