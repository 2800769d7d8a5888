//! Month listing routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use tracing::debug;

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{ListingEntry, PaginatedResponse, PaginationQuery},
};

/// Create listing routes
pub fn router() -> Router<AppState> {
    Router::new().route("/{category}/{yymm}", get(month_listing))
}

/// Serve one month of announcements for a category
async fn month_listing(
    State(state): State<AppState>,
    Path((category, yymm)): Path<(String, String)>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<PaginatedResponse<ListingEntry>>> {
    debug!("Listing request: {}/{}", category, yymm);

    if yymm.len() != 4 || !yymm.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::bad_request("Listing month must be a yymm value"));
    }
    let limit = pagination.limit.min(state.config.max_listing_page);

    let listing = state
        .backends
        .listings
        .articles_for_month(&category, &yymm, limit, pagination.offset)
        .await?;

    let entries: Vec<ListingEntry> = listing.items.into_iter().map(ListingEntry::from).collect();

    Ok(Json(PaginatedResponse::new(
        entries,
        limit,
        pagination.offset,
        Some(listing.total as u32),
    )))
}
