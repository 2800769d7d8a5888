//! Abstract page routes

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::{debug, error};

use eprint::ArticleId;

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{AbstractResponse, ApiResponse},
};

/// Create abstract page routes
pub fn router() -> Router<AppState> {
    // Wildcard: old-style identifiers contain a slash (`math/0309136v1`)
    Router::new().route("/{*article_id}", get(abs_page))
}

/// Serve the abstract page of one article version
async fn abs_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<AbstractResponse>>> {
    debug!("Abstract page request: {}", raw_id);

    let decoded = urlencoding::decode(&raw_id)
        .map_err(|_| ApiError::bad_request("Invalid URL encoding in article identifier"))?;
    let (article_id, requested_version) = ArticleId::parse_with_version(&decoded)?;

    let metadata = state
        .backends
        .abstracts
        .get_abs(&article_id, requested_version)
        .await?;
    let article = metadata.version_ref()?;

    // An unversioned request shows the latest version, so the availability
    // probe follows the highest version as well.
    let most_recent = requested_version.is_none();
    let html_url = match eprint::latexml_url(
        &state.latexml,
        state.backends.render_status.as_ref(),
        &article,
        most_recent,
    )
    .await
    {
        Ok(url) => url,
        Err(e) => {
            // Degrade to an abstract page without the link
            error!(
                "Render status lookup failed for {}: {}",
                article.id_with_version(),
                e
            );
            None
        }
    };

    Ok(Json(ApiResponse::new(AbstractResponse {
        metadata,
        latexml_url: html_url,
    })))
}
