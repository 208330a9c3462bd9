use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use ldoffers_core::OffersResponse;
use ldoffers_scraper::ScraperError;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeQuery {
    pub url: Option<String>,
}

/// `GET /api/scrape?url=...`
///
/// A query string that fails to deserialize (a repeated `url`, say) is a
/// JSON 400 like every other client error.
pub(super) async fn scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ScrapeQuery>, QueryRejection>,
) -> Result<Json<OffersResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::info!(request_id = %req_id.0, error = %rejection, "rejected query string");
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid query string")
            .with_details(rejection.body_text())
    })?;
    let Some(url) = query.url.filter(|u| !u.trim().is_empty()) else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "URL is required"));
    };

    let result = {
        // The permit is released when this block ends, on success or error.
        let _permit = state.render_permits.acquire().await.map_err(|e| {
            tracing::error!(request_id = %req_id.0, error = %e, "render semaphore closed");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, SCRAPE_FAILED)
                .with_details(e.to_string())
        })?;
        state.client.scrape_offers(&url).await
    };
    let offers = result.map_err(|e| map_scraper_error(&req_id, &url, e))?;

    Ok(Json(OffersResponse { offers }))
}

const SCRAPE_FAILED: &str = "Failed to scrape the website";

fn map_scraper_error(req_id: &RequestId, url: &str, error: ScraperError) -> ApiError {
    match error {
        ScraperError::InvalidUrl { reason, .. } => {
            tracing::info!(request_id = %req_id.0, url, reason = %reason, "rejected invalid URL");
            ApiError::new(StatusCode::BAD_REQUEST, "Invalid URL").with_details(reason)
        }
        ScraperError::Extraction(e) => {
            tracing::info!(request_id = %req_id.0, url, error = %e, "no offers extracted");
            ApiError::new(StatusCode::NOT_FOUND, e.to_string())
        }
        other => {
            tracing::error!(request_id = %req_id.0, url, error = %other, "scraping error");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, SCRAPE_FAILED)
                .with_details(other.to_string())
        }
    }
}
