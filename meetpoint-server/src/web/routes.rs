//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::domain::{POI_CATEGORIES, PoiCategory, Position};
use crate::engine::{AddressSearch, MeetingPlanner, SearchConfig, resolve_address};
use crate::share::{self, ShareSnapshot};

use super::dto::*;
use super::error::AppError;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/categories", get(categories))
        .route("/api/zone", post(plan_zone))
        .route("/api/optimize", post(optimize))
        .route("/api/share", post(create_share))
        // Legacy tokens use the standard base64 alphabet, which includes '/'.
        .route("/api/share/*token", get(open_share))
        .route("/api/reverse", get(reverse))
        .route("/api/geocode", get(geocode))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// The category catalogue and default selection.
async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: &POI_CATEGORIES,
        defaults: state.config.default_categories.clone(),
    })
}

/// Requested categories, or the configured defaults. Unknown ids are
/// skipped.
fn selected_categories(
    config: &SearchConfig,
    requested: Option<&[String]>,
) -> Vec<&'static PoiCategory> {
    let ids = requested.unwrap_or(&config.default_categories);
    PoiCategory::resolve(ids.iter().map(String::as_str))
}

/// Meeting zone for a fixed budget.
async fn plan_zone(
    State(state): State<AppState>,
    Json(req): Json<ZoneRequest>,
) -> Result<Json<ZoneResponse>, AppError> {
    let travelers = traveler_set(req.travelers)?;
    let budget = req
        .budget_minutes
        .unwrap_or(state.config.default_budget_minutes);
    let categories = selected_categories(&state.config, req.categories.as_deref());

    let planner = MeetingPlanner::new(
        state.isochrones.as_ref(),
        state.geocoding.as_ref(),
        &state.config,
    );
    let plan = planner
        .plan_zone(travelers.as_slice(), budget, req.mode, &categories)
        .await?;

    Ok(Json(ZoneResponse::from_plan(&plan, travelers.as_slice())))
}

/// Meeting zone at the smallest feasible budget.
async fn optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let travelers = traveler_set(req.travelers)?;
    let categories = selected_categories(&state.config, req.categories.as_deref());

    let planner = MeetingPlanner::new(
        state.isochrones.as_ref(),
        state.geocoding.as_ref(),
        &state.config,
    );
    let plan = planner
        .optimize(travelers.as_slice(), req.mode, &categories)
        .await?;

    info!(
        budget_minutes = plan.budget_minutes,
        minimality = ?plan.minimality,
        "Optimized meeting budget"
    );

    Ok(Json(OptimizeResponse::from_plan(&plan, travelers.as_slice())))
}

/// Encode a scenario as a share token.
async fn create_share(Json(req): Json<ShareRequest>) -> Result<Json<ShareResponse>, AppError> {
    let snapshot = ShareSnapshot {
        version: share::SHARE_VERSION,
        budget_minutes: req.budget_minutes,
        transport_mode: req.transport_mode,
        poi_categories: req.poi_categories,
        travelers: req.travelers,
    };
    let token = share::encode(&snapshot)?;
    Ok(Json(ShareResponse { token }))
}

/// Decode a share token.
async fn open_share(Path(token): Path<String>) -> Result<Json<ShareSnapshot>, AppError> {
    let snapshot = share::try_decode(&token)?;
    Ok(Json(snapshot))
}

/// Address for a point, falling back to its coordinates.
async fn reverse(
    State(state): State<AppState>,
    Query(query): Query<ReverseQuery>,
) -> Result<Json<ReverseResponse>, AppError> {
    let position = Position::new(query.lng, query.lat);
    if !position.is_finite() {
        return Err(AppError::BadRequest {
            kind: "invalid_input",
            message: "coordinates must be finite".to_string(),
        });
    }

    let address = resolve_address(state.geocoding.as_ref(), position).await;
    Ok(Json(ReverseResponse { position, address }))
}

/// Address candidates for a free-text query.
async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, AppError> {
    let q = query.q.unwrap_or_default();
    let results = state.geocoding.search_address(&q).await?;
    Ok(Json(GeocodeResponse { results }))
}
