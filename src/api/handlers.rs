use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Destination, Hotel, NearbyPlace, PreferenceRequest},
    services::{self, HotelConstraints},
};

use super::{state::Session, AppState};

// Request/Response types

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub destinations: Vec<Destination>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub loading: bool,
    pub destinations: Vec<Destination>,
    pub generated_at: Option<DateTime<Utc>>,
    pub nearby_index: Option<usize>,
    pub hotels_index: Option<usize>,
}

impl SessionResponse {
    async fn from_session(session: &Session) -> Self {
        let view = session.view().await;
        Self {
            id: session.id,
            created_at: session.created_at,
            loading: session.is_loading(),
            destinations: view.destinations,
            generated_at: view.generated_at,
            nearby_index: view.nearby_index,
            hotels_index: view.hotels_index,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    pub destination_name: String,
    pub places: Vec<NearbyPlace>,
}

/// Hotel filter controls as query parameters; absent values do not restrict
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelQuery {
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub ac: bool,
    pub wifi: bool,
    pub family_friendly: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelsResponse {
    pub destination_name: String,
    /// Upper bound for the price control
    pub price_ceiling: f64,
    pub hotels: Vec<Hotel>,
    /// Number of hotels before filtering
    pub total: usize,
    pub no_matches: bool,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// One-shot recommendations without a session
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<PreferenceRequest>,
) -> AppResult<Json<RecommendationsResponse>> {
    let preference = request.into_preference()?;

    tracing::info!(request_id = %request_id, "Processing stateless recommendation request");

    let destinations = services::get_recommendations(state.provider.as_ref(), &preference).await?;
    Ok(Json(RecommendationsResponse { destinations }))
}

/// Create a new view session
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let session = state.create_session().await;
    tracing::info!(session_id = %session.id, "Session created");
    (
        StatusCode::CREATED,
        Json(SessionResponse::from_session(&session).await),
    )
}

/// Get a session's current view
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let session = state.session(session_id).await?;
    Ok(Json(SessionResponse::from_session(&session).await))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.remove_session(session_id).await?;
    tracing::debug!(session_id = %session_id, "Session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Generate recommendations for a session
///
/// Only one request may be in flight per session. On failure the session keeps
/// whatever destinations it had before.
pub async fn session_recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<PreferenceRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state.session(session_id).await?;
    let preference = request.into_preference()?;

    let guard = session.begin_request()?;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        "Processing session recommendation request"
    );

    let destinations = services::get_recommendations(state.provider.as_ref(), &preference).await?;
    session.replace_destinations(destinations).await;
    drop(guard);

    Ok(Json(SessionResponse::from_session(&session).await))
}

/// Nearby places for one destination
pub async fn nearby_places(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(Uuid, usize)>,
) -> AppResult<Json<NearbyResponse>> {
    let session = state.session(session_id).await?;
    let destination = session.open_nearby(index).await?;

    Ok(Json(NearbyResponse {
        destination_name: destination.name,
        places: destination.nearby_places,
    }))
}

/// Close the nearby places panel
pub async fn close_nearby(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.session(session_id).await?.close_nearby().await;
    Ok(StatusCode::NO_CONTENT)
}

/// Filtered hotels for one destination
pub async fn hotels(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(Uuid, usize)>,
    Query(query): Query<HotelQuery>,
) -> AppResult<Json<HotelsResponse>> {
    let session = state.session(session_id).await?;
    let destination = session.open_hotels(index).await?;

    let defaults = HotelConstraints::unrestricted(&destination.hotels);
    let constraints = HotelConstraints {
        max_price: query.max_price.unwrap_or(defaults.max_price),
        min_rating: query.min_rating.unwrap_or(defaults.min_rating),
        require_ac: query.ac,
        require_wifi: query.wifi,
        require_family_friendly: query.family_friendly,
    };

    let hotels: Vec<Hotel> = services::filter_hotels(&destination.hotels, &constraints)
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!(
        session_id = %session_id,
        destination = index,
        total = destination.hotels.len(),
        matched = hotels.len(),
        "Hotels filtered"
    );

    Ok(Json(HotelsResponse {
        destination_name: destination.name,
        price_ceiling: defaults.max_price,
        total: destination.hotels.len(),
        no_matches: hotels.is_empty(),
        hotels,
    }))
}
