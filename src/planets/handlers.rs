use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::dto::PlanetView;
use crate::{
    auth::AuthUser,
    error::{AppError, MessageBody},
    extract::{IdPath, JsonBody},
    state::AppState,
    store::NewPlanet,
    validation::{parse_body, require_fields},
};

const REQUIRED: &[&str] = &["name", "diameter", "population", "terrain"];

pub fn planet_routes() -> Router<AppState> {
    Router::new()
        .route("/planetas", get(list_planets).post(register_planet))
        .route("/planetas/:id", get(get_planet))
        .route("/planetas/:id/", get(get_planet))
}

#[instrument(skip(state, payload))]
pub async fn register_planet(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<MessageBody>, AppError> {
    require_fields(&payload, REQUIRED)?;
    let new: NewPlanet = parse_body(payload)?;

    if state.store.find_matching_planet(&new).await?.is_some() {
        warn!(name = %new.name, "planet already exists");
        return Err(AppError::Duplicate("Planet"));
    }

    let planet = state.store.insert_planet(new).await?;
    info!(planet_id = planet.id, %caller, "planet registered");
    Ok(MessageBody::new("Planet created successfully"))
}

#[instrument(skip(state))]
pub async fn list_planets(State(state): State<AppState>) -> Result<Json<Vec<PlanetView>>, AppError> {
    let rows = state.store.list_planets().await?;
    Ok(Json(rows.into_iter().map(PlanetView::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_planet(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Vec<PlanetView>>, AppError> {
    let row = state.store.find_planet(id).await?;
    Ok(Json(row.into_iter().map(PlanetView::from).collect()))
}
