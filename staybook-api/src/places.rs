use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use staybook_shared::{Place, PlaceAttributes};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::{middleware::CurrentIdentity, state::AppState, uploads::expand_photo};

/// Unknown fields, including any owner id, are dropped during decoding.
#[derive(Debug, Deserialize)]
struct UpdatePlaceRequest {
    id: Uuid,
    #[serde(flatten)]
    attributes: PlaceAttributes,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/places", get(list_places).post(create_place).put(update_place))
        .route("/api/places/{id}", get(get_place))
        .route("/api/user-places", get(user_places))
}

fn present(state: &AppState, place: Place) -> Place {
    place.map_photos(|photo| expand_photo(&state.uploads.public_base_url, photo))
}

async fn create_place(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    AppJson(attributes): AppJson<PlaceAttributes>,
) -> Result<Json<Place>, AppError> {
    let place = state.places.create(&identity, attributes).await?;
    Ok(Json(present(&state, place)))
}

async fn user_places(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<Vec<Place>>, AppError> {
    let places = state.places.list_for_owner(&identity).await?;
    Ok(Json(places.into_iter().map(|p| present(&state, p)).collect()))
}

async fn get_place(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Place>, AppError> {
    let place = state.places.get(id).await?;
    Ok(Json(present(&state, place)))
}

async fn update_place(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    AppJson(req): AppJson<UpdatePlaceRequest>,
) -> Result<Json<&'static str>, AppError> {
    state.places.update(&identity, req.id, req.attributes).await?;
    Ok(Json("ok"))
}

async fn list_places(State(state): State<AppState>) -> Result<Json<Vec<Place>>, AppError> {
    let places = state.places.list_all().await?;
    Ok(Json(places.into_iter().map(|p| present(&state, p)).collect()))
}
