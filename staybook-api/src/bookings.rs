use axum::{extract::State, routing::get, Json, Router};
use staybook_shared::{Booking, BookingDraft, BookingWithPlace};

use crate::{error::AppError, extract::AppJson, middleware::CurrentIdentity, state::AppState};
use crate::uploads::expand_photo;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/bookings", get(list_bookings).post(create_booking))
}

/// The draft has no user field; a `user_id` in the body is ignored.
async fn create_booking(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    AppJson(draft): AppJson<BookingDraft>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.create(&identity, draft).await?;
    Ok(Json(booking))
}

async fn list_bookings(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<Vec<BookingWithPlace>>, AppError> {
    let base = &state.uploads.public_base_url;
    let bookings = state
        .bookings
        .list_for_user(&identity)
        .await?
        .into_iter()
        .map(|b| BookingWithPlace {
            place: b.place.map(|p| p.map_photos(|photo| expand_photo(base, photo))),
            booking: b.booking,
        })
        .collect();
    Ok(Json(bookings))
}
