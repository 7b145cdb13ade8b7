use staybook_shared::{Booking, BookingDraft, BookingWithPlace, IdentityRef};
use std::sync::Arc;
use tracing::info;

use crate::ownership::attribute_creation;
use crate::repository::{BookingRepository, PlaceRepository};
use crate::{CoreError, CoreResult};

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    places: Arc<dyn PlaceRepository>,
}

impl BookingService {
    pub fn new(bookings: Arc<dyn BookingRepository>, places: Arc<dyn PlaceRepository>) -> Self {
        Self { bookings, places }
    }

    /// The booking is always attributed to `identity`.
    pub async fn create(&self, identity: &IdentityRef, draft: BookingDraft) -> CoreResult<Booking> {
        if draft.check_out <= draft.check_in {
            return Err(CoreError::ValidationError("check_out must be after check_in".to_string()));
        }
        if draft.number_of_guests < 1 {
            return Err(CoreError::ValidationError(
                "number_of_guests must be at least 1".to_string(),
            ));
        }
        if draft.name.trim().is_empty() || draft.phone.trim().is_empty() {
            return Err(CoreError::ValidationError("name and phone are required".to_string()));
        }

        if self.places.find(draft.place_id).await?.is_none() {
            return Err(CoreError::NotFound("Place".to_string()));
        }

        let booking = self.bookings.insert(attribute_creation(identity, draft)).await?;
        info!(
            "Booking {} for place {} by {} ({} nights)",
            booking.id,
            booking.place_id,
            booking.user_id,
            booking.nights()
        );
        Ok(booking)
    }

    pub async fn list_for_user(&self, identity: &IdentityRef) -> CoreResult<Vec<BookingWithPlace>> {
        let bookings = self.bookings.list_by_user(identity.id).await?;

        let mut result = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let place = self.places.find(booking.place_id).await?;
            result.push(BookingWithPlace { booking, place });
        }
        Ok(result)
    }
}
