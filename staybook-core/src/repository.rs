use async_trait::async_trait;
use staybook_shared::{Booking, Identity, NewBooking, NewPlace, Place, PlaceAttributes};
use uuid::Uuid;

use crate::CoreResult;

/// Repository trait for registered identities
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Fails with `DuplicateEmail` when the email is taken.
    async fn insert(&self, identity: &Identity) -> CoreResult<()>;

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<Identity>>;

    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<Identity>>;
}

/// Repository trait for owned places
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn insert(&self, place: NewPlace) -> CoreResult<Place>;

    async fn find(&self, id: Uuid) -> CoreResult<Option<Place>>;

    async fn list_by_owner(&self, owner_id: Uuid) -> CoreResult<Vec<Place>>;

    async fn list_all(&self) -> CoreResult<Vec<Place>>;

    /// Replace the attributes of a place; `owner_id` is never written.
    /// Returns `None` when the place no longer exists.
    async fn update_attributes(
        &self,
        id: Uuid,
        attributes: PlaceAttributes,
    ) -> CoreResult<Option<Place>>;
}

/// Repository trait for bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: NewBooking) -> CoreResult<Booking>;

    async fn list_by_user(&self, user_id: Uuid) -> CoreResult<Vec<Booking>>;
}
