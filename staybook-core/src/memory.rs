//! In-process repositories backed by `HashMap`s. Used by tests and by the
//! `memory` storage backend.

use async_trait::async_trait;
use chrono::Utc;
use staybook_shared::{Booking, Identity, NewBooking, NewPlace, Place, PlaceAttributes};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repository::{BookingRepository, IdentityRepository, PlaceRepository};
use crate::{CoreError, CoreResult};

#[derive(Default)]
pub struct MemoryIdentityRepository {
    identities: RwLock<HashMap<Uuid, Identity>>,
}

impl MemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityRepository for MemoryIdentityRepository {
    async fn insert(&self, identity: &Identity) -> CoreResult<()> {
        let mut identities = self.identities.write().await;
        if identities.values().any(|i| i.email == identity.email) {
            return Err(CoreError::DuplicateEmail);
        }
        identities.insert(identity.id, identity.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<Identity>> {
        let identities = self.identities.read().await;
        Ok(identities.values().find(|i| i.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> CoreResult<Option<Identity>> {
        Ok(self.identities.read().await.get(&id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryPlaceRepository {
    places: RwLock<HashMap<Uuid, Place>>,
}

impl MemoryPlaceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_creation(mut places: Vec<Place>) -> Vec<Place> {
    places.sort_by_key(|p| p.created_at);
    places
}

#[async_trait]
impl PlaceRepository for MemoryPlaceRepository {
    async fn insert(&self, place: NewPlace) -> CoreResult<Place> {
        let place = Place::from_new(place);
        self.places.write().await.insert(place.id, place.clone());
        Ok(place)
    }

    async fn find(&self, id: Uuid) -> CoreResult<Option<Place>> {
        Ok(self.places.read().await.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> CoreResult<Vec<Place>> {
        let places = self.places.read().await;
        Ok(by_creation(places.values().filter(|p| p.owner_id == owner_id).cloned().collect()))
    }

    async fn list_all(&self) -> CoreResult<Vec<Place>> {
        Ok(by_creation(self.places.read().await.values().cloned().collect()))
    }

    async fn update_attributes(
        &self,
        id: Uuid,
        attributes: PlaceAttributes,
    ) -> CoreResult<Option<Place>> {
        let mut places = self.places.write().await;
        Ok(places.get_mut(&id).map(|place| {
            place.attributes = attributes;
            place.updated_at = Utc::now();
            place.clone()
        }))
    }
}

#[derive(Default)]
pub struct MemoryBookingRepository {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl MemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn insert(&self, booking: NewBooking) -> CoreResult<Booking> {
        let booking = Booking::from_new(booking);
        self.bookings.write().await.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn list_by_user(&self, user_id: Uuid) -> CoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut mine: Vec<Booking> =
            bookings.values().filter(|b| b.user_id == user_id).cloned().collect();
        mine.sort_by_key(|b| b.created_at);
        Ok(mine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = MemoryIdentityRepository::new();
        let first = Identity {
            id: Uuid::new_v4(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "h".to_string(),
        };
        let second = Identity { id: Uuid::new_v4(), ..first.clone() };

        repo.insert(&first).await.unwrap();
        assert!(matches!(repo.insert(&second).await, Err(CoreError::DuplicateEmail)));
        assert_eq!(repo.find_by_email("a@x.com").await.unwrap().unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_update_keeps_owner() {
        let repo = MemoryPlaceRepository::new();
        let owner = Uuid::new_v4();
        let place = repo
            .insert(NewPlace { owner_id: owner, attributes: PlaceAttributes::default() })
            .await
            .unwrap();

        let updated = repo
            .update_attributes(
                place.id,
                PlaceAttributes { title: "New".to_string(), ..Default::default() },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.owner_id, owner);
        assert_eq!(updated.attributes.title, "New");
        let missing = repo.update_attributes(Uuid::new_v4(), PlaceAttributes::default()).await;
        assert!(missing.unwrap().is_none());
    }
}
