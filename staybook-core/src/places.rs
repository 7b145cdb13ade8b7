use staybook_shared::{IdentityRef, Place, PlaceAttributes};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ownership::{attribute_creation, authorize_mutation};
use crate::repository::PlaceRepository;
use crate::{CoreError, CoreResult};

pub struct PlaceService {
    places: Arc<dyn PlaceRepository>,
}

fn validate(attributes: &PlaceAttributes) -> CoreResult<()> {
    if attributes.title.trim().is_empty() {
        return Err(CoreError::ValidationError("title is required".to_string()));
    }
    if attributes.max_guests < 0 || attributes.price < 0 {
        return Err(CoreError::ValidationError(
            "max_guests and price must not be negative".to_string(),
        ));
    }
    Ok(())
}

impl PlaceService {
    pub fn new(places: Arc<dyn PlaceRepository>) -> Self {
        Self { places }
    }

    pub async fn create(
        &self,
        identity: &IdentityRef,
        attributes: PlaceAttributes,
    ) -> CoreResult<Place> {
        validate(&attributes)?;
        let place = self.places.insert(attribute_creation(identity, attributes)).await?;
        info!("Place {} created by {}", place.id, identity.id);
        Ok(place)
    }

    pub async fn get(&self, id: Uuid) -> CoreResult<Place> {
        self.places
            .find(id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Place".to_string()))
    }

    pub async fn list_for_owner(&self, identity: &IdentityRef) -> CoreResult<Vec<Place>> {
        self.places.list_by_owner(identity.id).await
    }

    pub async fn list_all(&self) -> CoreResult<Vec<Place>> {
        self.places.list_all().await
    }

    /// Replace a place's attributes. Lookup, then ownership check, then the
    /// write: a denied caller never reaches the repository's write path.
    pub async fn update(
        &self,
        identity: &IdentityRef,
        id: Uuid,
        attributes: PlaceAttributes,
    ) -> CoreResult<Place> {
        let place = self.get(id).await?;

        if let Err(e) = authorize_mutation(identity, &place).into_result() {
            warn!(
                "Identity {} denied update of place {} owned by {}",
                identity.id, place.id, place.owner_id
            );
            return Err(e);
        }
        validate(&attributes)?;

        self.places
            .update_attributes(id, attributes)
            .await?
            .ok_or_else(|| CoreError::NotFound("Place".to_string()))
    }
}
