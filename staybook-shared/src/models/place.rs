use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-editable attributes of a place. Owner and id are not part of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceAttributes {
    pub title: String,
    pub address: String,
    /// Ordered photo references: upload file names or absolute URLs.
    pub photos: Vec<String>,
    pub description: String,
    pub perks: Vec<String>,
    pub extra_info: String,
    pub check_in: String,
    pub check_out: String,
    pub max_guests: i32,
    pub price: i64,
}

/// A place ready to be persisted. Only constructed by the ownership layer.
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub owner_id: Uuid,
    pub attributes: PlaceAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(flatten)]
    pub attributes: PlaceAttributes,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    pub fn from_new(new: NewPlace) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            attributes: new.attributes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of this place with every photo reference passed through `f`.
    pub fn map_photos(mut self, f: impl Fn(&str) -> String) -> Self {
        self.attributes.photos = self.attributes.photos.iter().map(|p| f(p.as_str())).collect();
        self
    }
}
