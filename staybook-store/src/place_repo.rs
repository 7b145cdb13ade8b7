use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use staybook_core::repository::PlaceRepository;
use staybook_core::CoreResult;
use staybook_shared::{NewPlace, Place, PlaceAttributes};
use uuid::Uuid;

use crate::database::storage_error;

pub struct StorePlaceRepository {
    pool: PgPool,
}

impl StorePlaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PLACE_COLUMNS: &str = "id, owner_id, title, address, photos, description, perks, \
    extra_info, check_in, check_out, max_guests, price, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct PlaceRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    address: String,
    photos: Vec<String>,
    description: String,
    perks: Vec<String>,
    extra_info: String,
    check_in: String,
    check_out: String,
    max_guests: i32,
    price: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PlaceRow> for Place {
    fn from(row: PlaceRow) -> Self {
        Place {
            id: row.id,
            owner_id: row.owner_id,
            attributes: PlaceAttributes {
                title: row.title,
                address: row.address,
                photos: row.photos,
                description: row.description,
                perks: row.perks,
                extra_info: row.extra_info,
                check_in: row.check_in,
                check_out: row.check_out,
                max_guests: row.max_guests,
                price: row.price,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PlaceRepository for StorePlaceRepository {
    async fn insert(&self, place: NewPlace) -> CoreResult<Place> {
        let place = Place::from_new(place);
        let a = &place.attributes;

        sqlx::query(
            r#"
            INSERT INTO places (id, owner_id, title, address, photos, description, perks,
                extra_info, check_in, check_out, max_guests, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(place.id)
        .bind(place.owner_id)
        .bind(&a.title)
        .bind(&a.address)
        .bind(&a.photos)
        .bind(&a.description)
        .bind(&a.perks)
        .bind(&a.extra_info)
        .bind(&a.check_in)
        .bind(&a.check_out)
        .bind(a.max_guests)
        .bind(a.price)
        .bind(place.created_at)
        .bind(place.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(place)
    }

    async fn find(&self, id: Uuid) -> CoreResult<Option<Place>> {
        let row = sqlx::query_as::<_, PlaceRow>(&format!(
            "SELECT {} FROM places WHERE id = $1",
            PLACE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(Place::from))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> CoreResult<Vec<Place>> {
        let rows = sqlx::query_as::<_, PlaceRow>(&format!(
            "SELECT {} FROM places WHERE owner_id = $1 ORDER BY created_at",
            PLACE_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(Place::from).collect())
    }

    async fn list_all(&self) -> CoreResult<Vec<Place>> {
        let rows = sqlx::query_as::<_, PlaceRow>(&format!(
            "SELECT {} FROM places ORDER BY created_at",
            PLACE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(Place::from).collect())
    }

    async fn update_attributes(
        &self,
        id: Uuid,
        attributes: PlaceAttributes,
    ) -> CoreResult<Option<Place>> {
        // owner_id is not in the SET list
        let row = sqlx::query_as::<_, PlaceRow>(&format!(
            r#"
            UPDATE places
            SET title = $2, address = $3, photos = $4, description = $5, perks = $6,
                extra_info = $7, check_in = $8, check_out = $9, max_guests = $10, price = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PLACE_COLUMNS
        ))
        .bind(id)
        .bind(&attributes.title)
        .bind(&attributes.address)
        .bind(&attributes.photos)
        .bind(&attributes.description)
        .bind(&attributes.perks)
        .bind(&attributes.extra_info)
        .bind(&attributes.check_in)
        .bind(&attributes.check_out)
        .bind(attributes.max_guests)
        .bind(attributes.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(Place::from))
    }
}
