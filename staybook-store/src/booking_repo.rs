use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use staybook_core::repository::BookingRepository;
use staybook_core::CoreResult;
use staybook_shared::{Booking, NewBooking};
use uuid::Uuid;

use crate::database::storage_error;

pub struct StoreBookingRepository {
    pool: PgPool,
}

impl StoreBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    place_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
    number_of_guests: i32,
    name: String,
    phone: String,
    price: i64,
    created_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            user_id: row.user_id,
            place_id: row.place_id,
            check_in: row.check_in,
            check_out: row.check_out,
            number_of_guests: row.number_of_guests,
            name: row.name,
            phone: row.phone,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl BookingRepository for StoreBookingRepository {
    async fn insert(&self, booking: NewBooking) -> CoreResult<Booking> {
        let booking = Booking::from_new(booking);

        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, place_id, check_in, check_out, number_of_guests,
                name, phone, price, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.place_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.number_of_guests)
        .bind(&booking.name)
        .bind(&booking.phone)
        .bind(booking.price)
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(booking)
    }

    async fn list_by_user(&self, user_id: Uuid) -> CoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, user_id, place_id, check_in, check_out, number_of_guests, name, phone,
                price, created_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }
}
