use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::place::Place;

/// Booking fields a caller may supply. There is no user field: attribution
/// comes from the session only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    #[serde(alias = "place")]
    pub place_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    pub number_of_guests: i32,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub price: i64,
}

fn default_guests() -> i32 {
    1
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub draft: BookingDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub place_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: i32,
    pub name: String,
    pub phone: String,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn from_new(new: NewBooking) -> Self {
        let NewBooking { user_id, draft } = new;
        Self {
            id: Uuid::new_v4(),
            user_id,
            place_id: draft.place_id,
            check_in: draft.check_in,
            check_out: draft.check_out,
            number_of_guests: draft.number_of_guests,
            name: draft.name,
            phone: draft.phone,
            price: draft.price,
            created_at: Utc::now(),
        }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// A booking with its place embedded, as listed back to the booker.
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithPlace {
    #[serde(flatten)]
    pub booking: Booking,
    pub place: Option<Place>,
}
