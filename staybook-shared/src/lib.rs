pub mod models;
pub mod pii;

pub use models::{
    Booking, BookingDraft, BookingWithPlace, Identity, IdentityRef, IdentitySummary, NewBooking,
    NewPlace, Place, PlaceAttributes,
};
