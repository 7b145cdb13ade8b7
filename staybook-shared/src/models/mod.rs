pub mod identity;
pub mod place;
pub mod booking;

pub use identity::{Identity, IdentityRef, IdentitySummary};
pub use place::{NewPlace, Place, PlaceAttributes};
pub use booking::{Booking, BookingDraft, BookingWithPlace, NewBooking};
