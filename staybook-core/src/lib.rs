pub mod session;
pub mod ownership;
pub mod password;
pub mod repository;
pub mod memory;
pub mod identity;
pub mod places;
pub mod bookings;

pub use session::{SessionAuthenticator, SessionClaims};
pub use ownership::{attribute_creation, authorize_mutation, Decision, DenyReason, Owned};
pub use identity::{AccountService, LoginRequest, RegisterRequest};
pub use places::PlaceService;
pub use bookings::BookingService;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid or expired session")]
    InvalidCredential,
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Not the owner of this resource")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(String),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Incorrect password")]
    BadCredential,
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
