pub mod app_config;
pub mod database;
pub mod identity_repo;
pub mod place_repo;
pub mod booking_repo;

pub use database::DbClient;
pub use identity_repo::StoreIdentityRepository;
pub use place_repo::StorePlaceRepository;
pub use booking_repo::StoreBookingRepository;
