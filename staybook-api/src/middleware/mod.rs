pub mod auth;

pub use auth::{session_cookie, CurrentIdentity};
