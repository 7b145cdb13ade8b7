use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use staybook_core::session::SESSION_COOKIE;
use staybook_shared::IdentityRef;

use crate::{error::AppError, state::AppState};

/// The authenticated caller of a protected endpoint.
///
/// Reads the session cookie, verifies the token and checks that the identity
/// still exists. Handlers taking this never run for anonymous or forged
/// requests.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub IdentityRef);

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).map(|c| c.value());

        let identity = state.accounts.authenticate(token).await?;
        Ok(CurrentIdentity(identity))
    }
}

/// HTTP-only session cookie; an empty `value` is the logout overwrite.
pub fn session_cookie(state: &AppState, value: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.auth.cookie_secure)
        .build()
}
