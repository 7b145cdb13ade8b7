use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use staybook_core::session::SESSION_COOKIE;
use staybook_core::{CoreError, LoginRequest, RegisterRequest};
use staybook_shared::IdentitySummary;

use crate::{error::AppError, extract::AppJson, middleware::session_cookie, state::AppState};

#[derive(Debug, Serialize)]
struct AccountResponse {
    success: bool,
    user: IdentitySummary,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/profile", get(profile))
        .route("/api/logout", post(logout))
}

async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let user = state.accounts.register(req).await?;
    Ok(Json(AccountResponse { success: true, user }))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<AccountResponse>), AppError> {
    match state.accounts.login(req).await {
        Ok((user, token)) => {
            let jar = jar.add(session_cookie(&state, token));
            Ok((jar, Json(AccountResponse { success: true, user })))
        }
        Err(CoreError::NotFound(_) | CoreError::BadCredential)
            if state.auth.uniform_login_errors =>
        {
            Err(AppError::AuthenticationError("Invalid email or password".to_string()))
        }
        Err(CoreError::NotFound(_)) => Err(AppError::NotFoundError("User not found".to_string())),
        Err(e) => Err(e.into()),
    }
}

/// `null` without a session; 401 when the cookie holds a bad token.
async fn profile(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Option<IdentitySummary>>, AppError> {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value());
    let summary = state.accounts.profile(token).await?;
    Ok(Json(summary))
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<bool>) {
    let cleared = state.accounts.logout();
    (jar.add(session_cookie(&state, cleared)), Json(true))
}
