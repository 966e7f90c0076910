//! Auth routes: password sign-in, session cookies, setup status.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;
use uuid::Uuid;

use crate::backend::{BackendError, Session};
use crate::config::BackendSetup;
use crate::error::ApiError;
use crate::lead::display_name;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Auth cookies outlive the access token; the client renews via `/api/auth/refresh`.
const COOKIE_MAX_AGE_DAYS: i64 = 30;

fn auth_cookie(name: &'static str, value: String, secure: bool, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

fn with_session(jar: CookieJar, session: &Session, secure: bool) -> CookieJar {
    let max_age = Duration::days(COOKIE_MAX_AGE_DAYS);
    jar.add(auth_cookie(SESSION_COOKIE, session.access_token.clone(), secure, max_age))
        .add(auth_cookie(REFRESH_COOKIE, session.refresh_token.clone(), secure, max_age))
}

fn without_session(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(auth_cookie(SESSION_COOKIE, String::new(), secure, Duration::ZERO))
        .add(auth_cookie(REFRESH_COOKIE, String::new(), secure, Duration::ZERO))
}

// =============================================================================
// AUTH EXTRACTORS
// =============================================================================

/// Signed-in user resolved from the session cookie.
/// Use as a handler parameter to require authentication.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
    /// Access token, forwarded to the backend so row-level rules apply.
    pub token: String,
}

/// Resolve the session cookie against the identity provider.
async fn resolve_user(state: &AppState, jar: &CookieJar) -> Result<AuthUser, ApiError> {
    let backend = state.backend()?;
    let token = jar
        .get(SESSION_COOKIE)
        .map(Cookie::value)
        .unwrap_or_default();
    if token.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    let user = backend
        .auth
        .user(token)
        .await
        .map_err(|e| match e {
            BackendError::ApiResponse { status: 401 | 403, .. } => ApiError::Unauthorized,
            other => other.into(),
        })?;
    let email = user.email.unwrap_or_default();

    Ok(AuthUser { id: user.id, is_admin: state.is_admin(&email), email, token: token.to_owned() })
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        resolve_user(&app_state, &jar).await
    }
}

/// Signed-in user on the admin allow-list.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> axum::extract::FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(ApiError::Forbidden("admin access required"));
        }
        Ok(Self(user))
    }
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
}

impl From<&AuthUser> for UserView {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: display_name(&user.email),
            is_admin: user.is_admin,
        }
    }
}

/// Which screen the front end should show.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionView {
    SetupRequired { missing: Vec<&'static str> },
    SignedOut,
    SignedIn { user: UserView },
}

#[derive(Debug, Serialize)]
pub struct SetupStatus {
    pub configured: bool,
    pub missing: Vec<&'static str>,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/setup`: whether the backend URL and key are configured.
pub async fn setup(State(state): State<AppState>) -> Json<SetupStatus> {
    let missing = match &state.config.backend {
        BackendSetup::Missing(missing) => missing.clone(),
        BackendSetup::Configured(_) => Vec::new(),
    };
    Json(SetupStatus { configured: state.is_configured(), missing })
}

/// `GET /api/session`: setup-required, signed-out or signed-in.
pub async fn session(State(state): State<AppState>, jar: CookieJar) -> Result<Json<SessionView>, ApiError> {
    match resolve_user(&state, &jar).await {
        Ok(user) => Ok(Json(SessionView::SignedIn { user: UserView::from(&user) })),
        Err(ApiError::SetupRequired { missing }) => Ok(Json(SessionView::SetupRequired { missing })),
        Err(ApiError::Unauthorized) => Ok(Json(SessionView::SignedOut)),
        Err(e) => Err(e),
    }
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login`: password sign-in; sets the session cookies.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<(CookieJar, Json<SessionView>), ApiError> {
    let Json(body) = body?;
    let backend = state.backend()?;
    let email = body.email.trim();
    let session = backend
        .auth
        .sign_in(email, &body.password)
        .await
        .inspect_err(|e| tracing::info!(%email, error = %e, "sign-in rejected"))?;

    let email = session.user.email.clone().unwrap_or_default();
    tracing::info!(%email, expires_in = ?session.expires_in, "signed in");
    let user = AuthUser {
        id: session.user.id,
        is_admin: state.is_admin(&email),
        email,
        token: session.access_token.clone(),
    };
    let jar = with_session(jar, &session, state.config.cookie_secure);
    Ok((jar, Json(SessionView::SignedIn { user: UserView::from(&user) })))
}

/// `POST /api/auth/refresh`: trade the refresh cookie for a new session.
pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Result<(CookieJar, Json<SessionView>), ApiError> {
    let backend = state.backend()?;
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(Cookie::value)
        .unwrap_or_default();
    if refresh_token.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    let session = match backend.auth.refresh(refresh_token).await {
        Ok(session) => session,
        Err(BackendError::ApiResponse { status: 400 | 401 | 403, .. }) => return Err(ApiError::Unauthorized),
        Err(e) => return Err(e.into()),
    };

    let email = session.user.email.clone().unwrap_or_default();
    let user = AuthUser {
        id: session.user.id,
        is_admin: state.is_admin(&email),
        email,
        token: session.access_token.clone(),
    };
    let jar = with_session(jar, &session, state.config.cookie_secure);
    Ok((jar, Json(SessionView::SignedIn { user: UserView::from(&user) })))
}

/// `POST /api/auth/logout`: revoke the session and clear cookies.
pub async fn logout(State(state): State<AppState>, auth: AuthUser, jar: CookieJar) -> impl IntoResponse {
    if let Ok(backend) = state.backend() {
        if let Err(e) = backend.auth.sign_out(&auth.token).await {
            tracing::warn!(email = %auth.email, error = %e, "backend sign-out failed; clearing cookies anyway");
        }
    }
    (without_session(jar, state.config.cookie_secure), StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`: current user.
pub async fn me(auth: AuthUser) -> Json<UserView> {
    Json(UserView::from(&auth))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
