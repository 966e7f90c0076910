//! Backend: auth and lead storage delegated to a hosted service.
//!
//! DESIGN
//! ======
//! Two provider-neutral async traits sit at the seam: [`AuthProvider`] for
//! password sessions and [`LeadStore`] for the `leads` table. The Supabase
//! HTTP client implements both; route tests swap in an in-memory mock.
//! Every call is a single request with no retry; failures surface the
//! provider's own message.

pub mod supabase;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::lead::{Lead, NewLead};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request could not be completed.
    #[error("backend request failed: {0}")]
    ApiRequest(String),

    /// The backend answered with a non-success status. `message` is the
    /// provider's text, shown to the user unchanged.
    #[error("{message}")]
    ApiResponse { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("backend response parse failed: {0}")]
    ApiParse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The targeted record does not exist or is not visible to the caller.
    #[error("record not found")]
    NotFound,
}

impl ErrorCode for BackendError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ApiRequest(_) => "E_BACKEND_REQUEST",
            Self::ApiResponse { .. } => "E_BACKEND_RESPONSE",
            Self::ApiParse(_) => "E_BACKEND_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::NotFound => "E_NOT_FOUND",
        }
    }
}

// =============================================================================
// SESSION TYPES
// =============================================================================

/// Identity claims of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens issued by a successful sign-in or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: BackendUser,
}

// =============================================================================
// TRAITS
// =============================================================================

/// Password authentication against the hosted identity provider.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// Returns the provider's rejection (e.g. invalid credentials) verbatim.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    /// Exchange a refresh token for a fresh session.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh token is expired or revoked.
    async fn refresh(&self, refresh_token: &str) -> Result<Session, BackendError>;

    /// Resolve the user behind an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or expired.
    async fn user(&self, access_token: &str) -> Result<BackendUser, BackendError>;

    /// Revoke the session behind an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the call.
    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;
}

/// The `leads` table, accessed with the caller's own access token so the
/// backend's row-level rules decide visibility.
#[async_trait::async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert one lead and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection verbatim.
    async fn insert(&self, access_token: &str, lead: &NewLead) -> Result<Lead, BackendError>;

    /// All visible leads, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    async fn list(&self, access_token: &str) -> Result<Vec<Lead>, BackendError>;

    /// Delete one lead by id.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when no visible row matched.
    async fn delete(&self, access_token: &str, id: Uuid) -> Result<(), BackendError>;
}
