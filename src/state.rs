//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parsed configuration and, when the backend is configured, the
//! auth and lead-store handles. Without a backend the service still serves
//! the setup status; every backend-dependent handler gets
//! `ApiError::SetupRequired` from [`AppState::backend`].

use std::sync::Arc;

use crate::backend::supabase::SupabaseClient;
use crate::backend::{AuthProvider, BackendError, LeadStore};
use crate::config::{AppConfig, BackendSetup};
use crate::error::ApiError;

/// Handles to the hosted backend. Both usually point at the same client.
#[derive(Clone)]
pub struct Backend {
    pub auth: Arc<dyn AuthProvider>,
    pub leads: Arc<dyn LeadStore>,
}

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    backend: Option<Backend>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, backend: Option<Backend>) -> Self {
        Self { config: Arc::new(config), backend }
    }

    /// Build state from configuration, connecting the Supabase client when
    /// the backend is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: AppConfig) -> Result<Self, BackendError> {
        let backend = match &config.backend {
            BackendSetup::Configured(backend) => {
                let client = Arc::new(SupabaseClient::new(backend)?);
                Some(Backend { auth: client.clone(), leads: client })
            }
            BackendSetup::Missing(_) => None,
        };
        Ok(Self::new(config, backend))
    }

    /// The backend handles, or `SetupRequired` naming the missing variables.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::SetupRequired`] when no backend is configured.
    pub fn backend(&self) -> Result<&Backend, ApiError> {
        self.backend.as_ref().ok_or_else(|| ApiError::SetupRequired {
            missing: match &self.config.backend {
                BackendSetup::Missing(missing) => missing.clone(),
                BackendSetup::Configured(_) => Vec::new(),
            },
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    #[must_use]
    pub fn is_admin(&self, email: &str) -> bool {
        self.config.admins.is_admin(email)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
