//! Service configuration parsed once at startup.
//!
//! DESIGN
//! ======
//! Every environment lookup happens here. `main` builds an `AppConfig` and
//! hands it to `AppState`; nothing downstream reads the environment. A
//! missing backend URL or key is not fatal: the service starts in
//! setup-required mode and reports which variables are absent.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_EXPORT_FILE_PREFIX: &str = "Leads";
pub const DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for BackendTimeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Connection settings for the hosted backend project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project base URL, without trailing slash.
    pub url: String,
    /// Public anonymous API key sent as `apikey` on every call.
    pub anon_key: String,
    pub timeouts: BackendTimeouts,
}

/// Whether the backend can be reached at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSetup {
    Configured(BackendConfig),
    /// Names of the variables that were absent or blank.
    Missing(Vec<&'static str>),
}

/// Email allow-list for the admin role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminList {
    emails: Vec<String>,
}

impl AdminList {
    /// Parse a comma-separated list; entries are trimmed and lowercased.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let emails = raw
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    #[must_use]
    pub fn is_admin(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        !email.is_empty() && self.emails.contains(&email)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub backend: BackendSetup,
    pub admins: AdminList,
    pub cookie_secure: bool,
    /// Directory of static front-end assets, served as the router fallback.
    pub website_dir: Option<String>,
    pub export_file_prefix: String,
}

// =============================================================================
// PARSING
// =============================================================================

impl AppConfig {
    /// Build from the process environment.
    ///
    /// Recognized variables:
    /// - `SUPABASE_URL`, `SUPABASE_ANON_KEY`: backend project (setup-required when blank)
    /// - `ADMIN_EMAILS`: comma-separated admin allow-list
    /// - `PORT`: default 3000
    /// - `COOKIE_SECURE`: `1/true/yes/on` or `0/false/no/off`, default false
    /// - `WEBSITE_DIR`: static asset directory
    /// - `EXPORT_FILE_PREFIX`: default `Leads`
    /// - `BACKEND_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BACKEND_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let timeouts = BackendTimeouts {
            request_secs: parse_secs(
                lookup("BACKEND_REQUEST_TIMEOUT_SECS").as_deref(),
                DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS,
            ),
            connect_secs: parse_secs(
                lookup("BACKEND_CONNECT_TIMEOUT_SECS").as_deref(),
                DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS,
            ),
        };

        let url = non_blank(SUPABASE_URL_VAR);
        let anon_key = non_blank(SUPABASE_ANON_KEY_VAR);
        let backend = match (url, anon_key) {
            (Some(url), Some(anon_key)) => BackendSetup::Configured(BackendConfig {
                url: url.trim_end_matches('/').to_owned(),
                anon_key,
                timeouts,
            }),
            (url, key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push(SUPABASE_URL_VAR);
                }
                if key.is_none() {
                    missing.push(SUPABASE_ANON_KEY_VAR);
                }
                BackendSetup::Missing(missing)
            }
        };

        Self {
            port: parse_or(lookup("PORT").as_deref(), DEFAULT_PORT),
            backend,
            admins: AdminList::parse(&lookup("ADMIN_EMAILS").unwrap_or_default()),
            cookie_secure: lookup("COOKIE_SECURE")
                .as_deref()
                .and_then(parse_bool)
                .unwrap_or(false),
            website_dir: non_blank("WEBSITE_DIR"),
            export_file_prefix: non_blank("EXPORT_FILE_PREFIX").unwrap_or_else(|| DEFAULT_EXPORT_FILE_PREFIX.to_owned()),
        }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// A zero timeout would fail every request immediately, so it counts as unset.
fn parse_secs(raw: Option<&str>, default: u64) -> u64 {
    match parse_or(raw, default) {
        0 => default,
        secs => secs,
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
