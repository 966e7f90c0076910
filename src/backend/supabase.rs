//! Supabase HTTP client.
//!
//! Talks to two services of one project: `GoTrue` (`/auth/v1`) for password
//! sessions and `PostgREST` (`/rest/v1`) for the `leads` table. Every request
//! carries the anonymous `apikey`; data requests also carry the user's
//! bearer token so row-level security applies.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::{AuthProvider, BackendError, BackendUser, LeadStore, Session};
use crate::config::BackendConfig;
use crate::lead::{Lead, NewLead};

const LEADS_TABLE: &str = "leads";

pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Build a client for the configured project.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_owned(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{LEADS_TABLE}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = request
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| BackendError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::ApiRequest(e.to_string()))?;
        if !status.is_success() {
            return Err(BackendError::ApiResponse {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }
        Ok(text)
    }

    async fn send_parsed<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let text = self.send(request).await?;
        serde_json::from_str(&text).map_err(|e| BackendError::ApiParse(e.to_string()))
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> Result<Session, BackendError> {
        let request = self
            .http
            .post(self.auth_url("/token"))
            .query(&[("grant_type", grant_type)])
            .json(&body);
        self.send_parsed(request).await
    }
}

/// Pull the human-readable message out of an error body.
///
/// `GoTrue` uses `error_description` or `msg`, `PostgREST` uses `message`;
/// fall back to the raw body, then to the status line.
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                if !msg.trim().is_empty() {
                    return msg.to_owned();
                }
            }
        }
    }
    let body = body.trim();
    if body.is_empty() { status.to_string() } else { body.to_owned() }
}

#[async_trait::async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        self.token_grant("password", serde_json::json!({ "email": email, "password": password }))
            .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, BackendError> {
        self.token_grant("refresh_token", serde_json::json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn user(&self, access_token: &str) -> Result<BackendUser, BackendError> {
        let request = self
            .http
            .get(self.auth_url("/user"))
            .bearer_auth(access_token);
        self.send_parsed(request).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let request = self
            .http
            .post(self.auth_url("/logout"))
            .bearer_auth(access_token);
        self.send(request).await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl LeadStore for SupabaseClient {
    async fn insert(&self, access_token: &str, lead: &NewLead) -> Result<Lead, BackendError> {
        let request = self
            .http
            .post(self.table_url())
            .bearer_auth(access_token)
            .header("Prefer", "return=representation")
            .json(lead);
        let rows: Vec<Lead> = self.send_parsed(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::ApiParse("insert returned no rows".into()))
    }

    async fn list(&self, access_token: &str) -> Result<Vec<Lead>, BackendError> {
        let request = self
            .http
            .get(self.table_url())
            .bearer_auth(access_token)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        self.send_parsed(request).await
    }

    async fn delete(&self, access_token: &str, id: Uuid) -> Result<(), BackendError> {
        let request = self
            .http
            .delete(self.table_url())
            .bearer_auth(access_token)
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{id}"))]);
        let rows: Vec<serde_json::Value> = self.send_parsed(request).await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "supabase_test.rs"]
mod tests;
