//! Lead routes: intake, table, stats, delete and spreadsheet export.
//!
//! DESIGN
//! ======
//! Every signed-in user reads through their own access token, so the
//! backend's row rules decide which leads come back (own leads for sales
//! staff, everything for admins). Filtering and stats run here over the
//! returned list. Delete and export additionally require the admin list.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::auth::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::lead::{Lead, LeadForm, search_tags};
use crate::services::export::{ExportError, XLSX_CONTENT_TYPE, export_filename, workbook_bytes};
use crate::services::filter::{FilterQuery, LeadFilter};
use crate::services::stats::LeadStats;
use crate::state::AppState;
use crate::views::{Dashboard, FormOptions, Header};

pub const SUBMITTED_MESSAGE: &str = "Lead submitted successfully";
pub const DELETED_MESSAGE: &str = "Lead deleted";

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Fetch every lead visible to the caller, newest first.
async fn fetch_leads(state: &AppState, auth: &AuthUser) -> Result<Vec<Lead>, ApiError> {
    let backend = state.backend()?;
    backend
        .leads
        .list(&auth.token)
        .await
        .inspect_err(|e| tracing::warn!(email = %auth.email, error = %e, "lead list fetch failed"))
        .map_err(ApiError::from)
}

fn parse_filter(query: &FilterQuery) -> Result<LeadFilter, ApiError> {
    LeadFilter::from_query(query).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LeadList {
    /// Leads visible to the caller before filtering.
    pub total: usize,
    pub shown: usize,
    pub leads: Vec<Lead>,
}

#[derive(Debug, Serialize)]
pub struct Submitted {
    pub message: &'static str,
    pub lead: Lead,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub ok: bool,
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TagQuery {
    pub q: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/leads`: filtered lead list.
pub async fn list_leads(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Json<LeadList>, ApiError> {
    let Query(query) = query?;
    let filter = parse_filter(&query)?;
    let leads = fetch_leads(&state, &auth).await?;
    let total = leads.len();
    let leads: Vec<Lead> = filter.apply(&leads).into_iter().cloned().collect();
    tracing::debug!(email = %auth.email, total, shown = leads.len(), filtered = filter.is_active(), "leads listed");
    Ok(Json(LeadList { total, shown: leads.len(), leads }))
}

/// `POST /api/leads`: validate and store a walk-in lead.
///
/// Validation failures never reach the backend.
pub async fn create_lead(
    State(state): State<AppState>,
    auth: AuthUser,
    form: Result<Json<LeadForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Submitted>), ApiError> {
    let Json(form) = form?;
    let new_lead = form.validate(Some(&auth.email))?;
    let backend = state.backend()?;
    let lead = backend.leads.insert(&auth.token, &new_lead).await?;
    tracing::info!(lead_id = %lead.id, salesperson = %auth.email, "lead submitted");
    Ok((StatusCode::CREATED, Json(Submitted { message: SUBMITTED_MESSAGE, lead })))
}

/// `DELETE /api/leads/{id}`: admin only.
pub async fn delete_lead(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Deleted>, ApiError> {
    let Path(id) = id?;
    let backend = state.backend()?;
    backend.leads.delete(&admin.token, id).await?;
    tracing::info!(lead_id = %id, admin = %admin.email, "lead deleted");
    Ok(Json(Deleted { ok: true, message: DELETED_MESSAGE }))
}

/// `GET /api/leads/stats`: summary cards over every visible lead.
pub async fn lead_stats(State(state): State<AppState>, auth: AuthUser) -> Result<Json<LeadStats>, ApiError> {
    let leads = fetch_leads(&state, &auth).await?;
    Ok(Json(LeadStats::compute(&leads, today())))
}

/// `GET /api/leads/export.xlsx`: admin only; exports the filtered list.
pub async fn export_leads(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let filter = parse_filter(&query)?;
    let leads = fetch_leads(&state, &admin).await?;
    let rows = filter.apply(&leads);
    let bytes = workbook_bytes(rows.iter().copied())?;
    let filename = export_filename(&state.config.export_file_prefix, today());
    tracing::info!(rows = rows.len(), admin = %admin.email, %filename, "leads exported");

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|_| ExportError::InvalidFilename(filename.clone()))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// `GET /api/dashboard`: header, stat cards and filtered table rows.
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Json<Dashboard>, ApiError> {
    let Query(query) = query?;
    let filter = parse_filter(&query)?;
    let leads = fetch_leads(&state, &auth).await?;
    let summary = LeadStats::compute(&leads, today());
    let header = Header::new(&auth.email, auth.is_admin);
    Ok(Json(Dashboard::new(header, &summary, filter.apply(&leads))))
}

/// `GET /api/form`: select options and defaults for the intake form.
pub async fn form_options() -> Json<FormOptions> {
    Json(FormOptions::new())
}

/// `GET /api/tags?q=`: tag suggestions.
pub async fn tags(Query(query): Query<TagQuery>) -> Json<Vec<&'static str>> {
    Json(search_tags(&query.q))
}

#[cfg(test)]
#[path = "leads_test.rs"]
mod tests;
