//! Presentation view models.
//!
//! DESIGN
//! ======
//! The browser front end only lays these out. Every display decision
//! (placeholders, labels, date format, tag truncation, admin-only columns)
//! is made here so it can be tested without a browser.

use serde::Serialize;

use crate::lead::{LEAD_TAGS, Lead, LeadSource, LeadStatus, display_name};
use crate::services::export::format_display_day;
use crate::services::stats::LeadStats;

/// Placeholder for absent values in table cells.
pub const EMPTY_CELL: &str = "—";

/// Tags shown per row before collapsing into `+N more`.
pub const VISIBLE_TAGS: usize = 3;

pub const EMPTY_TABLE_MESSAGE: &str = "No leads found";

// =============================================================================
// TABLE ROW
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadRow {
    pub id: uuid::Uuid,
    pub name: String,
    pub phone: String,
    pub interest: String,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    /// Count of tags beyond [`VISIBLE_TAGS`].
    pub more_tags: usize,
    /// Single-cell rendering of the tags column.
    pub tags_display: String,
    /// Admin-only column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesperson: Option<String>,
    pub budget: String,
    pub source: String,
    pub date: String,
}

impl LeadRow {
    #[must_use]
    pub fn new(lead: &Lead, admin: bool) -> Self {
        let tags: Vec<String> = lead.tags.iter().take(VISIBLE_TAGS).cloned().collect();
        let more_tags = lead.tags.len().saturating_sub(VISIBLE_TAGS);
        let tags_display = if tags.is_empty() {
            EMPTY_CELL.to_owned()
        } else if more_tags > 0 {
            format!("{} +{more_tags} more", tags.join(", "))
        } else {
            tags.join(", ")
        };

        Self {
            id: lead.id,
            name: lead.full_name().trim().to_owned(),
            phone: lead.phone.clone(),
            interest: or_empty_cell(lead.interest.as_deref()),
            status: lead.status,
            tags,
            more_tags,
            tags_display,
            salesperson: admin.then(|| or_empty_cell(lead.salesperson())),
            budget: or_empty_cell(lead.budget.as_deref()),
            source: lead.source.table_label().to_owned(),
            date: lead
                .created_on()
                .and_then(format_display_day)
                .unwrap_or_else(|| EMPTY_CELL.to_owned()),
        }
    }
}

fn or_empty_cell(value: Option<&str>) -> String {
    value.unwrap_or(EMPTY_CELL).to_owned()
}

// =============================================================================
// HEADER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub email: String,
    /// Avatar letter: first character of the email, uppercased.
    pub initial: String,
    pub display_name: String,
    pub is_admin: bool,
    pub welcome: String,
    pub table_heading: &'static str,
}

impl Header {
    #[must_use]
    pub fn new(email: &str, is_admin: bool) -> Self {
        let display_name = display_name(email);
        let welcome = if is_admin {
            "Welcome, Admin".to_owned()
        } else {
            format!("Welcome back, {display_name}")
        };
        Self {
            email: email.to_owned(),
            initial: email
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default(),
            display_name,
            is_admin,
            welcome,
            table_heading: if is_admin { "All Walk-in Leads" } else { "My Walk-in Leads" },
        }
    }
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StatCard {
    pub value: usize,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub header: Header,
    pub stats: Vec<StatCard>,
    pub rows: Vec<LeadRow>,
    pub shown: usize,
    pub showing: String,
    /// Set when the filtered table is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
}

impl Dashboard {
    /// `stats` covers the full list; `rows` only the filtered leads.
    #[must_use]
    pub fn new<'a>(header: Header, stats: &LeadStats, filtered: impl IntoIterator<Item = &'a Lead>) -> Self {
        let rows: Vec<LeadRow> = filtered
            .into_iter()
            .map(|l| LeadRow::new(l, header.is_admin))
            .collect();
        let shown = rows.len();
        Self {
            stats: stats
                .cards()
                .into_iter()
                .map(|(value, label)| StatCard { value, label })
                .collect(),
            header,
            empty_message: (shown == 0).then_some(EMPTY_TABLE_MESSAGE),
            showing: format!("Showing {shown} leads"),
            shown,
            rows,
        }
    }
}

// =============================================================================
// FORM OPTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormOptions {
    pub statuses: Vec<SelectOption>,
    pub sources: Vec<SelectOption>,
    pub tags: &'static [&'static str],
    pub default_status: LeadStatus,
    pub default_source: LeadSource,
}

impl FormOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            statuses: LeadStatus::ALL
                .iter()
                .map(|s| SelectOption { value: s.as_str().to_owned(), label: s.label().to_owned() })
                .collect(),
            sources: LeadSource::KNOWN
                .iter()
                .map(|s| SelectOption { value: s.as_str().to_owned(), label: s.form_label().to_owned() })
                .collect(),
            tags: &LEAD_TAGS,
            default_status: LeadStatus::default(),
            default_source: LeadSource::default(),
        }
    }
}

impl Default for FormOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;
