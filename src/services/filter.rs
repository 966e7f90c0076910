//! Lead table filters.
//!
//! Four independent criteria, all of which must match: free-text search,
//! status, source and exact creation day. An inactive criterion matches
//! everything, so the default filter is the identity. Order of the input
//! list is preserved.

use serde::Deserialize;

use crate::lead::{Lead, LeadSource, LeadStatus};

/// Sentinel meaning "no constraint" for the status and source selects.
pub const ALL: &str = "all";

/// Raw query-string form of the filters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterQuery {
    pub search: String,
    pub status: String,
    pub source: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status filter: {0}")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    /// Lowercased, trimmed query; `None` when blank.
    search: Option<String>,
    status: Option<LeadStatus>,
    source: Option<LeadSource>,
    /// `YYYY-MM-DD` compared against the first ten characters of `created_at`.
    date: Option<String>,
}

impl LeadFilter {
    #[must_use]
    pub fn search(mut self, query: &str) -> Self {
        let q = query.trim().to_lowercase();
        self.search = (!q.is_empty()).then_some(q);
        self
    }

    #[must_use]
    pub fn status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn source(mut self, source: LeadSource) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn date(mut self, day: &str) -> Self {
        let day = day.trim();
        self.date = (!day.is_empty()).then(|| day.to_owned());
        self
    }

    /// Build from query parameters. Blank or `all` disables a select.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStatus`] if `status` is not `all` or a known status.
    pub fn from_query(query: &FilterQuery) -> Result<Self, UnknownStatus> {
        let mut filter = Self::default().search(&query.search).date(&query.date);

        let status = query.status.trim();
        if !status.is_empty() && status != ALL {
            let parsed = LeadStatus::from_str(status).ok_or_else(|| UnknownStatus(status.to_owned()))?;
            filter = filter.status(parsed);
        }

        let source = query.source.trim();
        if !source.is_empty() && source != ALL {
            filter = filter.source(LeadSource::from(source.to_owned()));
        }

        Ok(filter)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    #[must_use]
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(q) = &self.search {
            if !search_matches(lead, q) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != lead.status) {
            return false;
        }
        if self.source.as_ref().is_some_and(|s| *s != lead.source) {
            return false;
        }
        if self.date.as_deref().is_some_and(|d| d != lead.created_day()) {
            return false;
        }
        true
    }

    /// The matching subsequence of `leads`, in input order.
    #[must_use]
    pub fn apply<'a>(&self, leads: &'a [Lead]) -> Vec<&'a Lead> {
        leads.iter().filter(|l| self.matches(l)).collect()
    }
}

fn search_matches(lead: &Lead, q: &str) -> bool {
    let contains = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(q));
    lead.full_name().to_lowercase().contains(q)
        || contains(Some(&lead.phone))
        || contains(lead.salesperson_name.as_deref())
        || contains(lead.salesperson_email.as_deref())
        || contains(lead.interest.as_deref())
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
