//! Lead records and the intake form.
//!
//! DESIGN
//! ======
//! `Lead` mirrors a row of the backend `leads` table. `LeadForm` is the raw
//! submission (strings, empty meaning absent); `LeadForm::validate` turns it
//! into a `NewLead` insert payload or a `FormError` without touching the
//! backend. Records are never updated once stored.

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;
use time::macros::format_description;
use uuid::Uuid;

use crate::error::ErrorCode;

/// Fixed tag catalog offered by the form. Stored tags are not limited to it.
pub const LEAD_TAGS: [&str; 27] = [
    "Interested",
    "Potential Client",
    "Ready to Move",
    "Seeking Information",
    "Need Probing",
    "Need Assistance",
    "Meeting Booked",
    "Meeting Done",
    "Details Sent",
    "Will Update After Calling",
    "Busy at the Moment",
    "Future Perspective",
    "Timeline Issue",
    "Budget Issue",
    "Expensive Issue",
    "Location Issue",
    "Project Issue",
    "Not Interested",
    "Totally Not Interested",
    "Irrelevant",
    "Already Aligned with Someone",
    "Bought Somewhere Else",
    "Archive Lead",
    "Expired Lead",
    "Commercial Interested",
    "Dealer / Realtor",
    "Token Received",
];

// =============================================================================
// STATUS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Hot,
    Warm,
    Cold,
}

impl LeadStatus {
    pub const ALL: [Self; 4] = [Self::New, Self::Hot, Self::Warm, Self::Cold];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Hot => "Hot",
            Self::Warm => "Warm",
            Self::Cold => "Cold",
        }
    }

    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

// =============================================================================
// SOURCE
// =============================================================================

/// Where the lead came from. Values outside the known four are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadSource {
    #[default]
    WalkIn,
    Referral,
    OnlineWebsite,
    EventExhibition,
    Other(String),
}

impl LeadSource {
    pub const KNOWN: [Self; 4] = [Self::WalkIn, Self::Referral, Self::OnlineWebsite, Self::EventExhibition];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::WalkIn => "walk-in",
            Self::Referral => "referral",
            Self::OnlineWebsite => "online-website",
            Self::EventExhibition => "event-exhibition",
            Self::Other(raw) => raw,
        }
    }

    /// Short label used in the lead table.
    #[must_use]
    pub fn table_label(&self) -> &str {
        match self {
            Self::WalkIn => "Walk-in",
            Self::Referral => "Referral",
            Self::OnlineWebsite => "Online",
            Self::EventExhibition => "Event",
            Self::Other(raw) => raw,
        }
    }

    /// Long label used in the intake form's select.
    #[must_use]
    pub fn form_label(&self) -> &str {
        match self {
            Self::WalkIn => "Walk-in",
            Self::Referral => "Referral",
            Self::OnlineWebsite => "Online-Website",
            Self::EventExhibition => "Event-Exhibition",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for LeadSource {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "walk-in" => Self::WalkIn,
            "referral" => Self::Referral,
            "online-website" => Self::OnlineWebsite,
            "event-exhibition" => Self::EventExhibition,
            _ => Self::Other(raw),
        }
    }
}

impl From<LeadSource> for String {
    fn from(source: LeadSource) -> Self {
        match source {
            LeadSource::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

// =============================================================================
// LEAD
// =============================================================================

/// A stored walk-in inquiry. Mirrors the backend `leads` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    /// Creation timestamp exactly as the backend returned it.
    pub created_at: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    /// National identity card number.
    #[serde(rename = "cnic")]
    pub national_id: Option<String>,
    pub interest: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LeadStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub budget: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: LeadSource,
    pub followup_date: Option<String>,
    pub notes: Option<String>,
    pub salesperson_email: Option<String>,
    pub salesperson_name: Option<String>,
}

impl Lead {
    /// The `YYYY-MM-DD` prefix of `created_at`.
    #[must_use]
    pub fn created_day(&self) -> &str {
        self.created_at.get(..10).unwrap_or(&self.created_at)
    }

    /// Calendar date of creation, if the timestamp starts with one.
    #[must_use]
    pub fn created_on(&self) -> Option<Date> {
        parse_day(self.created_day())
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name.as_deref().unwrap_or_default())
    }

    /// Salesperson name, falling back to their email.
    #[must_use]
    pub fn salesperson(&self) -> Option<&str> {
        self.salesperson_name
            .as_deref()
            .or(self.salesperson_email.as_deref())
    }
}

/// Stored rows may carry `null` in columns without a NOT NULL constraint.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a strict `YYYY-MM-DD` calendar date.
#[must_use]
pub fn parse_day(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

// =============================================================================
// INTAKE
// =============================================================================

/// Insert payload for the `leads` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLead {
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    #[serde(rename = "cnic")]
    pub national_id: Option<String>,
    pub interest: Option<String>,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    pub budget: Option<String>,
    pub source: LeadSource,
    pub followup_date: Option<String>,
    pub notes: Option<String>,
    pub salesperson_email: Option<String>,
    pub salesperson_name: Option<String>,
}

/// Raw form submission. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeadForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    #[serde(alias = "cnic")]
    pub national_id: String,
    pub interest: String,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    pub budget: String,
    pub source: LeadSource,
    pub followup_date: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("First name is required")]
    FirstNameRequired,
    #[error("Phone number is required")]
    PhoneRequired,
    #[error("Follow-up date must be YYYY-MM-DD")]
    InvalidFollowupDate,
}

impl FormError {
    /// Form field the error belongs to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::FirstNameRequired => "first_name",
            Self::PhoneRequired => "phone",
            Self::InvalidFollowupDate => "followup_date",
        }
    }
}

impl ErrorCode for FormError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FirstNameRequired => "E_FIRST_NAME_REQUIRED",
            Self::PhoneRequired => "E_PHONE_REQUIRED",
            Self::InvalidFollowupDate => "E_INVALID_FOLLOWUP_DATE",
        }
    }
}

impl LeadForm {
    /// Validate and normalize the submission, attributing it to `submitter`.
    ///
    /// First name is checked before phone; only the first failure is reported.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] when a required field is blank or the
    /// follow-up date is malformed.
    pub fn validate(self, submitter: Option<&str>) -> Result<NewLead, FormError> {
        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            return Err(FormError::FirstNameRequired);
        }
        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(FormError::PhoneRequired);
        }

        let followup_date = match self.followup_date.trim() {
            "" => None,
            day => {
                parse_day(day).ok_or(FormError::InvalidFollowupDate)?;
                Some(day.to_owned())
            }
        };

        let submitter = submitter.map(str::trim).filter(|e| !e.is_empty());

        Ok(NewLead {
            first_name: first_name.to_owned(),
            last_name: optional(&self.last_name),
            phone: phone.to_owned(),
            email: optional(&self.email),
            national_id: optional(&self.national_id),
            interest: optional(&self.interest),
            status: self.status,
            tags: normalize_tags(self.tags),
            budget: optional(&self.budget),
            source: self.source,
            followup_date,
            notes: optional(&self.notes),
            salesperson_email: submitter.map(str::to_owned),
            salesperson_name: submitter.map(display_name),
        })
    }
}

fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_owned());
        }
    }
    out
}

/// Display name derived from an email: the local part with its first
/// character uppercased and the rest lowercased.
#[must_use]
pub fn display_name(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Tag catalog entries containing `query` (trimmed, case-insensitive).
#[must_use]
pub fn search_tags(query: &str) -> Vec<&'static str> {
    let q = query.trim().to_lowercase();
    LEAD_TAGS
        .iter()
        .copied()
        .filter(|tag| tag.to_lowercase().contains(&q))
        .collect()
}

#[cfg(test)]
#[path = "lead_test.rs"]
mod tests;
