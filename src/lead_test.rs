use super::*;

fn form(first_name: &str, phone: &str) -> LeadForm {
    LeadForm { first_name: first_name.into(), phone: phone.into(), ..LeadForm::default() }
}

// =============================================================================
// validation
// =============================================================================

#[test]
fn blank_first_name_is_rejected_first() {
    let err = form("   ", "").validate(Some("ali@example.com")).unwrap_err();
    assert_eq!(err, FormError::FirstNameRequired);
    assert_eq!(err.to_string(), "First name is required");
    assert_eq!(err.field(), "first_name");
}

#[test]
fn blank_phone_is_rejected() {
    let err = form("Sara", " ").validate(None).unwrap_err();
    assert_eq!(err, FormError::PhoneRequired);
    assert_eq!(err.to_string(), "Phone number is required");
    assert_eq!(err.error_code(), "E_PHONE_REQUIRED");
}

#[test]
fn valid_form_is_trimmed_and_defaults_applied() {
    let lead = LeadForm {
        first_name: "  Sara ".into(),
        last_name: "   ".into(),
        phone: " 0300 1234567 ".into(),
        email: "sara@example.com ".into(),
        interest: " Tower B ".into(),
        ..LeadForm::default()
    }
    .validate(Some("ALI.Khan@example.com"))
    .unwrap();

    assert_eq!(lead.first_name, "Sara");
    assert_eq!(lead.last_name, None);
    assert_eq!(lead.phone, "0300 1234567");
    assert_eq!(lead.email.as_deref(), Some("sara@example.com"));
    assert_eq!(lead.interest.as_deref(), Some("Tower B"));
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.source, LeadSource::WalkIn);
    assert!(lead.tags.is_empty());
    assert_eq!(lead.followup_date, None);
    assert_eq!(lead.salesperson_email.as_deref(), Some("ALI.Khan@example.com"));
    assert_eq!(lead.salesperson_name.as_deref(), Some("Ali.khan"));
}

#[test]
fn tags_are_trimmed_and_deduplicated_in_order() {
    let mut f = form("A", "1");
    f.tags = vec!["Meeting Booked".into(), " Interested ".into(), String::new(), "Meeting Booked".into()];
    let lead = f.validate(None).unwrap();
    assert_eq!(lead.tags, vec!["Meeting Booked", "Interested"]);
    assert_eq!(lead.salesperson_email, None);
    assert_eq!(lead.salesperson_name, None);
}

#[test]
fn followup_date_must_be_a_calendar_day() {
    let mut f = form("A", "1");
    f.followup_date = "2024-02-30".into();
    assert_eq!(f.validate(None).unwrap_err(), FormError::InvalidFollowupDate);

    let mut f = form("A", "1");
    f.followup_date = "2024-02-29".into();
    assert_eq!(f.validate(None).unwrap().followup_date.as_deref(), Some("2024-02-29"));
}

#[test]
fn form_deserializes_with_missing_fields() {
    let f: LeadForm = serde_json::from_str(r#"{"first_name":"A","phone":"1","cnic":"35202","source":"referral","status":"hot"}"#).unwrap();
    assert_eq!(f.national_id, "35202");
    assert_eq!(f.source, LeadSource::Referral);
    assert_eq!(f.status, LeadStatus::Hot);
    assert!(f.notes.is_empty());
}

// =============================================================================
// display name
// =============================================================================

#[test]
fn display_name_capitalizes_local_part() {
    assert_eq!(display_name("bilal@example.com"), "Bilal");
    assert_eq!(display_name("SANA.MALIK@example.com"), "Sana.malik");
    assert_eq!(display_name("@example.com"), "");
    assert_eq!(display_name(""), "");
}

// =============================================================================
// wire format
// =============================================================================

#[test]
fn lead_reads_backend_row_with_null_tags_and_unknown_source() {
    let row = serde_json::json!({
        "id": "6f1c1c7e-4d3b-4f44-9a55-2b1d7c0f0a11",
        "created_at": "2024-01-05T10:22:33.123456+00:00",
        "first_name": "Omar",
        "last_name": null,
        "phone": "0321",
        "email": null,
        "cnic": "35202-1234567-1",
        "interest": null,
        "status": "warm",
        "tags": null,
        "budget": null,
        "source": "billboard",
        "followup_date": null,
        "notes": null,
        "salesperson_email": "ali@example.com",
        "salesperson_name": null
    });
    let lead: Lead = serde_json::from_value(row).unwrap();
    assert!(lead.tags.is_empty());
    assert_eq!(lead.source, LeadSource::Other("billboard".into()));
    assert_eq!(lead.source.table_label(), "billboard");
    assert_eq!(lead.national_id.as_deref(), Some("35202-1234567-1"));
    assert_eq!(lead.created_day(), "2024-01-05");
    assert_eq!(lead.created_on(), parse_day("2024-01-05"));
    assert_eq!(lead.salesperson(), Some("ali@example.com"));
    assert_eq!(lead.full_name(), "Omar ");
}

#[test]
fn new_lead_serializes_wire_names() {
    let lead = form("A", "1").validate(None).unwrap();
    let json = serde_json::to_value(&lead).unwrap();
    assert_eq!(json["source"], "walk-in");
    assert_eq!(json["status"], "new");
    assert!(json.get("cnic").is_some());
    assert!(json.get("national_id").is_none());
    assert_eq!(json["tags"], serde_json::json!([]));
}

#[test]
fn source_labels() {
    assert_eq!(LeadSource::OnlineWebsite.table_label(), "Online");
    assert_eq!(LeadSource::OnlineWebsite.form_label(), "Online-Website");
    assert_eq!(LeadSource::from("event-exhibition".to_owned()), LeadSource::EventExhibition);
    assert_eq!(String::from(LeadSource::Referral), "referral");
}

#[test]
fn status_parses_wire_values_only() {
    assert_eq!(LeadStatus::from_str("hot"), Some(LeadStatus::Hot));
    assert_eq!(LeadStatus::from_str("Hot"), None);
    assert_eq!(LeadStatus::from_str("all"), None);
}

// =============================================================================
// tag search
// =============================================================================

#[test]
fn tag_search_matches_substrings_case_insensitively() {
    assert_eq!(LEAD_TAGS.len(), 27);
    assert_eq!(search_tags("  ").len(), LEAD_TAGS.len());
    assert_eq!(search_tags("MEETING"), vec!["Meeting Booked", "Meeting Done"]);
    assert!(search_tags("zzz").is_empty());
}
