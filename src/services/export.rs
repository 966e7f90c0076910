//! Spreadsheet export of the filtered lead list.
//!
//! One worksheet named `Leads` with a fixed 14-column header. Absent
//! optional fields are left blank; an empty list still yields the header
//! row.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use time::Date;
use time::macros::format_description;

use crate::error::ErrorCode;
use crate::lead::Lead;

pub const SHEET_NAME: &str = "Leads";

pub const COLUMNS: [&str; 14] = [
    "First Name",
    "Last Name",
    "Phone",
    "Email",
    "CNIC",
    "Interest",
    "Status",
    "Tags",
    "Budget",
    "Source",
    "Salesperson",
    "Follow-up Date",
    "Notes",
    "Date Added",
];

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("spreadsheet write failed: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("export filename is not a valid header value: {0}")]
    InvalidFilename(String),
}

impl ErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Xlsx(_) => "E_EXPORT_WRITE",
            Self::InvalidFilename(_) => "E_EXPORT_FILENAME",
        }
    }
}

/// `DD Mon YYYY`, e.g. `05 Jan 2024`.
#[must_use]
pub fn format_display_day(day: Date) -> Option<String> {
    day.format(format_description!("[day] [month repr:short] [year]"))
        .ok()
}

/// Cell values for one lead, in [`COLUMNS`] order.
#[must_use]
pub fn export_row(lead: &Lead) -> [String; 14] {
    let text = |v: Option<&str>| v.unwrap_or_default().to_owned();
    [
        lead.first_name.clone(),
        text(lead.last_name.as_deref()),
        lead.phone.clone(),
        text(lead.email.as_deref()),
        text(lead.national_id.as_deref()),
        text(lead.interest.as_deref()),
        lead.status.as_str().to_owned(),
        lead.tags.join(", "),
        text(lead.budget.as_deref()),
        lead.source.as_str().to_owned(),
        text(lead.salesperson()),
        text(lead.followup_date.as_deref()),
        text(lead.notes.as_deref()),
        lead.created_on()
            .and_then(format_display_day)
            .unwrap_or_default(),
    ]
}

/// `{prefix}_YYYY-MM-DD.xlsx`.
#[must_use]
pub fn export_filename(prefix: &str, today: Date) -> String {
    format!("{prefix}_{today}.xlsx")
}

/// Worksheet row for the `index`-th lead, below the header row.
///
/// Saturates instead of wrapping; the writer rejects anything past its own
/// row limit.
fn sheet_row(index: usize) -> u32 {
    u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_add(1))
        .unwrap_or(u32::MAX)
}

/// Serialize `leads` into an xlsx workbook.
///
/// # Errors
///
/// Returns an error if the writer fails, including when the list exceeds the
/// sheet's row limit.
#[allow(clippy::cast_possible_truncation)]
pub fn workbook_bytes<'a>(leads: impl IntoIterator<Item = &'a Lead>) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, title) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }

    for (i, lead) in leads.into_iter().enumerate() {
        let row = sheet_row(i);
        for (col, value) in export_row(lead).iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row, col as u16, value)?;
            }
        }
    }
    sheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
