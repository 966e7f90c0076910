//! Summary cards shown above the lead table.

use std::collections::HashSet;

use serde::Serialize;
use time::Date;

use crate::lead::{Lead, LeadStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LeadStats {
    pub total: usize,
    pub hot: usize,
    pub added_today: usize,
    /// Distinct non-empty salesperson emails.
    pub salespersons: usize,
}

impl LeadStats {
    /// Compute over the full (unfiltered) list. `today` is a UTC calendar day.
    #[must_use]
    pub fn compute(leads: &[Lead], today: Date) -> Self {
        let salespersons: HashSet<&str> = leads
            .iter()
            .filter_map(|l| l.salesperson_email.as_deref())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            total: leads.len(),
            hot: leads.iter().filter(|l| l.status == LeadStatus::Hot).count(),
            added_today: leads.iter().filter(|l| l.created_on() == Some(today)).count(),
            salespersons: salespersons.len(),
        }
    }

    /// `(value, label)` pairs in display order.
    #[must_use]
    pub fn cards(&self) -> [(usize, &'static str); 4] {
        [
            (self.total, "Total Leads"),
            (self.hot, "Hot Leads"),
            (self.added_today, "Added Today"),
            (self.salespersons, "Salespersons"),
        ]
    }
}
