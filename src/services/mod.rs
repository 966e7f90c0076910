//! Lead-list services: filtering, summary stats and spreadsheet export.

pub mod export;
pub mod filter;
pub mod stats;
