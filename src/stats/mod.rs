//! Stats module - summary statistics over the sales table

mod summary;

pub use summary::{RegionSummary, SummaryCalculator, OVERALL_LABEL};
