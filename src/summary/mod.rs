//! Weekly aggregation engine
//!
//! Turns a domain collection into the numbers a dashboard shows. Everything
//! here is a pure function of the collection: no I/O, no clock, no errors.
//!
//! ```text
//! DomainEntries ──▶ select_week ──▶ Window ──▶ {Muscle,Mind,Money}Summary
//!                   (latest date − 6 days .. latest date)
//! ```
//!
//! An empty collection yields `None` rather than a summary full of zeros.

pub mod mind;
pub mod money;
pub mod muscle;
pub mod window;

pub use mind::{format_screen_time, MindChartPoint, MindSummary};
pub use money::{CategoryTotal, DailyFlow, MoneySummary};
pub use muscle::{MuscleChartPoint, MuscleSummary};
pub use window::{select_week, weekday_label, Dated, Denominator, Window, WEEK_DAYS};

use crate::storage::{Domain, DomainEntries};
use serde::Serialize;

/// A weekly summary for any one domain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "domain", rename_all = "lowercase")]
pub enum DomainSummary {
    Muscle(MuscleSummary),
    Mind(MindSummary),
    Money(MoneySummary),
}

impl DomainSummary {
    pub fn domain(&self) -> Domain {
        match self {
            DomainSummary::Muscle(_) => Domain::Muscle,
            DomainSummary::Mind(_) => Domain::Mind,
            DomainSummary::Money(_) => Domain::Money,
        }
    }
}

/// Summarize the latest week of a domain collection
pub fn summarize(entries: DomainEntries<'_>) -> Option<DomainSummary> {
    match entries {
        DomainEntries::Muscle(logs) => muscle::summarize(logs).map(DomainSummary::Muscle),
        DomainEntries::Mind(logs) => mind::summarize(logs).map(DomainSummary::Mind),
        DomainEntries::Money(txs) => money::summarize(txs).map(DomainSummary::Money),
    }
}
