//! Weekly window selection
//!
//! Every dashboard looks at the same slice of a collection: the seven
//! calendar days ending on the date of its latest entry. The anchor is the
//! data, not the wall clock, so an old export still shows a full week.

use crate::storage::{MindLog, MuscleLog, Transaction};
use chrono::{Days, NaiveDate};

/// Number of calendar days in a window
pub const WEEK_DAYS: u64 = 7;

/// Anything that can be placed on a calendar day
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for MuscleLog {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for MindLog {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for Transaction {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
}

/// What an average is divided by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denominator {
    /// Always the full week, treating missing days as zero
    Week,
    /// The number of entries actually in the window
    Entries,
}

impl Denominator {
    /// Divide `total` by this denominator; an empty divisor yields 0
    pub fn average(self, total: f64, entries: usize) -> f64 {
        let divisor = match self {
            Denominator::Week => WEEK_DAYS as f64,
            Denominator::Entries => entries as f64,
        };
        if divisor == 0.0 {
            0.0
        } else {
            total / divisor
        }
    }
}

/// The latest week of a collection, entries ascending by date
#[derive(Debug, Clone, PartialEq)]
pub struct Window<'a, T> {
    /// First calendar day covered (`latest - 6`)
    pub cutoff: NaiveDate,
    /// Date of the most recent entry
    pub latest: NaiveDate,
    /// Entries inside `[cutoff, latest]`; same-day entries keep collection order
    pub entries: Vec<&'a T>,
}

impl<'a, T: Dated> Window<'a, T> {
    /// Date of the earliest entry in the window
    pub fn start_date(&self) -> NaiveDate {
        self.entries
            .first()
            .map(|entry| entry.date())
            .unwrap_or(self.cutoff)
    }

    /// The seven calendar days covered, oldest first
    pub fn days(&self) -> Vec<NaiveDate> {
        self.cutoff
            .iter_days()
            .take_while(|d| *d <= self.latest)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Select the latest week of `items`.
///
/// Returns `None` for an empty collection, which callers treat as "no data".
pub fn select_week<T: Dated>(items: &[T]) -> Option<Window<'_, T>> {
    let mut sorted: Vec<&T> = items.iter().collect();
    // stable: same-day entries stay in collection order
    sorted.sort_by_key(|item| item.date());

    let latest = sorted.last()?.date();
    let cutoff = latest
        .checked_sub_days(Days::new(WEEK_DAYS - 1))
        .unwrap_or(NaiveDate::MIN);

    let entries: Vec<&T> = sorted
        .into_iter()
        .filter(|item| item.date() >= cutoff)
        .collect();

    Some(Window {
        cutoff,
        latest,
        entries,
    })
}

/// Short weekday label used on chart axes ("Mon", "Tue", ...)
pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}
