//! Core data types for the tracker
//!
//! This module defines the entities logged in each domain:
//! - `MuscleLog`: training, body weight, sleep and nutrition for a day
//! - `MindLog`: mood, meditation, reading and screen habits for a day
//! - `Transaction`: a single income or expense
//!
//! Each entity has a matching `*Draft` (the record without its identifier),
//! which is what the mutation methods of the store accept.

use crate::storage::{coerce, seed};
use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workout presets offered when logging a training day
pub const WORKOUT_OPTIONS: &[&str] = &[
    "Rest / Active Recovery",
    "Chest & Triceps",
    "Back & Biceps",
    "Legs (Quads Focus)",
    "Legs (Hamstrings/Glutes)",
    "Legs (General)",
    "Shoulders & Abs",
    "Push Day",
    "Pull Day",
    "Full Body",
    "Upper Body",
    "Lower Body",
    "Cardio",
    "HIIT",
    "Crossfit",
    "Yoga / Pilates",
    CUSTOM_WORKOUT,
];

/// Escape value meaning "type your own workout name"
pub const CUSTOM_WORKOUT: &str = "Other / Custom";

/// Spending categories for transactions
pub const MONEY_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Transportation",
    "Housing & Utilities",
    "Shopping",
    "Health & Wellness",
    "Investments & Debt",
    "Social & Leisure",
    "Income",
    "Others",
];

/// One of the three independent tracking areas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Physical training and nutrition
    Muscle,
    /// Mental wellness
    Mind,
    /// Personal finance
    Money,
}

impl Domain {
    /// Get all domains for iteration
    pub fn all() -> &'static [Domain] {
        &[Domain::Muscle, Domain::Mind, Domain::Money]
    }

    /// Fixed key the domain's collection is persisted under
    pub fn storage_key(&self) -> &'static str {
        match self {
            Domain::Muscle => "fitTrackLogs",
            Domain::Mind => "mindTrackerData",
            Domain::Money => "moneyTrackerData",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Muscle => write!(f, "muscle"),
            Domain::Mind => write!(f, "mind"),
            Domain::Money => write!(f, "money"),
        }
    }
}

/// Returned when a string names no known domain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown domain '{0}' (expected muscle, mind or money)")]
pub struct ParseDomainError(pub String);

impl FromStr for Domain {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "muscle" | "fitness" => Ok(Domain::Muscle),
            "mind" | "wellness" => Ok(Domain::Mind),
            "money" | "finance" => Ok(Domain::Money),
            _ => Err(ParseDomainError(s.to_string())),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::MuscleLog {}
    impl Sealed for super::MindLog {}
    impl Sealed for super::Transaction {}
}

/// A dated, identified log record belonging to one domain
pub trait Entity: sealed::Sealed + Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// The record without its identifier
    type Draft: Clone + fmt::Debug;

    /// Domain this entity is logged under
    const DOMAIN: Domain;

    fn id(&self) -> &str;

    fn date(&self) -> NaiveDate;

    /// Build the stored record from a draft and a freshly assigned identifier
    fn from_draft(id: String, draft: Self::Draft) -> Self;

    /// Strip the identifier, e.g. to pre-fill an edit
    fn to_draft(&self) -> Self::Draft;

    /// Starter entries used when nothing has been persisted yet
    fn seed() -> Vec<Self>;
}

// ============================================
// Muscle
// ============================================

/// One day of training, recovery and nutrition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleLog {
    pub id: String,
    pub date: NaiveDate,
    /// Body weight in kg
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub weight: f64,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub workout_type: String,
    /// Minutes trained
    #[serde(default, deserialize_with = "coerce::lenient_u32")]
    pub workout_duration: u32,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub sleep_hours: f64,
    /// Liters
    #[serde(default, deserialize_with = "coerce::lenient_u32")]
    pub water_intake: u32,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub calories: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub fiber: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub protein: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub fat: f64,
}

/// A muscle log before it has been assigned an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct MuscleLogDraft {
    pub date: NaiveDate,
    pub weight: f64,
    pub workout_type: String,
    pub workout_duration: u32,
    pub sleep_hours: f64,
    pub water_intake: u32,
    pub calories: f64,
    pub fiber: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Default for MuscleLogDraft {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            weight: 0.0,
            workout_type: WORKOUT_OPTIONS[0].to_string(),
            workout_duration: 0,
            sleep_hours: 0.0,
            water_intake: 3,
            calories: 0.0,
            fiber: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
        }
    }
}

impl MuscleLogDraft {
    /// Set the workout from a preset or custom name.
    ///
    /// Choosing the custom escape clears the name so it can be typed freely.
    pub fn set_workout(&mut self, choice: &str) {
        if choice == CUSTOM_WORKOUT {
            self.workout_type.clear();
        } else {
            self.workout_type = choice.to_string();
        }
    }

    /// Overlay every field present in `patch`
    pub fn apply_patch(&mut self, patch: &MuscleLogPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        if let Some(workout_type) = &patch.workout_type {
            self.workout_type = workout_type.clone();
        }
        if let Some(duration) = patch.workout_duration {
            self.workout_duration = duration.trunc() as u32;
        }
        if let Some(sleep) = patch.sleep_hours {
            self.sleep_hours = sleep;
        }
        if let Some(water) = patch.water_intake {
            self.water_intake = water.trunc() as u32;
        }
        if let Some(calories) = patch.calories {
            self.calories = calories;
        }
        if let Some(fiber) = patch.fiber {
            self.fiber = fiber;
        }
        if let Some(protein) = patch.protein {
            self.protein = protein;
        }
        if let Some(carbs) = patch.carbs {
            self.carbs = carbs;
        }
        if let Some(fat) = patch.fat {
            self.fat = fat;
        }
    }
}

/// Partial muscle log extracted from free text; absent fields are `None`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleLogPatch {
    #[serde(default, deserialize_with = "coerce::lenient_opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "coerce::lenient_opt_f64")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "coerce::lenient_opt_string")]
    pub workout_type: Option<String>,
    #[serde(default, deserialize_with = "coerce::lenient_opt_f64")]
    pub workout_duration: Option<f64>,
    #[serde(default, deserialize_with = "coerce::lenient_opt_f64")]
    pub sleep_hours: Option<f64>,
    #[serde(default, deserialize_with = "coerce::lenient_opt_f64")]
    pub water_intake: Option<f64>,
    #[serde(default, deserialize_with = "coerce::lenient_opt_f64")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "coerce::lenient_opt_f64")]
    pub fiber: Option<f64>,
    #[serde(default, deserialize_with = "coerce::lenient_opt_f64")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "coerce::lenient_opt_f64")]
    pub carbs: Option<f64>,
    #[serde(default, deserialize_with = "coerce::lenient_opt_f64")]
    pub fat: Option<f64>,
}

impl Entity for MuscleLog {
    type Draft = MuscleLogDraft;
    const DOMAIN: Domain = Domain::Muscle;

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn from_draft(id: String, d: MuscleLogDraft) -> Self {
        Self {
            id,
            date: d.date,
            weight: d.weight,
            workout_type: d.workout_type,
            workout_duration: d.workout_duration,
            sleep_hours: d.sleep_hours,
            water_intake: d.water_intake,
            calories: d.calories,
            fiber: d.fiber,
            protein: d.protein,
            carbs: d.carbs,
            fat: d.fat,
        }
    }

    fn seed() -> Vec<Self> {
        seed::muscle_logs()
    }

    fn to_draft(&self) -> MuscleLogDraft {
        MuscleLogDraft {
            date: self.date,
            weight: self.weight,
            workout_type: self.workout_type.clone(),
            workout_duration: self.workout_duration,
            sleep_hours: self.sleep_hours,
            water_intake: self.water_intake,
            calories: self.calories,
            fiber: self.fiber,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

// ============================================
// Mind
// ============================================

/// One day of mental wellness tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindLog {
    pub id: String,
    pub date: NaiveDate,
    /// Self-rated 1-10
    #[serde(default, deserialize_with = "coerce::lenient_u8")]
    pub mind_score: u8,
    #[serde(default, deserialize_with = "coerce::lenient_u32")]
    pub meditation_minutes: u32,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub book_name: String,
    #[serde(default, deserialize_with = "coerce::lenient_u32")]
    pub pages_read: u32,
    #[serde(default, deserialize_with = "coerce::lenient_u32")]
    pub screen_time_minutes: u32,
    /// Comma-separated app names
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub top_apps: String,
    #[serde(default, deserialize_with = "coerce::lenient_bool")]
    pub digital_detox: bool,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub podcast: String,
}

/// A mind log before it has been assigned an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct MindLogDraft {
    pub date: NaiveDate,
    pub mind_score: u8,
    pub meditation_minutes: u32,
    pub book_name: String,
    pub pages_read: u32,
    pub screen_time_minutes: u32,
    pub top_apps: String,
    pub digital_detox: bool,
    pub podcast: String,
}

impl Default for MindLogDraft {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            mind_score: 5,
            meditation_minutes: 0,
            book_name: String::new(),
            pages_read: 0,
            screen_time_minutes: 0,
            top_apps: String::new(),
            digital_detox: false,
            podcast: String::new(),
        }
    }
}

impl MindLog {
    /// Individual app names from `top_apps`, trimmed, empties dropped
    pub fn apps(&self) -> impl Iterator<Item = &str> {
        self.top_apps
            .split(',')
            .map(str::trim)
            .filter(|app| !app.is_empty())
    }
}

impl Entity for MindLog {
    type Draft = MindLogDraft;
    const DOMAIN: Domain = Domain::Mind;

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn from_draft(id: String, d: MindLogDraft) -> Self {
        Self {
            id,
            date: d.date,
            mind_score: d.mind_score,
            meditation_minutes: d.meditation_minutes,
            book_name: d.book_name,
            pages_read: d.pages_read,
            screen_time_minutes: d.screen_time_minutes,
            top_apps: d.top_apps,
            digital_detox: d.digital_detox,
            podcast: d.podcast,
        }
    }

    fn seed() -> Vec<Self> {
        seed::mind_logs()
    }

    fn to_draft(&self) -> MindLogDraft {
        MindLogDraft {
            date: self.date,
            mind_score: self.mind_score,
            meditation_minutes: self.meditation_minutes,
            book_name: self.book_name.clone(),
            pages_read: self.pages_read,
            screen_time_minutes: self.screen_time_minutes,
            top_apps: self.top_apps.clone(),
            digital_detox: self.digital_detox,
            podcast: self.podcast.clone(),
        }
    }
}

// ============================================
// Money
// ============================================

/// Direction of a transaction
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
    /// Reserved marker for a day without spending; nothing produces it yet
    #[serde(rename = "No Expense")]
    NoExpense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
            TransactionType::NoExpense => write!(f, "No Expense"),
        }
    }
}

/// Returned when a string names no known transaction type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown transaction type '{0}' (expected income or expense)")]
pub struct ParseTransactionTypeError(pub String);

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "no expense" | "no-expense" => Ok(TransactionType::NoExpense),
            _ => Err(ParseTransactionTypeError(s.to_string())),
        }
    }
}

/// A single income or expense.
///
/// `amount` is signed: positive for income, negative for expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

/// A transaction before it has been assigned an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub amount: f64,
    pub category: String,
    pub details: String,
    pub subcategory: Option<String>,
}

impl Default for TransactionDraft {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            kind: TransactionType::Expense,
            amount: 0.0,
            category: "Others".to_string(),
            details: String::new(),
            subcategory: Some(String::new()),
        }
    }
}

impl TransactionDraft {
    /// Apply the sign convention: expenses are stored negative, everything
    /// else positive, regardless of the sign the user typed.
    pub fn normalized(mut self) -> Self {
        let magnitude = coerce::finite(self.amount).abs();
        self.amount = match self.kind {
            TransactionType::Expense => -magnitude,
            TransactionType::Income | TransactionType::NoExpense => magnitude,
        };
        self
    }
}

impl Entity for Transaction {
    type Draft = TransactionDraft;
    const DOMAIN: Domain = Domain::Money;

    fn id(&self) -> &str {
        &self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn from_draft(id: String, d: TransactionDraft) -> Self {
        Self {
            id,
            date: d.date,
            kind: d.kind,
            amount: d.amount,
            category: d.category,
            details: d.details,
            subcategory: d.subcategory,
        }
    }

    fn seed() -> Vec<Self> {
        seed::transactions()
    }

    fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            date: self.date,
            kind: self.kind,
            amount: self.amount,
            category: self.category.clone(),
            details: self.details.clone(),
            subcategory: self.subcategory.clone(),
        }
    }
}

// ============================================
// Cross-domain views
// ============================================

/// A borrowed collection tagged with the domain it belongs to
#[derive(Debug, Clone, Copy)]
pub enum DomainEntries<'a> {
    Muscle(&'a [MuscleLog]),
    Mind(&'a [MindLog]),
    Money(&'a [Transaction]),
}

impl<'a> DomainEntries<'a> {
    pub fn domain(&self) -> Domain {
        match self {
            DomainEntries::Muscle(_) => Domain::Muscle,
            DomainEntries::Mind(_) => Domain::Mind,
            DomainEntries::Money(_) => Domain::Money,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DomainEntries::Muscle(logs) => logs.len(),
            DomainEntries::Mind(logs) => logs.len(),
            DomainEntries::Money(txs) => txs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize the full collection as a JSON array
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            DomainEntries::Muscle(logs) => serde_json::to_string(logs),
            DomainEntries::Mind(logs) => serde_json::to_string(logs),
            DomainEntries::Money(txs) => serde_json::to_string(txs),
        }
    }
}
