//! AI Analysis
//!
//! Sends a domain collection to a hosted language model and gets back a short
//! coaching summary with a handful of tips. Also hosts the two form helpers
//! that lean on the same model: nutrition lookup from a food description and
//! muscle log extraction from free text.
//!
//! # Components
//!
//! - **client**: Gemini `generateContent` client with retry/backoff
//! - **prompts**: Per-domain prompt templates and response schemas
//! - **nutrition**: Lookup results and how they merge into a draft
//! - **session**: Caller-side guard (minimum entries, one request per domain)
//!
//! # Flow
//!
//! ```text
//! AnalysisSession::begin ─▶ AnalysisProvider::summarize ─▶ AnalysisSession::finish
//!   (≥ 3 entries,            (prompt + JSON of the          (dropped if the view
//!    not already pending)     whole collection)              was dismissed)
//! ```

pub mod client;
pub mod nutrition;
pub mod prompts;
pub mod session;

pub use client::{GeminiClient, GeminiConfig};
pub use nutrition::{apply_nutrition, NutritionFacts, NutritionMode};
pub use session::{AnalysisSession, SessionError, SessionState, Ticket, MIN_ENTRIES_FOR_ANALYSIS};

use crate::storage::{extract_number, DomainEntries, MuscleLogPatch};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coaching feedback for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    pub tips: Vec<String>,
}

/// A model that can coach on a collection and help fill in forms
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Produce a summary and tips for the whole collection.
    ///
    /// No minimum size is enforced here; see [`AnalysisSession`].
    async fn summarize(&self, entries: DomainEntries<'_>) -> Result<Analysis, AnalysisError>;

    /// Estimate total nutrition for a free-text food description
    async fn lookup_nutrition(&self, food_description: &str)
        -> Result<NutritionFacts, AnalysisError>;

    /// Extract whatever muscle log fields `text` mentions; the date defaults to `today`
    async fn parse_muscle_log(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<MuscleLogPatch, AnalysisError>;
}

/// Deterministic provider for tests and offline use
#[derive(Debug, Default, Clone, Copy)]
pub struct MockProvider {
    fail: bool,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every call fails as if the service were down
    pub fn failing() -> Self {
        Self { fail: true }
    }

    fn check(&self) -> Result<(), AnalysisError> {
        if self.fail {
            Err(AnalysisError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AnalysisProvider for MockProvider {
    async fn summarize(&self, entries: DomainEntries<'_>) -> Result<Analysis, AnalysisError> {
        self.check()?;
        let domain = entries.domain();
        Ok(Analysis {
            summary: format!("Mock summary for {} entries of {domain}", entries.len()),
            tips: (1..=3).map(|n| format!("Mock {domain} tip {n}")).collect(),
        })
    }

    async fn lookup_nutrition(
        &self,
        food_description: &str,
    ) -> Result<NutritionFacts, AnalysisError> {
        self.check()?;
        let calories = extract_number(food_description);
        Ok(NutritionFacts {
            calories,
            protein: calories / 20.0,
            carbs: calories / 8.0,
            fat: calories / 40.0,
            fiber: calories / 100.0,
        })
    }

    async fn parse_muscle_log(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<MuscleLogPatch, AnalysisError> {
        self.check()?;
        let weight = extract_number(text);
        Ok(MuscleLogPatch {
            date: Some(today),
            weight: (weight > 0.0).then_some(weight),
            ..Default::default()
        })
    }
}

/// Analysis errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("missing Gemini API key in {0}")]
    MissingApiKey(String),

    #[error("Analysis service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid model response: {0}")]
    InvalidResponse(String),

    #[error("response decoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Rate limited")]
    RateLimited,
}

impl AnalysisError {
    /// Whether trying the same request again could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::Unavailable | AnalysisError::Timeout | AnalysisError::RateLimited => {
                true
            }
            AnalysisError::Api { status, .. } => *status >= 500,
            AnalysisError::Request(e) => e.is_connect() || e.is_timeout(),
            AnalysisError::MissingApiKey(_)
            | AnalysisError::InvalidResponse(_)
            | AnalysisError::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Entity, MindLog, Transaction};

    #[tokio::test]
    async fn test_mock_provider_is_deterministic() {
        let logs = MindLog::seed();
        let provider = MockProvider::new();

        let first = provider.summarize(DomainEntries::Mind(&logs)).await.unwrap();
        let second = provider.summarize(DomainEntries::Mind(&logs)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.summary, "Mock summary for 3 entries of mind");
        assert_eq!(first.tips.len(), 3);
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let txs = Transaction::seed();
        let err = MockProvider::failing()
            .summarize(DomainEntries::Money(&txs))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Unavailable));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_mock_form_helpers() {
        let provider = MockProvider::new();
        let facts = provider.lookup_nutrition("about 400kcal of oats").await.unwrap();
        assert_eq!(facts.calories, 400.0);
        assert!(!facts.is_unidentified());

        let nothing = provider.lookup_nutrition("asdf").await.unwrap();
        assert!(nothing.is_unidentified());

        let today = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        let patch = provider.parse_muscle_log("weighed 77.5", today).await.unwrap();
        assert_eq!(patch.date, Some(today));
        assert_eq!(patch.weight, Some(77.5));
    }

    #[test]
    fn test_analysis_decoding_requires_both_fields() {
        let ok: Analysis = serde_json::from_str(r#"{"summary":"s","tips":["a","b"]}"#).unwrap();
        assert_eq!(ok.tips, vec!["a", "b"]);
        assert!(serde_json::from_str::<Analysis>(r#"{"summary":"s"}"#).is_err());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(!AnalysisError::MissingApiKey("GEMINI_API_KEY".into()).is_retryable());
        assert!(AnalysisError::Api {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!AnalysisError::Api {
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!AnalysisError::InvalidResponse("x".into()).is_retryable());
    }
}
