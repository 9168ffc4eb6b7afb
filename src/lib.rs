//! # Growth Tracker
//!
//! Personal self-tracking across three independent domains: **Muscle**
//! (training, body weight, sleep, nutrition), **Mind** (mood, meditation,
//! reading, screen time) and **Money** (income and expenses).
//!
//! ## Features
//!
//! - **Local-first storage**: one JSON document per domain, written on every change
//! - **Weekly dashboards**: the seven days ending on the latest entry
//! - **AI coaching**: Gemini-backed weekly feedback, nutrition lookup and log parsing
//!
//! ## Modules
//!
//! - [`storage`]: Entities, persistence backends and the entity store
//! - [`summary`]: Weekly aggregation per domain
//! - [`analysis`]: AI analysis provider and caller-side session state
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use growth_tracker::analysis::{AnalysisSession, MockProvider};
//! use growth_tracker::storage::*;
//! use growth_tracker::summary;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = EntityStore::open(FileBackend::new("./data"), StoreOptions::default());
//!
//!     store.create_transaction(TransactionDraft {
//!         kind: TransactionType::Expense,
//!         amount: 12.5,
//!         category: "Food & Dining".to_string(),
//!         ..Default::default()
//!     });
//!
//!     if let Some(week) = summary::summarize(store.entries(Domain::Money)) {
//!         println!("{}", serde_json::to_string_pretty(&week)?);
//!     }
//!
//!     let mut session = AnalysisSession::new();
//!     let analysis = session
//!         .run(&MockProvider::new(), store.entries(Domain::Money))
//!         .await?;
//!     println!("{}", analysis.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod storage;
pub mod summary;

pub use analysis::{Analysis, AnalysisError, AnalysisProvider, AnalysisSession};
pub use config::Config;
pub use storage::{Domain, DomainEntries, EntityStore, StorageError};
pub use summary::{summarize, DomainSummary};
