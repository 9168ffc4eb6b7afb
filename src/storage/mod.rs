//! Tracker Storage
//!
//! This module provides the entity store and its persistence:
//!
//! - **types**: Entities per domain (MuscleLog, MindLog, Transaction) and their drafts
//! - **coerce**: Lenient decoding of hand-entered numeric fields
//! - **backend**: Key-value persistence (files on disk, or memory for tests)
//! - **store**: Load-on-open collections with create/update/delete
//! - **seed**: Starter entries for a fresh install
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   Draft → EntityStore (assign id, mutate) → serialize domain → Backend.save
//!
//! Read Path:
//!   Backend.load → decode (fallback to seed) → in-memory Collection
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use growth_tracker::storage::{EntityStore, FileBackend, MuscleLogDraft, StoreOptions};
//!
//! let mut store = EntityStore::open(FileBackend::new("./data"), StoreOptions::default());
//! let log = store.create_muscle(MuscleLogDraft {
//!     weight: 77.4,
//!     workout_duration: 60,
//!     ..Default::default()
//! });
//! assert!(store.muscle().find(&log.id).is_some());
//! ```

pub mod backend;
pub mod coerce;
pub mod error;
pub mod seed;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use coerce::extract_number;
pub use error::{StorageError, StorageResult};
pub use store::{Collection, EntityStore, StoreOptions};
pub use types::{
    Domain, DomainEntries, Entity, MindLog, MindLogDraft, MuscleLog, MuscleLogDraft,
    MuscleLogPatch, ParseDomainError, Transaction, TransactionDraft, TransactionType,
    CUSTOM_WORKOUT, MONEY_CATEGORIES, WORKOUT_OPTIONS,
};
