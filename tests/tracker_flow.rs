//! End-to-end flows: store, weekly summaries and analysis sessions together

use chrono::NaiveDate;
use growth_tracker::analysis::{
    AnalysisSession, MockProvider, SessionError, SessionState, MIN_ENTRIES_FOR_ANALYSIS,
};
use growth_tracker::storage::*;
use growth_tracker::summary::{self, DomainSummary};
use tempfile::tempdir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn empty() -> StoreOptions {
    StoreOptions {
        seed_on_empty: false,
    }
}

#[test]
fn test_money_week_survives_reopen() {
    let dir = tempdir().unwrap();

    {
        let mut store = EntityStore::open(FileBackend::new(dir.path()), empty());
        store.create_transaction(TransactionDraft {
            date: date("2025-11-01"),
            kind: TransactionType::Income,
            amount: 1000.0,
            category: "Income".to_string(),
            ..Default::default()
        });
        store.create_transaction(TransactionDraft {
            date: date("2025-11-01"),
            kind: TransactionType::Expense,
            amount: 10.0,
            category: "Food & Dining".to_string(),
            ..Default::default()
        });
        store.create_transaction(TransactionDraft {
            date: date("2025-11-01"),
            kind: TransactionType::Expense,
            amount: -50.0,
            category: "Transportation".to_string(),
            ..Default::default()
        });
    }

    assert!(dir.path().join("moneyTrackerData.json").exists());

    let store = EntityStore::open(FileBackend::new(dir.path()), empty());
    let Some(DomainSummary::Money(week)) = summary::summarize(store.entries(Domain::Money)) else {
        panic!("expected a money summary");
    };

    assert_eq!(week.income, 1000.0);
    assert_eq!(week.expense, 60.0);
    assert_eq!(week.balance, 940.0);
    assert!((week.savings_rate - 94.0).abs() < 1e-9);
    assert_eq!(week.daily.len(), 7);
    assert_eq!(week.categories[0].category, "Transportation");
}

#[test]
fn test_muscle_create_update_delete_round_trip() {
    let dir = tempdir().unwrap();
    let mut store = EntityStore::open(FileBackend::new(dir.path()), empty());

    let log = store.create_muscle(MuscleLogDraft {
        date: date("2025-11-18"),
        weight: 78.0,
        workout_duration: 45,
        ..Default::default()
    });

    let mut draft = log.to_draft();
    draft.weight = 77.6;
    assert!(store.update_muscle(&log.id, draft));

    let reopened = EntityStore::open(FileBackend::new(dir.path()), empty());
    let stored = reopened.muscle().find(&log.id).unwrap();
    assert_eq!(stored.weight, 77.6);
    assert_eq!(stored.workout_duration, 45);

    assert!(store.delete_muscle(&log.id));
    assert!(!store.delete_muscle(&log.id));

    let reopened = EntityStore::open(FileBackend::new(dir.path()), empty());
    assert!(reopened.muscle().is_empty());
    assert!(summary::summarize(reopened.entries(Domain::Muscle)).is_none());
}

#[test]
fn test_corrupt_file_falls_back_to_seed() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("mindTrackerData.json"), "{ not json").unwrap();

    let store = EntityStore::open(FileBackend::new(dir.path()), StoreOptions::default());

    assert_eq!(store.mind().entries(), MindLog::seed().as_slice());
    let Some(DomainSummary::Mind(week)) = summary::summarize(store.entries(Domain::Mind)) else {
        panic!("expected a mind summary");
    };
    assert!(week.avg_score > 0.0);
}

#[tokio::test]
async fn test_analysis_session_over_store() {
    let mut store = EntityStore::open(MemoryBackend::new(), empty());
    let mut session = AnalysisSession::new();
    let provider = MockProvider::new();

    for day in ["2025-11-17", "2025-11-18"] {
        store.create_mind(MindLogDraft {
            date: date(day),
            mind_score: 7,
            ..Default::default()
        });
    }

    let err = session
        .run(&provider, store.entries(Domain::Mind))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::NotEnoughEntries {
            required: MIN_ENTRIES_FOR_ANALYSIS,
            found: 2,
            ..
        }
    ));

    store.create_mind(MindLogDraft {
        date: date("2025-11-19"),
        mind_score: 8,
        meditation_minutes: 15,
        ..Default::default()
    });

    let analysis = session
        .run(&provider, store.entries(Domain::Mind))
        .await
        .unwrap();
    assert_eq!(analysis.tips.len(), 3);
    assert!(matches!(session.state(Domain::Mind), SessionState::Ready(_)));
    assert_eq!(session.state(Domain::Money), &SessionState::Idle);
}

#[tokio::test]
async fn test_stale_result_after_dismiss_is_dropped() {
    let store = EntityStore::open(MemoryBackend::new(), StoreOptions::default());
    let mut session = AnalysisSession::new();

    let entries = store.entries(Domain::Muscle);
    let ticket = session.begin(entries.domain(), entries.len()).unwrap();
    session.dismiss(Domain::Muscle);

    let result = growth_tracker::AnalysisProvider::summarize(&MockProvider::new(), entries).await;
    assert!(!session.finish(ticket, result));
    assert_eq!(session.state(Domain::Muscle), &SessionState::Idle);
}
