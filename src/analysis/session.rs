//! Caller-side analysis state
//!
//! Enforces the minimum collection size, allows one in-flight request per
//! domain, and drops results nobody is waiting for any more.

use crate::analysis::{Analysis, AnalysisError, AnalysisProvider};
use crate::storage::{Domain, DomainEntries};
use std::collections::HashMap;
use thiserror::Error;

/// Collections smaller than this are not worth analysing
pub const MIN_ENTRIES_FOR_ANALYSIS: usize = 3;

/// Shown when the provider call fails for any reason
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to generate analysis. Please try again.";

/// Errors surfaced to whoever asked for an analysis
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{domain} has {found} entries, at least {required} are needed")]
    NotEnoughEntries {
        domain: Domain,
        required: usize,
        found: usize,
    },

    #[error("An analysis for {0} is already running")]
    AlreadyPending(Domain),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

impl SessionError {
    /// Text suitable for showing to the user as-is
    pub fn user_message(&self) -> String {
        match self {
            SessionError::NotEnoughEntries {
                domain, required, ..
            } => format!(
                "Please add at least {required} {domain} entries to get a meaningful analysis."
            ),
            SessionError::AlreadyPending(domain) => {
                format!("An analysis for {domain} is already running.")
            }
            SessionError::Analysis(_) => ANALYSIS_FAILED_MESSAGE.to_string(),
        }
    }
}

/// What a domain's analysis panel is showing
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Pending,
    Ready(Analysis),
    /// Holds the user-facing failure message
    Failed(String),
}

/// Proof of a started request; hand it back to [`AnalysisSession::finish`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    domain: Domain,
    generation: u64,
}

impl Ticket {
    pub fn domain(&self) -> Domain {
        self.domain
    }
}

#[derive(Debug, Default)]
struct Slot {
    state: SessionState,
    /// Generation of the request whose result is still wanted
    awaiting: Option<u64>,
}

/// Per-domain analysis state
#[derive(Debug, Default)]
pub struct AnalysisSession {
    slots: HashMap<Domain, Slot>,
    generation: u64,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, domain: Domain) -> &SessionState {
        static IDLE: SessionState = SessionState::Idle;
        self.slots.get(&domain).map(|slot| &slot.state).unwrap_or(&IDLE)
    }

    pub fn is_pending(&self, domain: Domain) -> bool {
        matches!(self.state(domain), SessionState::Pending)
    }

    /// Start a request for a collection of `entry_count` entries
    pub fn begin(&mut self, domain: Domain, entry_count: usize) -> Result<Ticket, SessionError> {
        // an in-flight request keeps its slot untouched
        if self.is_pending(domain) {
            return Err(SessionError::AlreadyPending(domain));
        }
        if entry_count < MIN_ENTRIES_FOR_ANALYSIS {
            let err = SessionError::NotEnoughEntries {
                domain,
                required: MIN_ENTRIES_FOR_ANALYSIS,
                found: entry_count,
            };
            self.slot(domain).state = SessionState::Failed(err.user_message());
            return Err(err);
        }

        self.generation += 1;
        let generation = self.generation;
        let slot = self.slot(domain);
        slot.state = SessionState::Pending;
        slot.awaiting = Some(generation);

        tracing::debug!(%domain, generation, "Analysis started");
        Ok(Ticket { domain, generation })
    }

    /// Record the outcome of a request.
    ///
    /// Returns `false` when the result was discarded because the domain was
    /// dismissed (or restarted) after `ticket` was issued.
    pub fn finish(&mut self, ticket: Ticket, result: Result<Analysis, AnalysisError>) -> bool {
        let state = match result {
            Ok(analysis) => SessionState::Ready(analysis),
            Err(e) => failed_state(ticket.domain, &e),
        };
        self.settle(ticket, state)
    }

    /// The user navigated away: forget the panel and ignore any in-flight result
    pub fn dismiss(&mut self, domain: Domain) {
        self.slots.remove(&domain);
    }

    /// Begin, call `provider` and finish in one go
    pub async fn run<P>(
        &mut self,
        provider: &P,
        entries: DomainEntries<'_>,
    ) -> Result<Analysis, SessionError>
    where
        P: AnalysisProvider + ?Sized,
    {
        let ticket = self.begin(entries.domain(), entries.len())?;

        match provider.summarize(entries).await {
            Ok(analysis) => {
                self.settle(ticket, SessionState::Ready(analysis.clone()));
                Ok(analysis)
            }
            Err(e) => {
                self.settle(ticket, failed_state(ticket.domain, &e));
                Err(SessionError::Analysis(e))
            }
        }
    }

    fn settle(&mut self, ticket: Ticket, state: SessionState) -> bool {
        let slot = self.slot(ticket.domain);
        if slot.awaiting != Some(ticket.generation) {
            tracing::debug!(domain = %ticket.domain, generation = ticket.generation, "Discarding stale analysis result");
            return false;
        }
        slot.awaiting = None;
        slot.state = state;
        true
    }

    fn slot(&mut self, domain: Domain) -> &mut Slot {
        self.slots.entry(domain).or_default()
    }
}

fn failed_state(domain: Domain, error: &AnalysisError) -> SessionState {
    tracing::error!(%domain, %error, "Analysis failed");
    SessionState::Failed(ANALYSIS_FAILED_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::MockProvider;
    use crate::storage::{Entity, MindLog, MuscleLog, Transaction};

    fn analysis(text: &str) -> Analysis {
        Analysis {
            summary: text.to_string(),
            tips: vec!["tip".to_string()],
        }
    }

    #[test]
    fn test_needs_three_entries() {
        let mut session = AnalysisSession::new();

        let err = session.begin(Domain::Money, 2).unwrap_err();
        assert!(matches!(
            err,
            SessionError::NotEnoughEntries {
                required: 3,
                found: 2,
                ..
            }
        ));
        assert_eq!(
            err.user_message(),
            "Please add at least 3 money entries to get a meaningful analysis."
        );
        assert!(matches!(session.state(Domain::Money), SessionState::Failed(_)));

        assert!(session.begin(Domain::Money, 3).is_ok());
    }

    #[test]
    fn test_one_request_per_domain() {
        let mut session = AnalysisSession::new();

        let ticket = session.begin(Domain::Mind, 5).unwrap();
        assert!(matches!(
            session.begin(Domain::Mind, 5),
            Err(SessionError::AlreadyPending(Domain::Mind))
        ));
        // other domains are independent
        assert!(session.begin(Domain::Muscle, 5).is_ok());

        assert!(session.finish(ticket, Ok(analysis("done"))));
        assert_eq!(session.state(Domain::Mind), &SessionState::Ready(analysis("done")));
        assert!(session.begin(Domain::Mind, 5).is_ok());
    }

    #[test]
    fn test_small_collection_does_not_unlock_pending_domain() {
        let mut session = AnalysisSession::new();

        let ticket = session.begin(Domain::Money, 5).unwrap();
        assert!(matches!(
            session.begin(Domain::Money, 2),
            Err(SessionError::AlreadyPending(Domain::Money))
        ));
        assert!(session.is_pending(Domain::Money));
        assert!(matches!(
            session.begin(Domain::Money, 5),
            Err(SessionError::AlreadyPending(Domain::Money))
        ));

        assert!(session.finish(ticket, Ok(analysis("week"))));
        assert_eq!(session.state(Domain::Money), &SessionState::Ready(analysis("week")));
    }

    #[test]
    fn test_failure_clears_pending() {
        let mut session = AnalysisSession::new();
        let ticket = session.begin(Domain::Muscle, 3).unwrap();

        assert!(session.finish(ticket, Err(AnalysisError::Timeout)));

        assert_eq!(
            session.state(Domain::Muscle),
            &SessionState::Failed(ANALYSIS_FAILED_MESSAGE.to_string())
        );
        assert!(!session.is_pending(Domain::Muscle));
    }

    #[test]
    fn test_dismissed_result_is_discarded() {
        let mut session = AnalysisSession::new();
        let stale = session.begin(Domain::Money, 4).unwrap();

        session.dismiss(Domain::Money);
        assert_eq!(session.state(Domain::Money), &SessionState::Idle);

        let fresh = session.begin(Domain::Money, 4).unwrap();
        assert!(!session.finish(stale, Ok(analysis("old"))));
        assert!(session.is_pending(Domain::Money));

        assert!(session.finish(fresh, Ok(analysis("new"))));
        assert_eq!(session.state(Domain::Money), &SessionState::Ready(analysis("new")));
    }

    #[tokio::test]
    async fn test_run_with_mock_provider() {
        let mut session = AnalysisSession::new();
        let logs = MuscleLog::seed();

        let result = session
            .run(&MockProvider::new(), DomainEntries::Muscle(&logs))
            .await
            .unwrap();

        assert_eq!(result.tips.len(), 3);
        assert_eq!(session.state(Domain::Muscle), &SessionState::Ready(result));
    }

    #[tokio::test]
    async fn test_run_reports_provider_failure() {
        let mut session = AnalysisSession::new();
        let txs = Transaction::seed();

        let err = session
            .run(&MockProvider::failing(), DomainEntries::Money(&txs))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), ANALYSIS_FAILED_MESSAGE);
        assert!(!session.is_pending(Domain::Money));
    }

    #[tokio::test]
    async fn test_run_rejects_small_collections_without_calling_provider() {
        let mut session = AnalysisSession::new();
        let logs: Vec<MindLog> = MindLog::seed().into_iter().take(2).collect();

        let err = session
            .run(&MockProvider::failing(), DomainEntries::Mind(&logs))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::NotEnoughEntries { found: 2, .. }));
    }
}
