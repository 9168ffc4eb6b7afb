//! Entity Store
//!
//! Owns the three domain collections and keeps them in step with the
//! persistence backend:
//! - Open: each collection is loaded once, falling back to seed data
//! - Mutation: create / update / delete change memory, then rewrite the
//!   whole domain collection
//!
//! Mutations never fail. A backend write error is logged and the in-memory
//! change stands, so the next successful write catches the backend up.

use crate::storage::backend::StorageBackend;
use crate::storage::types::{
    Domain, DomainEntries, Entity, MindLog, MindLogDraft, MuscleLog, MuscleLogDraft, Transaction,
    TransactionDraft,
};

/// Options controlling how collections are opened
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Start absent or unreadable collections with the starter entries
    pub seed_on_empty: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            seed_on_empty: true,
        }
    }
}

/// One domain's entries, in insertion order
#[derive(Debug, Clone)]
pub struct Collection<E> {
    entries: Vec<E>,
}

impl<E: Entity> Collection<E> {
    fn load(backend: &dyn StorageBackend, options: &StoreOptions) -> Self {
        let key = E::DOMAIN.storage_key();
        let fallback = || {
            if options.seed_on_empty {
                E::seed()
            } else {
                Vec::new()
            }
        };

        let entries = match backend.load(key) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<E>>(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        domain = %E::DOMAIN,
                        key,
                        error = %e,
                        "Persisted collection unreadable, starting from defaults"
                    );
                    fallback()
                }
            },
            Ok(None) => fallback(),
            Err(e) => {
                tracing::warn!(domain = %E::DOMAIN, key, error = %e, "Failed to load collection");
                fallback()
            }
        };

        tracing::debug!(domain = %E::DOMAIN, count = entries.len(), "Loaded collection");
        Self { entries }
    }

    fn persist(&self, backend: &dyn StorageBackend) {
        let key = E::DOMAIN.storage_key();
        let result = serde_json::to_vec(&self.entries)
            .map_err(Into::into)
            .and_then(|bytes| backend.save(key, &bytes));

        if let Err(e) = result {
            tracing::error!(domain = %E::DOMAIN, key, error = %e, "Failed to persist collection");
        }
    }

    fn create(&mut self, backend: &dyn StorageBackend, draft: E::Draft) -> E {
        let entity = E::from_draft(uuid::Uuid::new_v4().to_string(), draft);
        self.entries.push(entity.clone());
        tracing::info!(domain = %E::DOMAIN, id = entity.id(), date = %entity.date(), "Created entry");
        self.persist(backend);
        entity
    }

    fn update(&mut self, backend: &dyn StorageBackend, id: &str, draft: E::Draft) -> bool {
        let updated = match self.entries.iter_mut().find(|e| e.id() == id) {
            Some(slot) => {
                *slot = E::from_draft(id.to_string(), draft);
                true
            }
            None => false,
        };

        if updated {
            tracing::info!(domain = %E::DOMAIN, id, "Updated entry");
        } else {
            tracing::debug!(domain = %E::DOMAIN, id, "Update skipped, no such entry");
        }
        self.persist(backend);
        updated
    }

    fn delete(&mut self, backend: &dyn StorageBackend, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        let removed = self.entries.len() != before;

        if removed {
            tracing::info!(domain = %E::DOMAIN, id, "Deleted entry");
        }
        self.persist(backend);
        removed
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Look up a single entry by identifier
    pub fn find(&self, id: &str) -> Option<&E> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The tracker's state: three independent collections and their backend
pub struct EntityStore {
    backend: Box<dyn StorageBackend>,
    muscle: Collection<MuscleLog>,
    mind: Collection<MindLog>,
    money: Collection<Transaction>,
}

impl EntityStore {
    /// Open the store, loading every domain from `backend`
    pub fn open(backend: impl StorageBackend + 'static, options: StoreOptions) -> Self {
        let backend: Box<dyn StorageBackend> = Box::new(backend);
        let muscle = Collection::load(backend.as_ref(), &options);
        let mind = Collection::load(backend.as_ref(), &options);
        let money = Collection::load(backend.as_ref(), &options);

        tracing::info!(
            muscle = muscle.len(),
            mind = mind.len(),
            money = money.len(),
            "Entity store opened"
        );

        Self {
            backend,
            muscle,
            mind,
            money,
        }
    }

    pub fn muscle(&self) -> &Collection<MuscleLog> {
        &self.muscle
    }

    pub fn mind(&self) -> &Collection<MindLog> {
        &self.mind
    }

    pub fn money(&self) -> &Collection<Transaction> {
        &self.money
    }

    /// Borrow one domain's entries as a tagged view
    pub fn entries(&self, domain: Domain) -> DomainEntries<'_> {
        match domain {
            Domain::Muscle => DomainEntries::Muscle(self.muscle.entries()),
            Domain::Mind => DomainEntries::Mind(self.mind.entries()),
            Domain::Money => DomainEntries::Money(self.money.entries()),
        }
    }

    // ---- Muscle ----

    pub fn create_muscle(&mut self, draft: MuscleLogDraft) -> MuscleLog {
        self.muscle.create(self.backend.as_ref(), draft)
    }

    pub fn update_muscle(&mut self, id: &str, draft: MuscleLogDraft) -> bool {
        self.muscle.update(self.backend.as_ref(), id, draft)
    }

    pub fn delete_muscle(&mut self, id: &str) -> bool {
        self.muscle.delete(self.backend.as_ref(), id)
    }

    // ---- Mind ----

    pub fn create_mind(&mut self, draft: MindLogDraft) -> MindLog {
        self.mind.create(self.backend.as_ref(), draft)
    }

    pub fn update_mind(&mut self, id: &str, draft: MindLogDraft) -> bool {
        self.mind.update(self.backend.as_ref(), id, draft)
    }

    pub fn delete_mind(&mut self, id: &str) -> bool {
        self.mind.delete(self.backend.as_ref(), id)
    }

    // ---- Money ----

    /// Record a transaction. The amount's sign is normalized from its type.
    pub fn create_transaction(&mut self, draft: TransactionDraft) -> Transaction {
        self.money.create(self.backend.as_ref(), draft.normalized())
    }

    pub fn update_transaction(&mut self, id: &str, draft: TransactionDraft) -> bool {
        self.money
            .update(self.backend.as_ref(), id, draft.normalized())
    }

    pub fn delete_transaction(&mut self, id: &str) -> bool {
        self.money.delete(self.backend.as_ref(), id)
    }

    /// Delete from whichever collection `domain` names
    pub fn delete(&mut self, domain: Domain, id: &str) -> bool {
        match domain {
            Domain::Muscle => self.delete_muscle(id),
            Domain::Mind => self.delete_mind(id),
            Domain::Money => self.delete_transaction(id),
        }
    }
}
