//! In-memory recording repository for interactor tests.

use crate::error::Error;
use crate::model::motorcycle::Motorcycle;
use crate::repo::entity_repo::{ExistsCheck, Repository, UniqueCheck};
use crate::repo::motorcycle_repo::MotorcycleRepository;
use crate::repo::{RepoAction, RepoError, RepoResult};
use std::cell::{Cell, RefCell};

pub(crate) fn honda(id: i64) -> Motorcycle {
    let mut motorcycle = Motorcycle::new("Honda", "Shadow", 2006, "01234567890123456")
        .expect("fixture motorcycle should be valid");
    motorcycle.id = id;
    motorcycle.created_utc = Some(1);
    motorcycle
}

/// Vec-backed repository that counts every call it receives.
#[derive(Default)]
pub(crate) struct RecordingRepository {
    rows: RefCell<Vec<Motorcycle>>,
    calls: Cell<usize>,
    saves: Cell<usize>,
    discards: Cell<usize>,
}

impl RecordingRepository {
    pub(crate) fn with_rows(rows: Vec<Motorcycle>) -> Self {
        Self {
            rows: RefCell::new(rows),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    pub(crate) fn saves(&self) -> usize {
        self.saves.get()
    }

    pub(crate) fn discards(&self) -> usize {
        self.discards.get()
    }

    pub(crate) fn rows(&self) -> Vec<Motorcycle> {
        self.rows.borrow().clone()
    }

    fn record(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl Repository<Motorcycle> for RecordingRepository {
    fn fetch_by_id(&self, id: i64) -> RepoResult<Option<Motorcycle>> {
        self.record();
        Ok(self.rows.borrow().iter().find(|row| row.id == id).cloned())
    }

    fn exists_by_id(&self, id: i64) -> RepoResult<bool> {
        self.record();
        Ok(self.rows.borrow().iter().any(|row| row.id == id))
    }

    fn list(&self) -> RepoResult<Vec<Motorcycle>> {
        self.record();
        Ok(self.rows())
    }

    fn insert(
        &self,
        mut entity: Motorcycle,
        exists: Option<&ExistsCheck<'_, Motorcycle>>,
    ) -> RepoResult<Motorcycle> {
        self.record();
        let exists = exists.ok_or(RepoError::MissingExistsCheck)?;
        if exists(&entity)? {
            return Err(RepoError::AlreadyExists);
        }
        let next_id = self.rows.borrow().iter().map(|row| row.id).max().unwrap_or(0) + 1;
        entity.id = next_id;
        entity.created_utc = Some(1);
        self.rows.borrow_mut().push(entity.clone());
        if !exists(&entity)? {
            return Err(RepoError::VerificationFailed {
                action: RepoAction::Insert,
                id: next_id,
            });
        }
        Ok(entity)
    }

    fn update(
        &self,
        id: i64,
        mut entity: Motorcycle,
        unique: Option<&UniqueCheck<'_, Motorcycle>>,
    ) -> RepoResult<Motorcycle> {
        self.record();
        let current = self
            .rows
            .borrow()
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or(RepoError::NotFound {
                id,
                action: RepoAction::Update,
            })?;
        let unique = unique.ok_or(RepoError::MissingUniqueCheck)?;
        if !unique(&entity)? {
            return Err(RepoError::UniqueViolation { id });
        }
        entity.id = current.id;
        entity.created_utc = current.created_utc;
        entity.modified_utc = Some(current.modified_utc.unwrap_or(0) + 1);
        let mut rows = self.rows.borrow_mut();
        if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
            *row = entity.clone();
        }
        Ok(entity)
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        self.record();
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound {
                id,
                action: RepoAction::Delete,
            });
        }
        Ok(())
    }

    fn begin(&self) -> RepoResult<()> {
        self.record();
        Ok(())
    }

    fn save(&self) -> RepoResult<()> {
        self.record();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn discard(&self) -> RepoResult<()> {
        self.record();
        self.discards.set(self.discards.get() + 1);
        Ok(())
    }

    fn validate(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl MotorcycleRepository for RecordingRepository {
    fn exists_by_vin(&self, vin: &str) -> RepoResult<bool> {
        self.record();
        Ok(self
            .rows
            .borrow()
            .iter()
            .any(|row| row.vin.eq_ignore_ascii_case(vin)))
    }

    fn fetch_by_vin(&self, vin: &str) -> RepoResult<Option<Motorcycle>> {
        self.record();
        Ok(self
            .rows
            .borrow()
            .iter()
            .find(|row| row.vin.eq_ignore_ascii_case(vin))
            .cloned())
    }

    fn is_vin_unique(&self, vin: &str, except_id: Option<i64>) -> RepoResult<bool> {
        self.record();
        Ok(!self
            .rows
            .borrow()
            .iter()
            .any(|row| Some(row.id) != except_id && row.vin.eq_ignore_ascii_case(vin)))
    }
}
