//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the CRUD-with-verification contract over one entity type.
//! - Classify every failure into exactly one [`OperationStatus`].
//!
//! # Invariants
//! - Writes validate the entity first; invalid entities are never committed.
//! - Every mutation re-reads the store to verify its own postcondition.
//! - Not-found on a plain lookup is a payload (`None`/`false`), not an error.

pub mod entity_repo;
pub mod motorcycle_repo;

use crate::db::DbError;
use crate::error::Error as Aggregate;
use crate::status::OperationStatus;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Mutation a repository failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoAction {
    Insert,
    Update,
    Delete,
}

impl RepoAction {
    fn past_tense(self) -> &'static str {
        match self {
            Self::Insert => "inserted",
            Self::Update => "updated",
            Self::Delete => "deleted",
        }
    }
}

/// Repository outcome taxonomy.
#[derive(Debug)]
pub enum RepoError {
    /// Target id is absent (or soft-deleted) within the tenant scope.
    NotFound { id: i64, action: RepoAction },
    /// Insert pre-check or storage unique index found an existing entity.
    AlreadyExists,
    /// Insert was called without an existence check.
    MissingExistsCheck,
    /// Update was called without a uniqueness check.
    MissingUniqueCheck,
    /// Update would break a unique field constraint.
    UniqueViolation { id: i64 },
    /// Store read-back contradicts the write that was just issued.
    VerificationFailed { action: RepoAction, id: i64 },
    /// Entity failed field validation before the write.
    Validation(Aggregate),
    /// Negative tenant id passed at construction.
    InvalidTenant(i64),
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be converted to a valid entity.
    InvalidData(String),
}

impl RepoError {
    /// Classification reported upward alongside the message.
    pub fn status(&self) -> OperationStatus {
        match self {
            Self::NotFound { .. } => OperationStatus::NotFound,
            Self::AlreadyExists => OperationStatus::Found,
            Self::MissingExistsCheck
            | Self::MissingUniqueCheck
            | Self::UniqueViolation { .. }
            | Self::VerificationFailed { .. }
            | Self::Validation(_)
            | Self::InvalidTenant(_)
            | Self::Db(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => OperationStatus::InternalError,
        }
    }

    /// Message aggregate for this failure.
    pub fn to_error(&self) -> Aggregate {
        match self {
            Self::Validation(err) => err.clone(),
            other => Aggregate::from_message(other.to_string()),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { id, action } => write!(
                f,
                "The entity with Id '{id}' could not be found, so it was not {}.",
                action.past_tense()
            ),
            Self::AlreadyExists => write!(f, "The entity already exists in the repository."),
            Self::MissingExistsCheck => write!(
                f,
                "The exists check must be provided to determine whether the entity already exists in the repository."
            ),
            Self::MissingUniqueCheck => write!(
                f,
                "The unique check must be provided to determine whether the entity exists and is unique in the repository."
            ),
            Self::UniqueViolation { id } => write!(
                f,
                "The entity in the repository with Id '{id}' was not updated because a unique field constraint would be violated."
            ),
            Self::VerificationFailed { action, id } => match action {
                RepoAction::Insert => write!(
                    f,
                    "The new entity was not successfully inserted into the repository."
                ),
                RepoAction::Update => write!(
                    f,
                    "The entity with Id '{id}' failed to be updated in the repository."
                ),
                RepoAction::Delete => write!(
                    f,
                    "The entity with Id '{id}' was not successfully deleted from the repository."
                ),
            },
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidTenant(tenant_id) => {
                write!(f, "The TenantId cannot be a negative value, got {tenant_id}.")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Aggregate> for RepoError {
    fn from(value: Aggregate) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
