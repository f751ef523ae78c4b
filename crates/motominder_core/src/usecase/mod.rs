//! Motorcycle use cases.
//!
//! # Responsibility
//! - Gate every request on authentication, then on the required role.
//! - Drive the repository inside one unit of work and build the response.
//!
//! # Invariants
//! - A denied request never reaches the repository.
//! - A mutating request commits exactly once on success and rolls back on
//!   any failure.

pub mod delete;
pub mod get;
pub mod list;
pub mod post;
pub mod put;
pub mod requests;
pub mod responses;

#[cfg(test)]
pub(crate) mod test_support;

use crate::auth::{AuthService, AuthorizationRole};
use crate::error::Error;
use crate::model::motorcycle::Motorcycle;
use crate::repo::entity_repo::Repository;
use crate::repo::RepoResult;
use crate::status::OperationStatus;
use log::{info, warn};

pub use delete::DeleteMotorcycleInteractor;
pub use get::GetMotorcycleInteractor;
pub use list::ListMotorcyclesInteractor;
pub use post::PostMotorcycleInteractor;
pub use put::PutMotorcycleInteractor;

/// Role every motorcycle use case requires.
pub const REQUIRED_ROLE: AuthorizationRole = AuthorizationRole::Admin;

/// Checks the caller against [`REQUIRED_ROLE`].
///
/// Returns the denial status and message for `operation` when refused.
pub(crate) fn authorize(
    auth: &impl AuthService,
    operation: &str,
) -> Result<(), (OperationStatus, Error)> {
    if !auth.is_authenticated() {
        info!(
            "event=motorcycle_{} module=usecase status=denied reason=not_authenticated",
            operation.to_ascii_lowercase()
        );
        return Err((
            OperationStatus::NotAuthenticated,
            Error::from_message(format!(
                "{operation} operation failed due to not being authenticated."
            )),
        ));
    }

    if !auth.is_authorized(REQUIRED_ROLE) {
        info!(
            "event=motorcycle_{} module=usecase status=denied reason=not_authorized role={REQUIRED_ROLE}",
            operation.to_ascii_lowercase()
        );
        return Err((
            OperationStatus::NotAuthorized,
            Error::from_message(format!(
                "{operation} operation failed due to not being authorized, so please contact your system administrator."
            )),
        ));
    }

    Ok(())
}

/// Runs `work` inside one unit of work: commit on success, roll back on failure.
pub(crate) fn within_unit_of_work<R, T>(
    repository: &R,
    work: impl FnOnce(&R) -> RepoResult<T>,
) -> RepoResult<T>
where
    R: Repository<Motorcycle>,
{
    repository.begin()?;
    let outcome = work(repository).and_then(|value| repository.save().map(|()| value));
    if outcome.is_err() {
        if let Err(err) = repository.discard() {
            warn!("event=unit_of_work module=usecase status=error action=discard error={err}");
        }
    }
    outcome
}

/// Runs a read, then flushes so nothing stays pending on the connection.
pub(crate) fn read_then_save<R, T>(
    repository: &R,
    read: impl FnOnce(&R) -> RepoResult<T>,
) -> RepoResult<T>
where
    R: Repository<Motorcycle>,
{
    let value = read(repository)?;
    repository.save()?;
    Ok(value)
}

/// Emits the one outcome event each interactor invocation logs.
pub(crate) fn log_outcome(operation: &str, status: OperationStatus) {
    if status.is_success() {
        info!(
            "event=motorcycle_{operation} module=usecase status=ok code={}",
            status.code()
        );
    } else {
        warn!(
            "event=motorcycle_{operation} module=usecase status=error code={}",
            status.code()
        );
    }
}
