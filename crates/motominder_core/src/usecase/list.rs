//! List every active motorcycle of the caller's tenant.

use crate::auth::AuthService;
use crate::error::Error;
use crate::repo::motorcycle_repo::MotorcycleRepository;
use crate::status::OperationStatus;
use crate::usecase::requests::ListMotorcyclesRequest;
use crate::usecase::responses::ListMotorcyclesResponse;
use crate::usecase::{authorize, log_outcome, read_then_save};

pub struct ListMotorcyclesInteractor<R, A> {
    repository: R,
    auth: A,
}

impl<R, A> ListMotorcyclesInteractor<R, A>
where
    R: MotorcycleRepository,
    A: AuthService,
{
    pub fn new(repository: R, auth: A) -> Self {
        Self { repository, auth }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// # Errors
    /// Returns `Err` only when the response itself would be malformed.
    pub fn handle(
        &self,
        _request: &ListMotorcyclesRequest,
    ) -> Result<ListMotorcyclesResponse, Error> {
        if let Err((status, error)) = authorize(&self.auth, "List") {
            return ListMotorcyclesResponse::new(None, status, Some(error));
        }

        match read_then_save(&self.repository, |repository| repository.list()) {
            Ok(motorcycles) => {
                log_outcome("list", OperationStatus::Ok);
                ListMotorcyclesResponse::new(Some(motorcycles), OperationStatus::Ok, None)
            }
            Err(err) => {
                log_outcome("list", err.status());
                ListMotorcyclesResponse::new(None, err.status(), Some(err.to_error()))
            }
        }
    }
}
