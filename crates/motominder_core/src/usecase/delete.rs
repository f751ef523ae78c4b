//! Delete one motorcycle by id.

use crate::auth::AuthService;
use crate::error::Error;
use crate::repo::motorcycle_repo::MotorcycleRepository;
use crate::status::OperationStatus;
use crate::usecase::requests::DeleteMotorcycleRequest;
use crate::usecase::responses::DeleteMotorcycleResponse;
use crate::usecase::{authorize, log_outcome, within_unit_of_work};

pub struct DeleteMotorcycleInteractor<R, A> {
    repository: R,
    auth: A,
}

impl<R, A> DeleteMotorcycleInteractor<R, A>
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
        request: &DeleteMotorcycleRequest,
    ) -> Result<DeleteMotorcycleResponse, Error> {
        if let Err((status, error)) = authorize(&self.auth, "Delete") {
            return DeleteMotorcycleResponse::new(request.id, status, Some(error));
        }

        if let Err(error) = request.validate() {
            log_outcome("delete", OperationStatus::BadRequest);
            return DeleteMotorcycleResponse::new(
                request.id,
                OperationStatus::BadRequest,
                Some(error),
            );
        }

        let id = request.id;
        match within_unit_of_work(&self.repository, |repository| repository.delete(id)) {
            Ok(()) => {
                log_outcome("delete", OperationStatus::Ok);
                DeleteMotorcycleResponse::new(id, OperationStatus::Ok, None)
            }
            Err(err) => {
                log_outcome("delete", err.status());
                DeleteMotorcycleResponse::new(id, err.status(), Some(err.to_error()))
            }
        }
    }
}
