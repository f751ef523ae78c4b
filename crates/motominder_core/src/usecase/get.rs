//! Look up one motorcycle by id.

use crate::auth::AuthService;
use crate::error::Error;
use crate::repo::motorcycle_repo::MotorcycleRepository;
use crate::status::OperationStatus;
use crate::usecase::requests::GetMotorcycleRequest;
use crate::usecase::responses::GetMotorcycleResponse;
use crate::usecase::{authorize, log_outcome, read_then_save};

pub struct GetMotorcycleInteractor<R, A> {
    repository: R,
    auth: A,
}

impl<R, A> GetMotorcycleInteractor<R, A>
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
    pub fn handle(&self, request: &GetMotorcycleRequest) -> Result<GetMotorcycleResponse, Error> {
        if let Err((status, error)) = authorize(&self.auth, "Get") {
            return GetMotorcycleResponse::new(None, status, Some(error));
        }

        if let Err(error) = request.validate() {
            log_outcome("get", OperationStatus::BadRequest);
            return GetMotorcycleResponse::new(None, OperationStatus::BadRequest, Some(error));
        }

        let id = request.id;
        match read_then_save(&self.repository, |repository| repository.fetch_by_id(id)) {
            Ok(Some(motorcycle)) => {
                log_outcome("get", OperationStatus::Ok);
                GetMotorcycleResponse::new(Some(motorcycle), OperationStatus::Ok, None)
            }
            Ok(None) => {
                log_outcome("get", OperationStatus::NotFound);
                GetMotorcycleResponse::new(
                    None,
                    OperationStatus::NotFound,
                    Some(Error::from_message(format!(
                        "The motorcycle with Id '{id}' could not be found."
                    ))),
                )
            }
            Err(err) => {
                log_outcome("get", err.status());
                GetMotorcycleResponse::new(None, err.status(), Some(err.to_error()))
            }
        }
    }
}
