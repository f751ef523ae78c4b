//! Register a new motorcycle.

use crate::auth::AuthService;
use crate::error::Error;
use crate::model::motorcycle::{Motorcycle, INVALID_ENTITY_ID};
use crate::repo::entity_repo::ExistsCheck;
use crate::repo::motorcycle_repo::MotorcycleRepository;
use crate::status::OperationStatus;
use crate::usecase::requests::PostMotorcycleRequest;
use crate::usecase::responses::PostMotorcycleResponse;
use crate::usecase::{authorize, log_outcome, within_unit_of_work};

pub struct PostMotorcycleInteractor<R, A> {
    repository: R,
    auth: A,
}

impl<R, A> PostMotorcycleInteractor<R, A>
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

    /// Builds the motorcycle from the request and inserts it unless its VIN
    /// is already registered in the tenant.
    ///
    /// # Errors
    /// Returns `Err` only when the response itself would be malformed.
    pub fn handle(&self, request: &PostMotorcycleRequest) -> Result<PostMotorcycleResponse, Error> {
        if let Err((status, error)) = authorize(&self.auth, "Post") {
            return PostMotorcycleResponse::new(INVALID_ENTITY_ID, status, Some(error));
        }

        let motorcycle = match Motorcycle::new(
            request.make.clone(),
            request.model.clone(),
            request.year,
            request.vin.clone(),
        ) {
            Ok(motorcycle) => motorcycle,
            Err(error) => {
                log_outcome("post", OperationStatus::InternalError);
                return PostMotorcycleResponse::new(
                    INVALID_ENTITY_ID,
                    OperationStatus::InternalError,
                    Some(error),
                );
            }
        };

        let outcome = within_unit_of_work(&self.repository, |repository| {
            let vin_taken: &ExistsCheck<'_, Motorcycle> =
                &|candidate: &Motorcycle| repository.exists_by_vin(&candidate.vin);
            repository.insert(motorcycle, Some(vin_taken))
        });

        match outcome {
            Ok(stored) => {
                log_outcome("post", OperationStatus::Ok);
                PostMotorcycleResponse::new(stored.id, OperationStatus::Ok, None)
            }
            Err(err) => {
                log_outcome("post", err.status());
                PostMotorcycleResponse::new(INVALID_ENTITY_ID, err.status(), Some(err.to_error()))
            }
        }
    }
}
