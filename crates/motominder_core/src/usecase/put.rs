//! Replace the fields of an existing motorcycle.

use crate::auth::AuthService;
use crate::error::Error;
use crate::model::motorcycle::Motorcycle;
use crate::repo::entity_repo::UniqueCheck;
use crate::repo::motorcycle_repo::MotorcycleRepository;
use crate::status::OperationStatus;
use crate::usecase::requests::PutMotorcycleRequest;
use crate::usecase::responses::PutMotorcycleResponse;
use crate::usecase::{authorize, log_outcome, within_unit_of_work};

pub struct PutMotorcycleInteractor<R, A> {
    repository: R,
    auth: A,
}

impl<R, A> PutMotorcycleInteractor<R, A>
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

    /// Updates the motorcycle with `request.id` unless another motorcycle in
    /// the tenant already carries the new VIN.
    ///
    /// # Errors
    /// Returns `Err` only when the response itself would be malformed.
    pub fn handle(&self, request: &PutMotorcycleRequest) -> Result<PutMotorcycleResponse, Error> {
        if let Err((status, error)) = authorize(&self.auth, "Put") {
            return PutMotorcycleResponse::new(request.id, status, Some(error));
        }

        if let Err(error) = request.validate() {
            log_outcome("put", OperationStatus::BadRequest);
            return PutMotorcycleResponse::new(request.id, OperationStatus::BadRequest, Some(error));
        }

        let id = request.id;
        let outcome = within_unit_of_work(&self.repository, |repository| {
            let vin_free: &UniqueCheck<'_, Motorcycle> =
                &|candidate: &Motorcycle| repository.is_vin_unique(&candidate.vin, Some(id));
            repository.update(id, request.motorcycle.clone(), Some(vin_free))
        });

        match outcome {
            Ok(stored) => {
                log_outcome("put", OperationStatus::Ok);
                PutMotorcycleResponse::new(stored.id, OperationStatus::Ok, None)
            }
            Err(err) => {
                log_outcome("put", err.status());
                PutMotorcycleResponse::new(id, err.status(), Some(err.to_error()))
            }
        }
    }
}
