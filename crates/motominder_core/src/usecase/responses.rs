//! Response messages returned by the motorcycle use cases.
//!
//! # Invariants
//! - A response that fails its own validation is never returned; the caller
//!   gets the validation messages (followed by any business error) instead.
//! - Success statuses carry no error; every other status carries one.

use crate::error::Error;
use crate::model::motorcycle::{Motorcycle, MIN_ENTITY_ID};
use crate::status::OperationStatus;
use serde::{Deserialize, Serialize};

fn validate_status(status: OperationStatus, error: Option<&Error>) -> Result<(), Error> {
    match (status.is_success(), error) {
        (true, Some(_)) => Err(Error::from_message(format!(
            "A response with status '{status}' cannot carry an error."
        ))),
        (false, None) => Err(Error::from_message(format!(
            "A response with status '{status}' must carry an error."
        ))),
        _ => Ok(()),
    }
}

fn validate_positive_id(id: i64) -> Result<(), Error> {
    if id < MIN_ENTITY_ID {
        return Err(Error::from_message(
            "The id cannot be zero or a negative number.",
        ));
    }
    Ok(())
}

/// Drops an error aggregate that carries no messages.
fn normalize(error: Option<Error>) -> Option<Error> {
    error.filter(|error| !error.is_empty())
}

/// Returns the response when it is well formed, otherwise its validation
/// messages merged with the business error it was going to carry.
fn finish<R>(response: R, validation: Result<(), Error>, error: Option<&Error>) -> Result<R, Error> {
    match validation {
        Ok(()) => Ok(response),
        Err(validation) => Err(validation + error.cloned()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMotorcycleResponse {
    /// Store-assigned id; `0` when nothing was inserted.
    pub id: i64,
    pub status: OperationStatus,
    pub error: Option<Error>,
}

impl PostMotorcycleResponse {
    pub fn new(id: i64, status: OperationStatus, error: Option<Error>) -> Result<Self, Error> {
        let response = Self {
            id,
            status,
            error: normalize(error),
        };
        let validation = response.validate();
        let error = response.error.clone();
        finish(response, validation, error.as_ref())
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut error = Error::new();
        error.absorb(validate_status(self.status, self.error.as_ref()));
        if self.id < 0 {
            error.add("The id cannot be a negative number.");
        } else if self.status.is_success() {
            error.absorb(validate_positive_id(self.id));
        }
        error.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutMotorcycleResponse {
    pub id: i64,
    pub status: OperationStatus,
    pub error: Option<Error>,
}

impl PutMotorcycleResponse {
    pub fn new(id: i64, status: OperationStatus, error: Option<Error>) -> Result<Self, Error> {
        let response = Self {
            id,
            status,
            error: normalize(error),
        };
        let validation = response.validate();
        let error = response.error.clone();
        finish(response, validation, error.as_ref())
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut error = Error::new();
        error.absorb(validate_status(self.status, self.error.as_ref()));
        error.absorb(validate_positive_id(self.id));
        error.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteMotorcycleResponse {
    pub id: i64,
    pub status: OperationStatus,
    pub error: Option<Error>,
}

impl DeleteMotorcycleResponse {
    pub fn new(id: i64, status: OperationStatus, error: Option<Error>) -> Result<Self, Error> {
        let response = Self {
            id,
            status,
            error: normalize(error),
        };
        let validation = response.validate();
        let error = response.error.clone();
        finish(response, validation, error.as_ref())
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut error = Error::new();
        error.absorb(validate_status(self.status, self.error.as_ref()));
        error.absorb(validate_positive_id(self.id));
        error.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetMotorcycleResponse {
    pub motorcycle: Option<Motorcycle>,
    pub status: OperationStatus,
    pub error: Option<Error>,
}

impl GetMotorcycleResponse {
    pub fn new(
        motorcycle: Option<Motorcycle>,
        status: OperationStatus,
        error: Option<Error>,
    ) -> Result<Self, Error> {
        let response = Self {
            motorcycle,
            status,
            error: normalize(error),
        };
        let validation = response.validate();
        let error = response.error.clone();
        finish(response, validation, error.as_ref())
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut error = Error::new();
        error.absorb(validate_status(self.status, self.error.as_ref()));
        match &self.motorcycle {
            Some(motorcycle) => error.absorb(motorcycle.validate()),
            None if self.status.is_success() => {
                error.add("A successful get response must carry the motorcycle.");
            }
            None => {}
        }
        error.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMotorcyclesResponse {
    pub motorcycles: Option<Vec<Motorcycle>>,
    pub status: OperationStatus,
    pub error: Option<Error>,
}

impl ListMotorcyclesResponse {
    pub fn new(
        motorcycles: Option<Vec<Motorcycle>>,
        status: OperationStatus,
        error: Option<Error>,
    ) -> Result<Self, Error> {
        let response = Self {
            motorcycles,
            status,
            error: normalize(error),
        };
        let validation = response.validate();
        let error = response.error.clone();
        finish(response, validation, error.as_ref())
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut error = Error::new();
        error.absorb(validate_status(self.status, self.error.as_ref()));
        match &self.motorcycles {
            Some(motorcycles) => {
                for motorcycle in motorcycles {
                    error.absorb(motorcycle.validate());
                }
            }
            None if self.status.is_success() => {
                error.add("A successful list response must carry the motorcycle list.");
            }
            None => {}
        }
        error.into_result()
    }
}
