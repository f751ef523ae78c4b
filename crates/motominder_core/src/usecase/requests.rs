//! Self-validating request messages for the motorcycle use cases.
//!
//! Every constructor runs `validate` and refuses to build an invalid request.

use crate::error::Error;
use crate::model::motorcycle::{validate_non_id_fields, Motorcycle, MIN_ENTITY_ID};
use serde::{Deserialize, Serialize};

const INVALID_ID_MESSAGE: &str = "The id cannot be zero or a negative number.";

fn validate_request_id(id: i64) -> Result<(), Error> {
    if id < MIN_ENTITY_ID {
        return Err(Error::from_message(INVALID_ID_MESSAGE));
    }
    Ok(())
}

/// Data needed to register a new motorcycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMotorcycleRequest {
    pub make: String,
    pub model: String,
    pub year: u32,
    pub vin: String,
}

impl PostMotorcycleRequest {
    pub fn new(
        make: impl Into<String>,
        model: impl Into<String>,
        year: u32,
        vin: impl Into<String>,
    ) -> Result<Self, Error> {
        let request = Self {
            make: make.into(),
            model: model.into(),
            year,
            vin: vin.into(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_non_id_fields(&self.make, &self.model, self.year, &self.vin)
    }
}

/// Replacement field values for the motorcycle with `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutMotorcycleRequest {
    pub id: i64,
    pub motorcycle: Motorcycle,
}

impl PutMotorcycleRequest {
    pub fn new(id: i64, motorcycle: Motorcycle) -> Result<Self, Error> {
        let request = Self { id, motorcycle };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let mut error = Error::new();
        error.absorb(validate_request_id(self.id));
        error.absorb(self.motorcycle.validate());
        error.into_result()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetMotorcycleRequest {
    pub id: i64,
}

impl GetMotorcycleRequest {
    pub fn new(id: i64) -> Result<Self, Error> {
        let request = Self { id };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_request_id(self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteMotorcycleRequest {
    pub id: i64,
}

impl DeleteMotorcycleRequest {
    pub fn new(id: i64) -> Result<Self, Error> {
        let request = Self { id };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), Error> {
        validate_request_id(self.id)
    }
}

/// Lists every active motorcycle of the caller's tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMotorcyclesRequest {}

impl ListMotorcyclesRequest {
    pub fn new() -> Self {
        Self {}
    }

    pub fn validate(&self) -> Result<(), Error> {
        Ok(())
    }
}
