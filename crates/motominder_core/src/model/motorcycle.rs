//! Motorcycle domain entity.
//!
//! # Responsibility
//! - Define the persisted motorcycle record.
//! - Provide the validating factory and the field rules behind it.
//!
//! # Invariants
//! - Validation checks every rule on every call; violations accumulate.
//! - A freshly built motorcycle has `id == INVALID_ENTITY_ID`,
//!   `tenant_id == INVALID_TENANT_ID` and no timestamps.
//! - VIN uniqueness is not an entity rule; repositories enforce it per tenant.

use crate::error::Error;
use crate::model::entity::Entity;
use serde::{Deserialize, Serialize};

/// Identity value of an entity that has not been inserted yet.
pub const INVALID_ENTITY_ID: i64 = 0;
/// Tenant value of an entity that has not been bound to a store.
pub const INVALID_TENANT_ID: i64 = 0;
/// Smallest identity the store ever assigns.
pub const MIN_ENTITY_ID: i64 = 1;
pub const MAX_MAKE_LENGTH: usize = 20;
pub const MAX_MODEL_LENGTH: usize = 20;
pub const MIN_YEAR: u32 = 1999;
pub const MAX_YEAR: u32 = 2020;
pub const VIN_LENGTH: usize = 17;
/// Makes rejected as motorcycle manufacturers (case-insensitive).
pub const INVALID_MAKES: &[&str] = &["Ford"];

/// Persisted motorcycle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motorcycle {
    /// Store-assigned identity. `0` until inserted.
    pub id: i64,
    /// Multi-tenant partition key.
    pub tenant_id: i64,
    pub make: String,
    pub model: String,
    pub year: u32,
    /// Vehicle identification number, exactly 17 characters.
    pub vin: String,
    /// Soft delete tombstone; hidden from every tenant-scoped query.
    pub is_deleted: bool,
    /// Epoch ms, stamped once on insert.
    pub created_utc: Option<i64>,
    /// Epoch ms, stamped on every successful update.
    pub modified_utc: Option<i64>,
}

impl Motorcycle {
    /// Builds a validated, not-yet-persisted motorcycle.
    ///
    /// # Errors
    /// Returns every violated field rule when any field is invalid.
    pub fn new(
        make: impl Into<String>,
        model: impl Into<String>,
        year: u32,
        vin: impl Into<String>,
    ) -> Result<Self, Error> {
        let motorcycle = Self {
            id: INVALID_ENTITY_ID,
            tenant_id: INVALID_TENANT_ID,
            make: make.into(),
            model: model.into(),
            year,
            vin: vin.into(),
            is_deleted: false,
            created_utc: None,
            modified_utc: None,
        };
        motorcycle.validate()?;
        Ok(motorcycle)
    }

    /// Validates identity fields and every domain field.
    pub fn validate(&self) -> Result<(), Error> {
        let mut error = Error::new();
        error.absorb(validate_non_id_fields(
            &self.make,
            &self.model,
            self.year,
            &self.vin,
        ));
        if self.id < 0 {
            error.add("The Id cannot be a negative value.");
        }
        if self.tenant_id < 0 {
            error.add("The TenantId cannot be a negative value.");
        }
        error.into_result()
    }

    /// Marks this motorcycle as softly deleted.
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
    }

    /// Clears the soft delete flag.
    pub fn restore(&mut self) {
        self.is_deleted = false;
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

impl Entity for Motorcycle {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn tenant_id(&self) -> i64 {
        self.tenant_id
    }

    fn set_tenant_id(&mut self, tenant_id: i64) {
        self.tenant_id = tenant_id;
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn created_utc(&self) -> Option<i64> {
        self.created_utc
    }

    fn set_created_utc(&mut self, at: i64) {
        self.created_utc = Some(at);
    }

    fn modified_utc(&self) -> Option<i64> {
        self.modified_utc
    }

    fn set_modified_utc(&mut self, at: i64) {
        self.modified_utc = Some(at);
    }

    fn validate(&self) -> Result<(), Error> {
        Motorcycle::validate(self)
    }
}

/// Validates the caller-supplied motorcycle fields (everything except identity).
pub fn validate_non_id_fields(make: &str, model: &str, year: u32, vin: &str) -> Result<(), Error> {
    let mut error = Error::new();
    error.absorb(validate_make(make));
    error.absorb(validate_model(model));
    error.absorb(validate_year(year));
    error.absorb(validate_vin(vin));
    error.into_result()
}

fn validate_make(make: &str) -> Result<(), Error> {
    let mut error = Error::new();
    if make.is_empty() {
        error.add("A make cannot be empty.");
    }
    if make.chars().count() > MAX_MAKE_LENGTH {
        error.add(format!(
            "A make cannot contain more than {MAX_MAKE_LENGTH} characters."
        ));
    }
    let lowered = make.to_lowercase();
    if INVALID_MAKES
        .iter()
        .any(|invalid| invalid.to_lowercase() == lowered)
    {
        error.add(format!(
            "Make '{make}' is not a valid motorcycle manufacturer."
        ));
    }
    error.into_result()
}

fn validate_model(model: &str) -> Result<(), Error> {
    let mut error = Error::new();
    if model.is_empty() {
        error.add("A model cannot be empty.");
    }
    if model.chars().count() > MAX_MODEL_LENGTH {
        error.add(format!(
            "A model's name cannot be more than {MAX_MODEL_LENGTH} characters."
        ));
    }
    error.into_result()
}

fn validate_year(year: u32) -> Result<(), Error> {
    let mut error = Error::new();
    if year < MIN_YEAR {
        error.add(format!("A year cannot be less than {MIN_YEAR}."));
    }
    if year > MAX_YEAR {
        error.add(format!("A year cannot be more than {MAX_YEAR}."));
    }
    error.into_result()
}

fn validate_vin(vin: &str) -> Result<(), Error> {
    let mut error = Error::new();
    let length = vin.chars().count();
    if length != VIN_LENGTH {
        error.add(format!(
            "A VIN requires {VIN_LENGTH} characters, but the provided value had {length} characters."
        ));
    }
    if length > VIN_LENGTH {
        error.add(format!("A VIN cannot be more than {VIN_LENGTH} characters."));
    }
    if length < VIN_LENGTH {
        error.add(format!("A VIN cannot be less than {VIN_LENGTH} characters."));
    }
    error.into_result()
}
