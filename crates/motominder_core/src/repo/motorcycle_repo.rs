//! Motorcycle table mapping and VIN lookups.
//!
//! # Invariants
//! - VIN comparisons ignore ASCII case, matching the storage unique index.
//! - Rows read back are validated; a corrupt row is `InvalidData`, never a
//!   silently accepted motorcycle.

use crate::model::motorcycle::Motorcycle;
use crate::repo::entity_repo::{parse_flag, Repository, SqlEntity, SqliteRepository};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::Row;

/// Motorcycle-specific queries on top of the generic repository.
pub trait MotorcycleRepository: Repository<Motorcycle> {
    /// True when an active motorcycle in the tenant carries `vin`.
    fn exists_by_vin(&self, vin: &str) -> RepoResult<bool>;
    fn fetch_by_vin(&self, vin: &str) -> RepoResult<Option<Motorcycle>>;
    /// True when no active motorcycle other than `except_id` carries `vin`.
    fn is_vin_unique(&self, vin: &str, except_id: Option<i64>) -> RepoResult<bool>;
}

impl<T: MotorcycleRepository + ?Sized> MotorcycleRepository for &T {
    fn exists_by_vin(&self, vin: &str) -> RepoResult<bool> {
        (**self).exists_by_vin(vin)
    }

    fn fetch_by_vin(&self, vin: &str) -> RepoResult<Option<Motorcycle>> {
        (**self).fetch_by_vin(vin)
    }

    fn is_vin_unique(&self, vin: &str, except_id: Option<i64>) -> RepoResult<bool> {
        (**self).is_vin_unique(vin, except_id)
    }
}

pub type SqliteMotorcycleRepository<'conn> = SqliteRepository<'conn, Motorcycle>;

impl SqlEntity for Motorcycle {
    const TABLE: &'static str = "motorcycles";
    const FIELD_COLUMNS: &'static [&'static str] = &["make", "model", "year", "vin"];

    fn field_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.make.clone()),
            Value::Text(self.model.clone()),
            Value::Integer(i64::from(self.year)),
            Value::Text(self.vin.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let id: i64 = row.get(0)?;
        let raw_year: i64 = row.get(7)?;
        let year = u32::try_from(raw_year).map_err(|_| {
            RepoError::InvalidData(format!("invalid year `{raw_year}` in motorcycles.year"))
        })?;

        let motorcycle = Motorcycle {
            id,
            tenant_id: row.get(1)?,
            is_deleted: parse_flag(row.get(2)?, "motorcycles.is_deleted")?,
            created_utc: row.get(3)?,
            modified_utc: row.get(4)?,
            make: row.get(5)?,
            model: row.get(6)?,
            year,
            vin: row.get(8)?,
        };

        motorcycle.validate().map_err(|err| {
            RepoError::InvalidData(format!("motorcycle row `{id}` failed validation: {err}"))
        })?;
        Ok(motorcycle)
    }
}

impl MotorcycleRepository for SqliteRepository<'_, Motorcycle> {
    fn exists_by_vin(&self, vin: &str) -> RepoResult<bool> {
        self.is_vin_unique(vin, None).map(|unique| !unique)
    }

    fn fetch_by_vin(&self, vin: &str) -> RepoResult<Option<Motorcycle>> {
        let mut items = self.query_visible(
            "AND vin = ?2 COLLATE NOCASE ORDER BY id ASC LIMIT 1",
            vec![Value::Text(vin.to_string())],
        )?;
        Ok(items.pop())
    }

    fn is_vin_unique(&self, vin: &str, except_id: Option<i64>) -> RepoResult<bool> {
        let taken: i64 = self.conn().query_row(
            "SELECT EXISTS(
                SELECT 1 FROM motorcycles
                WHERE tenant_id = ?1
                  AND is_deleted = 0
                  AND vin = ?2 COLLATE NOCASE
                  AND (?3 IS NULL OR id <> ?3)
            );",
            rusqlite::params![self.tenant_id(), vin, except_id],
            |row| row.get(0),
        )?;
        Ok(taken == 0)
    }
}
