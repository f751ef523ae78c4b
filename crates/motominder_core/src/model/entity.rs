//! Persisted entity contract shared by every repository.

use crate::error::Error;

/// Identity, tenancy, tombstone and audit timestamps of a persisted entity.
///
/// Timestamps are Unix epoch milliseconds.
///
/// # Invariants
/// - `id() == 0` before insertion, store-assigned positive value after.
/// - `created_utc()` is `None` before insertion and never changes after.
/// - `modified_utc()` is `None` until the first successful update.
pub trait Entity: Clone + PartialEq {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn tenant_id(&self) -> i64;
    fn set_tenant_id(&mut self, tenant_id: i64);
    fn is_deleted(&self) -> bool;
    fn created_utc(&self) -> Option<i64>;
    fn set_created_utc(&mut self, at: i64);
    fn modified_utc(&self) -> Option<i64>;
    fn set_modified_utc(&mut self, at: i64);

    /// Runs every field rule and reports all violations at once.
    fn validate(&self) -> Result<(), Error>;
}
