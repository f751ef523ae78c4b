//! Domain model for tenant-scoped, soft-deletable entities.
//!
//! # Responsibility
//! - Define the canonical entity shape persisted by repositories.
//! - Own the field validation rules every persisted entity must satisfy.
//!
//! # Invariants
//! - Identity is store-assigned; `0` means "not yet inserted".
//! - Deletion is represented by the `is_deleted` tombstone, not row removal.

pub mod entity;
pub mod motorcycle;
