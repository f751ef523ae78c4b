//! Generic entity repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide fetch/exists/list/insert/update/delete over one entity table.
//! - Re-verify every mutation by reading the store back.
//! - Expose the unit-of-work boundary (`begin`/`save`/`discard`) callers own.
//!
//! # Invariants
//! - Every read is scoped to the repository tenant and hides soft-deleted rows.
//! - `id`, `tenant_id` and `created_utc` are never rewritten by `update`.
//! - `modified_utc` strictly increases on every successful update.
//!
//! # Concurrency
//! Check → write → verify is only atomic inside a unit of work: `begin`
//! takes SQLite's write lock (`BEGIN IMMEDIATE`). Outside one, a concurrent
//! writer can interleave between the pre-check and the write; the unique
//! index on active VINs stays authoritative in that case.

use crate::db::migrations::latest_version;
use crate::error::Error;
use crate::model::entity::Entity;
use crate::repo::{RepoAction, RepoError, RepoResult};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode, Row};
use std::marker::PhantomData;
use std::time::{SystemTime, UNIX_EPOCH};

/// Caller-supplied "does this entity already exist" check used by `insert`.
pub type ExistsCheck<'a, E> = dyn Fn(&E) -> RepoResult<bool> + 'a;

/// Caller-supplied "are this entity's unique fields still unique" check used by `update`.
pub type UniqueCheck<'a, E> = dyn Fn(&E) -> RepoResult<bool> + 'a;

/// Columns every entity table carries, in select order.
pub const ENTITY_COLUMNS: &[&str] = &[
    "id",
    "tenant_id",
    "is_deleted",
    "created_utc",
    "modified_utc",
];

/// Repository interface over one entity type.
pub trait Repository<E: Entity> {
    /// Point lookup. Absence is `Ok(None)`.
    fn fetch_by_id(&self, id: i64) -> RepoResult<Option<E>>;
    /// Existence probe; never mutates state.
    fn exists_by_id(&self, id: i64) -> RepoResult<bool>;
    /// Every visible entity, in ascending id order. Possibly empty.
    fn list(&self) -> RepoResult<Vec<E>>;
    /// Inserts after a negative `exists` pre-check and confirms with a
    /// positive post-check. Returns the stored entity.
    ///
    /// A failed post-check returns `VerificationFailed` after the row is
    /// written. Only an open unit of work lets the caller `discard` it.
    fn insert(&self, entity: E, exists: Option<&ExistsCheck<'_, E>>) -> RepoResult<E>;
    /// Rewrites the domain fields of `id` once `unique` confirms the new
    /// values, then compares the read-back with `entity`.
    ///
    /// As with `insert`, a mismatched read-back is reported after the write;
    /// outside a unit of work the new values stay committed.
    fn update(&self, id: i64, entity: E, unique: Option<&UniqueCheck<'_, E>>) -> RepoResult<E>;
    /// Soft-deletes `id` and confirms it is no longer visible.
    fn delete(&self, id: i64) -> RepoResult<()>;
    /// Opens a unit of work. Joins the current one when already open.
    fn begin(&self) -> RepoResult<()>;
    /// Commits the open unit of work. No-op when none is open.
    fn save(&self) -> RepoResult<()>;
    /// Rolls back the open unit of work. No-op when none is open.
    fn discard(&self) -> RepoResult<()>;
    /// Structural self-check of the persistence context.
    fn validate(&self) -> Result<(), Error>;
}

impl<E: Entity, T: Repository<E> + ?Sized> Repository<E> for &T {
    fn fetch_by_id(&self, id: i64) -> RepoResult<Option<E>> {
        (**self).fetch_by_id(id)
    }

    fn exists_by_id(&self, id: i64) -> RepoResult<bool> {
        (**self).exists_by_id(id)
    }

    fn list(&self) -> RepoResult<Vec<E>> {
        (**self).list()
    }

    fn insert(&self, entity: E, exists: Option<&ExistsCheck<'_, E>>) -> RepoResult<E> {
        (**self).insert(entity, exists)
    }

    fn update(&self, id: i64, entity: E, unique: Option<&UniqueCheck<'_, E>>) -> RepoResult<E> {
        (**self).update(id, entity, unique)
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        (**self).delete(id)
    }

    fn begin(&self) -> RepoResult<()> {
        (**self).begin()
    }

    fn save(&self) -> RepoResult<()> {
        (**self).save()
    }

    fn discard(&self) -> RepoResult<()> {
        (**self).discard()
    }

    fn validate(&self) -> Result<(), Error> {
        (**self).validate()
    }
}

/// Table mapping for entities stored by [`SqliteRepository`].
pub trait SqlEntity: Entity {
    const TABLE: &'static str;
    /// Domain columns, excluding [`ENTITY_COLUMNS`].
    const FIELD_COLUMNS: &'static [&'static str];

    /// Values bound to [`Self::FIELD_COLUMNS`], in the same order.
    fn field_values(&self) -> Vec<Value>;

    /// Builds an entity from a row selecting `ENTITY_COLUMNS` then `FIELD_COLUMNS`.
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// SQLite-backed repository bound to one tenant.
pub struct SqliteRepository<'conn, E> {
    conn: &'conn Connection,
    tenant_id: i64,
    _entity: PhantomData<fn() -> E>,
}

impl<'conn, E: SqlEntity> SqliteRepository<'conn, E> {
    /// Creates a repository over a migrated connection.
    ///
    /// # Errors
    /// Fails when `tenant_id` is negative or the schema is not ready.
    pub fn try_new(conn: &'conn Connection, tenant_id: i64) -> RepoResult<Self> {
        if tenant_id < 0 {
            return Err(RepoError::InvalidTenant(tenant_id));
        }
        ensure_connection_ready(conn, E::TABLE, E::FIELD_COLUMNS)?;
        Ok(Self {
            conn,
            tenant_id,
            _entity: PhantomData,
        })
    }

    pub fn tenant_id(&self) -> i64 {
        self.tenant_id
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }

    /// `SELECT` prefix with every mapped column and the tenant/tombstone filter.
    pub(crate) fn select_visible_sql(&self) -> String {
        let columns: Vec<&str> = ENTITY_COLUMNS
            .iter()
            .chain(E::FIELD_COLUMNS)
            .copied()
            .collect();
        format!(
            "SELECT {} FROM {} WHERE tenant_id = ?1 AND is_deleted = 0",
            columns.join(", "),
            E::TABLE
        )
    }

    /// Runs a visible-row query whose extra parameters start at `?2`.
    pub(crate) fn query_visible(
        &self,
        filter_sql: &str,
        params: Vec<Value>,
    ) -> RepoResult<Vec<E>> {
        let sql = format!("{} {filter_sql}", self.select_visible_sql());
        let mut bind_values = vec![Value::Integer(self.tenant_id)];
        bind_values.extend(params);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(E::from_row(row)?);
        }
        Ok(items)
    }

    fn insert_row(&self, entity: &E) -> RepoResult<i64> {
        let columns: Vec<&str> = ["tenant_id", "is_deleted", "created_utc"]
            .into_iter()
            .chain(E::FIELD_COLUMNS.iter().copied())
            .collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("?{n}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({});",
            E::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut values = vec![
            Value::Integer(entity.tenant_id()),
            Value::Integer(bool_to_int(entity.is_deleted())),
            optional_integer(entity.created_utc()),
        ];
        values.extend(entity.field_values());

        self.conn
            .execute(&sql, params_from_iter(values))
            .map_err(|err| map_unique_violation(err, RepoError::AlreadyExists))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_row(&self, id: i64, entity: &E) -> RepoResult<usize> {
        let field_count = E::FIELD_COLUMNS.len();
        let assignments: Vec<String> = E::FIELD_COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect();
        let sql = format!(
            "UPDATE {}
             SET {}, modified_utc = ?{}
             WHERE id = ?{} AND tenant_id = ?{} AND is_deleted = 0;",
            E::TABLE,
            assignments.join(", "),
            field_count + 1,
            field_count + 2,
            field_count + 3
        );

        let mut values = entity.field_values();
        values.push(optional_integer(entity.modified_utc()));
        values.push(Value::Integer(id));
        values.push(Value::Integer(self.tenant_id));

        let changed = self
            .conn
            .execute(&sql, params_from_iter(values))
            .map_err(|err| map_unique_violation(err, RepoError::UniqueViolation { id }))?;
        Ok(changed)
    }
}

impl<E: SqlEntity> Repository<E> for SqliteRepository<'_, E> {
    fn fetch_by_id(&self, id: i64) -> RepoResult<Option<E>> {
        let mut items = self.query_visible("AND id = ?2", vec![Value::Integer(id)])?;
        Ok(items.pop())
    }

    fn exists_by_id(&self, id: i64) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            &format!(
                "SELECT EXISTS(
                    SELECT 1 FROM {}
                    WHERE id = ?1 AND tenant_id = ?2 AND is_deleted = 0
                );",
                E::TABLE
            ),
            [id, self.tenant_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list(&self) -> RepoResult<Vec<E>> {
        self.query_visible("ORDER BY id ASC", Vec::new())
    }

    fn insert(&self, mut entity: E, exists: Option<&ExistsCheck<'_, E>>) -> RepoResult<E> {
        let exists = exists.ok_or(RepoError::MissingExistsCheck)?;

        if exists(&entity)? {
            debug!(
                "event=repo_insert module=repo table={} status=rejected reason=already_exists",
                E::TABLE
            );
            return Err(RepoError::AlreadyExists);
        }

        entity.set_tenant_id(self.tenant_id);
        entity.validate()?;
        entity.set_created_utc(now_epoch_ms());

        let id = self.insert_row(&entity)?;
        entity.set_id(id);

        if !exists(&entity)? {
            warn!(
                "event=repo_insert module=repo table={} status=verification_failed id={id}",
                E::TABLE
            );
            return Err(RepoError::VerificationFailed {
                action: RepoAction::Insert,
                id,
            });
        }

        debug!(
            "event=repo_insert module=repo table={} status=ok id={id}",
            E::TABLE
        );
        Ok(entity)
    }

    fn update(&self, id: i64, mut entity: E, unique: Option<&UniqueCheck<'_, E>>) -> RepoResult<E> {
        let Some(current) = self.fetch_by_id(id)? else {
            return Err(RepoError::NotFound {
                id,
                action: RepoAction::Update,
            });
        };

        // Identity and creation stamp always come from the stored row.
        entity.set_id(current.id());
        entity.set_tenant_id(current.tenant_id());
        if let Some(created_utc) = current.created_utc() {
            entity.set_created_utc(created_utc);
        }

        let unique = unique.ok_or(RepoError::MissingUniqueCheck)?;
        if !unique(&entity)? {
            debug!(
                "event=repo_update module=repo table={} status=rejected reason=unique_violation id={id}",
                E::TABLE
            );
            return Err(RepoError::UniqueViolation { id });
        }

        entity.validate()?;
        entity.set_modified_utc(next_modified_stamp(current.modified_utc()));
        self.update_row(id, &entity)?;

        match self.fetch_by_id(id)? {
            Some(stored) if stored == entity => {
                debug!(
                    "event=repo_update module=repo table={} status=ok id={id}",
                    E::TABLE
                );
                Ok(stored)
            }
            _ => {
                warn!(
                    "event=repo_update module=repo table={} status=verification_failed id={id}",
                    E::TABLE
                );
                Err(RepoError::VerificationFailed {
                    action: RepoAction::Update,
                    id,
                })
            }
        }
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        let Some(entity) = self.fetch_by_id(id)? else {
            return Err(RepoError::NotFound {
                id,
                action: RepoAction::Delete,
            });
        };

        self.conn.execute(
            &format!(
                "UPDATE {}
                 SET is_deleted = 1, modified_utc = ?1
                 WHERE id = ?2 AND tenant_id = ?3 AND is_deleted = 0;",
                E::TABLE
            ),
            [
                next_modified_stamp(entity.modified_utc()),
                id,
                self.tenant_id,
            ],
        )?;

        if self.exists_by_id(id)? {
            warn!(
                "event=repo_delete module=repo table={} status=verification_failed id={id}",
                E::TABLE
            );
            return Err(RepoError::VerificationFailed {
                action: RepoAction::Delete,
                id,
            });
        }

        debug!(
            "event=repo_delete module=repo table={} status=ok id={id}",
            E::TABLE
        );
        Ok(())
    }

    fn begin(&self) -> RepoResult<()> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        }
        Ok(())
    }

    fn save(&self) -> RepoResult<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT;")?;
        }
        Ok(())
    }

    fn discard(&self) -> RepoResult<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK;")?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), Error> {
        let mut error = Error::new();
        if self.tenant_id < 0 {
            error.add("The TenantId cannot be a negative value.");
        }
        if let Err(err) = ensure_connection_ready(self.conn, E::TABLE, E::FIELD_COLUMNS) {
            error.add(err.to_string());
        }
        error.into_result()
    }
}

/// Current wall clock as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Modification stamp strictly greater than `previous`.
fn next_modified_stamp(previous: Option<i64>) -> i64 {
    let now = now_epoch_ms();
    match previous {
        Some(previous) if previous >= now => previous.saturating_add(1),
        _ => now,
    }
}

fn map_unique_violation(err: rusqlite::Error, on_unique: RepoError) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            on_unique
        }
        _ => RepoError::from(err),
    }
}

fn optional_integer(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

/// Parses a stored 0/1 flag, rejecting anything else.
pub(crate) fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    field_columns: &'static [&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for column in ENTITY_COLUMNS.iter().chain(field_columns).copied() {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
