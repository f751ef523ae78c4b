use motominder_core::db::migrations::latest_version;
use motominder_core::db::open_db_in_memory;
use motominder_core::{
    ExistsCheck, Motorcycle, MotorcycleRepository, OperationStatus, RepoAction, RepoError,
    Repository, SqliteMotorcycleRepository, UniqueCheck,
};
use rusqlite::Connection;

const TENANT: i64 = 1;

fn honda(vin: &str) -> Motorcycle {
    Motorcycle::new("Honda", "Shadow", 2006, vin).unwrap()
}

fn insert(repo: &SqliteMotorcycleRepository<'_>, motorcycle: Motorcycle) -> Motorcycle {
    let by_vin: &ExistsCheck<'_, Motorcycle> = &|m: &Motorcycle| repo.exists_by_vin(&m.vin);
    repo.insert(motorcycle, Some(by_vin)).unwrap()
}

#[test]
fn insert_assigns_identity_and_creation_stamp() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();

    let by_id: &ExistsCheck<'_, Motorcycle> = &|m: &Motorcycle| repo.exists_by_id(m.id);
    let stored = repo
        .insert(honda("01234567890123456"), Some(by_id))
        .unwrap();

    assert!(stored.id > 0);
    assert_eq!(stored.tenant_id, TENANT);
    assert!(stored.created_utc.is_some());
    assert!(stored.modified_utc.is_none());
    assert!(repo.exists_by_id(stored.id).unwrap());
    assert_eq!(repo.fetch_by_id(stored.id).unwrap(), Some(stored));
}

#[test]
fn insert_without_exists_check_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();

    let err = repo.insert(honda("01234567890123456"), None).unwrap_err();
    assert!(matches!(err, RepoError::MissingExistsCheck));
    assert_eq!(err.status(), OperationStatus::InternalError);
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn insert_of_registered_vin_reports_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    insert(&repo, honda("01234567890123456"));

    let by_vin: &ExistsCheck<'_, Motorcycle> = &|m: &Motorcycle| repo.exists_by_vin(&m.vin);
    let err = repo
        .insert(honda("01234567890123456"), Some(by_vin))
        .unwrap_err();
    assert!(matches!(err, RepoError::AlreadyExists));
    assert_eq!(err.status(), OperationStatus::Found);
    assert_eq!(repo.list().unwrap().len(), 1);
}

#[test]
fn unique_index_backs_up_a_permissive_exists_check() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    insert(&repo, honda("ABCDEFGHIJKLMNOPQ"));

    let never: &ExistsCheck<'_, Motorcycle> = &|_: &Motorcycle| Ok(false);
    let err = repo
        .insert(honda("abcdefghijklmnopq"), Some(never))
        .unwrap_err();
    assert!(matches!(err, RepoError::AlreadyExists));
}

#[test]
fn failing_post_check_reports_verification_failure() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();

    let never: &ExistsCheck<'_, Motorcycle> = &|_: &Motorcycle| Ok(false);
    let err = repo
        .insert(honda("01234567890123456"), Some(never))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::VerificationFailed {
            action: RepoAction::Insert,
            ..
        }
    ));
    assert_eq!(
        err.to_error().messages(),
        ["The new entity was not successfully inserted into the repository."]
    );
}

#[test]
fn verification_failure_is_atomic_only_inside_a_unit_of_work() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    let never: &ExistsCheck<'_, Motorcycle> = &|_: &Motorcycle| Ok(false);

    repo.begin().unwrap();
    assert!(repo.insert(honda("01234567890123456"), Some(never)).is_err());
    repo.discard().unwrap();
    assert!(repo.list().unwrap().is_empty());

    assert!(repo.insert(honda("01234567890123456"), Some(never)).is_err());
    assert_eq!(repo.list().unwrap().len(), 1);
}

#[test]
fn invalid_entity_is_never_written() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();

    let mut motorcycle = honda("01234567890123456");
    motorcycle.year = 1900;
    let by_vin: &ExistsCheck<'_, Motorcycle> = &|m: &Motorcycle| repo.exists_by_vin(&m.vin);
    let err = repo.insert(motorcycle, Some(by_vin)).unwrap_err();

    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn update_keeps_identity_and_advances_modified_stamp() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    let stored = insert(&repo, honda("01234567890123456"));

    let mut changed = stored.clone();
    changed.model = "Rebel".to_string();
    changed.year = 2010;
    let id = stored.id;
    let unique: &UniqueCheck<'_, Motorcycle> =
        &|m: &Motorcycle| repo.is_vin_unique(&m.vin, Some(id));
    let first = repo.update(id, changed.clone(), Some(unique)).unwrap();

    assert_eq!(first.id, stored.id);
    assert_eq!(first.created_utc, stored.created_utc);
    assert_eq!(first.model, "Rebel");
    assert!(first.modified_utc.is_some());

    let second = repo.update(id, first.clone(), Some(unique)).unwrap();
    assert!(second.modified_utc > first.modified_utc);
    assert_eq!(repo.fetch_by_id(id).unwrap(), Some(second));
}

#[test]
fn update_cannot_move_identity_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    let stored = insert(&repo, honda("01234567890123456"));

    let mut changed = stored.clone();
    changed.id = 999;
    changed.tenant_id = 42;
    changed.created_utc = Some(0);
    let always: &UniqueCheck<'_, Motorcycle> = &|_: &Motorcycle| Ok(true);
    let updated = repo.update(stored.id, changed, Some(always)).unwrap();

    assert_eq!(updated.id, stored.id);
    assert_eq!(updated.tenant_id, TENANT);
    assert_eq!(updated.created_utc, stored.created_utc);
}

#[test]
fn update_of_missing_id_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();

    let always: &UniqueCheck<'_, Motorcycle> = &|_: &Motorcycle| Ok(true);
    let err = repo
        .update(5, honda("01234567890123456"), Some(always))
        .unwrap_err();
    assert_eq!(err.status(), OperationStatus::NotFound);
    assert_eq!(
        err.to_error().messages(),
        ["The entity with Id '5' could not be found, so it was not updated."]
    );
}

#[test]
fn update_to_a_taken_vin_is_a_unique_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    let first = insert(&repo, honda("01234567890123456"));
    insert(&repo, honda("ABCDEFGHIJKLMNOPQ"));

    let mut changed = first.clone();
    changed.vin = "abcdefghijklmnopq".to_string();
    let id = first.id;

    let unique: &UniqueCheck<'_, Motorcycle> =
        &|m: &Motorcycle| repo.is_vin_unique(&m.vin, Some(id));
    let err = repo.update(id, changed.clone(), Some(unique)).unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation { id: failed } if failed == id));

    // The storage index rejects the same change when the check lets it through.
    let always: &UniqueCheck<'_, Motorcycle> = &|_: &Motorcycle| Ok(true);
    let err = repo.update(id, changed, Some(always)).unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation { .. }));

    assert_eq!(repo.fetch_by_id(id).unwrap().unwrap().vin, "01234567890123456");
}

#[test]
fn update_without_unique_check_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    let stored = insert(&repo, honda("01234567890123456"));

    let err = repo.update(stored.id, stored.clone(), None).unwrap_err();
    assert!(matches!(err, RepoError::MissingUniqueCheck));
}

#[test]
fn delete_hides_the_row_but_keeps_it_stored() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    let stored = insert(&repo, honda("01234567890123456"));

    repo.delete(stored.id).unwrap();

    assert!(!repo.exists_by_id(stored.id).unwrap());
    assert_eq!(repo.fetch_by_id(stored.id).unwrap(), None);
    assert!(!repo.exists_by_vin("01234567890123456").unwrap());
    assert_eq!(raw_deleted_flag(&conn, stored.id), 1);

    // A tombstoned VIN can be registered again.
    insert(&repo, honda("01234567890123456"));
}

#[test]
fn delete_of_missing_id_reports_not_found_without_side_effects() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    let stored = insert(&repo, honda("01234567890123456"));

    let err = repo.delete(stored.id + 1).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            action: RepoAction::Delete,
            ..
        }
    ));
    assert_eq!(repo.list().unwrap(), vec![stored]);
}

#[test]
fn empty_store_lists_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    assert_eq!(repo.list().unwrap(), Vec::new());
}

#[test]
fn list_is_in_ascending_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    let a = insert(&repo, honda("AAAAAAAAAAAAAAAAA"));
    let b = insert(&repo, honda("BBBBBBBBBBBBBBBBB"));
    let c = insert(&repo, honda("CCCCCCCCCCCCCCCCC"));
    repo.delete(b.id).unwrap();

    let ids: Vec<i64> = repo.list().unwrap().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![a.id, c.id]);
}

#[test]
fn existence_probes_are_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    let stored = insert(&repo, honda("01234567890123456"));

    assert_eq!(
        repo.exists_by_id(stored.id).unwrap(),
        repo.exists_by_id(stored.id).unwrap()
    );
    assert!(repo.exists_by_vin("01234567890123456").unwrap());
    assert!(repo.exists_by_vin("01234567890123456").unwrap());
    assert_eq!(repo.list().unwrap().len(), 1);
}

#[test]
fn vin_lookups_ignore_case() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    let stored = insert(&repo, honda("ABCDEFGHIJKLMNOPQ"));

    assert!(repo.exists_by_vin("abcdefghijklmnopq").unwrap());
    assert_eq!(
        repo.fetch_by_vin("AbCdEfGhIjKlMnOpQ").unwrap(),
        Some(stored.clone())
    );
    assert!(repo
        .is_vin_unique("abcdefghijklmnopq", Some(stored.id))
        .unwrap());
    assert!(!repo.is_vin_unique("abcdefghijklmnopq", None).unwrap());
}

#[test]
fn tenants_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let first = SqliteMotorcycleRepository::try_new(&conn, 1).unwrap();
    let second = SqliteMotorcycleRepository::try_new(&conn, 2).unwrap();

    let stored = insert(&first, honda("01234567890123456"));

    assert!(!second.exists_by_id(stored.id).unwrap());
    assert!(second.list().unwrap().is_empty());
    assert!(second.delete(stored.id).is_err());

    let again = insert(&second, honda("01234567890123456"));
    assert_eq!(again.tenant_id, 2);
    assert_eq!(first.list().unwrap().len(), 1);
}

#[test]
fn discard_rolls_back_staged_writes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();

    repo.begin().unwrap();
    let staged = insert(&repo, honda("01234567890123456"));
    assert!(repo.exists_by_id(staged.id).unwrap());
    repo.discard().unwrap();

    assert!(!repo.exists_by_id(staged.id).unwrap());
    assert!(conn.is_autocommit());
}

#[test]
fn save_commits_staged_writes_and_is_a_no_op_outside_a_unit_of_work() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();

    repo.save().unwrap();
    repo.discard().unwrap();

    repo.begin().unwrap();
    repo.begin().unwrap();
    let staged = insert(&repo, honda("01234567890123456"));
    repo.save().unwrap();

    assert!(conn.is_autocommit());
    assert!(repo.exists_by_id(staged.id).unwrap());
}

#[test]
fn negative_tenant_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let result = SqliteMotorcycleRepository::try_new(&conn, -1);
    assert!(matches!(result, Err(RepoError::InvalidTenant(-1))));
}

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteMotorcycleRepository::try_new(&conn, TENANT) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert_eq!(expected_version, latest_version());
            assert_eq!(actual_version, 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection must be rejected"),
    }
}

#[test]
fn repository_self_check_passes_on_migrated_store() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    assert!(repo.validate().is_ok());
}

#[test]
fn corrupt_row_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMotorcycleRepository::try_new(&conn, TENANT).unwrap();
    conn.execute(
        "INSERT INTO motorcycles (tenant_id, make, model, year, vin, is_deleted, created_utc)
         VALUES (?1, 'Ford', 'Falcon', 2006, '01234567890123456', 0, 1);",
        [TENANT],
    )
    .unwrap();

    assert!(matches!(repo.list(), Err(RepoError::InvalidData(_))));
}

fn raw_deleted_flag(conn: &Connection, id: i64) -> i64 {
    conn.query_row(
        "SELECT is_deleted FROM motorcycles WHERE id = ?1;",
        [id],
        |row| row.get(0),
    )
    .unwrap()
}
