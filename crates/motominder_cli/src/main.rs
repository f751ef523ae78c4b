//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load configuration, start logging and open the configured store.
//! - Drive one Post → Get → Put → List → Delete cycle and print each status.
//! - Own no business logic; every rule lives in `motominder_core`.

use log::info;
use motominder_core::{
    core_version, init_logging, open_db, open_db_in_memory, AuthorizationRole, CoreConfig,
    DeleteMotorcycleInteractor, DeleteMotorcycleRequest, GetMotorcycleInteractor,
    GetMotorcycleRequest, ListMotorcyclesInteractor, ListMotorcyclesRequest,
    PostMotorcycleInteractor, PostMotorcycleRequest, PutMotorcycleInteractor,
    PutMotorcycleRequest, SessionAuth, SqliteMotorcycleRepository,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("motominder: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::load()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    println!("motominder_core version={}", core_version());

    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repository = SqliteMotorcycleRepository::try_new(&conn, config.tenant_id)?;
    let auth = SessionAuth::with_roles(&[AuthorizationRole::Admin]);

    let post = PostMotorcycleInteractor::new(&repository, &auth);
    let posted = post.handle(&PostMotorcycleRequest::new(
        "Honda",
        "Shadow",
        2006,
        "01234567890123456",
    )?)?;
    report("post", posted.status.code(), posted.error.as_ref());
    let id = posted.id;
    if !posted.status.is_success() {
        return Ok(());
    }

    let get = GetMotorcycleInteractor::new(&repository, &auth);
    let fetched = get.handle(&GetMotorcycleRequest::new(id)?)?;
    report("get", fetched.status.code(), fetched.error.as_ref());

    if let Some(mut motorcycle) = fetched.motorcycle {
        motorcycle.model = "Shadow Aero".to_string();
        let put = PutMotorcycleInteractor::new(&repository, &auth);
        let updated = put.handle(&PutMotorcycleRequest::new(id, motorcycle)?)?;
        report("put", updated.status.code(), updated.error.as_ref());
    }

    let list = ListMotorcyclesInteractor::new(&repository, &auth);
    let listed = list.handle(&ListMotorcyclesRequest::new())?;
    report("list", listed.status.code(), listed.error.as_ref());
    println!(
        "list count={}",
        listed.motorcycles.as_ref().map_or(0, Vec::len)
    );

    let delete = DeleteMotorcycleInteractor::new(&repository, &auth);
    let deleted = delete.handle(&DeleteMotorcycleRequest::new(id)?)?;
    report("delete", deleted.status.code(), deleted.error.as_ref());

    info!("event=cli_smoke module=cli status=ok id={id}");
    Ok(())
}

fn report(operation: &str, code: u16, error: Option<&motominder_core::Error>) {
    match error {
        Some(error) => println!("{operation} status={code} error={error}"),
        None => println!("{operation} status={code}"),
    }
}
