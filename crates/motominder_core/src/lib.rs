//! Core domain logic for MotoMinder motorcycle records.
//! This crate is the single source of truth for business invariants.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod status;
pub mod usecase;

pub use auth::{AuthService, AuthorizationRole, SessionAuth};
pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use error::Error;
pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::entity::Entity;
pub use model::motorcycle::Motorcycle;
pub use repo::entity_repo::{ExistsCheck, Repository, SqliteRepository, UniqueCheck};
pub use repo::motorcycle_repo::{MotorcycleRepository, SqliteMotorcycleRepository};
pub use repo::{RepoAction, RepoError, RepoResult};
pub use status::OperationStatus;
pub use usecase::requests::{
    DeleteMotorcycleRequest, GetMotorcycleRequest, ListMotorcyclesRequest, PostMotorcycleRequest,
    PutMotorcycleRequest,
};
pub use usecase::responses::{
    DeleteMotorcycleResponse, GetMotorcycleResponse, ListMotorcyclesResponse,
    PostMotorcycleResponse, PutMotorcycleResponse,
};
pub use usecase::{
    DeleteMotorcycleInteractor, GetMotorcycleInteractor, ListMotorcyclesInteractor,
    PostMotorcycleInteractor, PutMotorcycleInteractor,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
