//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod project_repo;
pub mod task_repo;
pub mod time_entry_repo;
pub mod user_repo;

pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use time_entry_repo::TimeEntryRepo;
pub use user_repo::UserRepo;

/// Columns of `users`, qualified so they survive joins against membership tables.
pub(crate) const USER_COLUMNS: &str = "u.id, u.email, u.password_hash, u.name, u.surname, \
     u.patronymic, u.address, u.is_admin, u.passport_series, u.passport_number, \
     u.created_at, u.updated_at";
