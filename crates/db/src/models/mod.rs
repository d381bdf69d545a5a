//! Row types and DTOs, one module per table family.

pub mod project;
pub mod task;
pub mod time_entry;
pub mod user;
