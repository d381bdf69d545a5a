//! Domain core of the time tracker.
//!
//! Pure logic only: the access-control evaluator, the timer state machine
//! and productivity arithmetic, patch semantics for partial updates, the
//! cache contract, pagination, and field constraints. Storage lives in `timetrack-db`.

pub mod access;
pub mod cache;
pub mod error;
pub mod pagination;
pub mod patch;
pub mod timer;
pub mod types;
pub mod validation;
