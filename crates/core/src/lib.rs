//! Domain layer for the CMMS backend.
//!
//! This crate has zero internal dependencies so it can be used by the
//! persistence layer, the API layer, and any future CLI or worker tooling.
//! It holds the shared scalar types, the closed error taxonomy, and the pure
//! business rules (state machines, stock arithmetic, schedule triggers) that
//! the `db` flows enforce inside their transactions.

pub mod error;
pub mod inventory;
pub mod part_request;
pub mod roles;
pub mod schedule;
pub mod types;
pub mod validation;
pub mod work_order;
