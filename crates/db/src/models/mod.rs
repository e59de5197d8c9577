//! Row models and Create/Update DTOs, one module per table.

pub mod asset;
pub mod configuration;
pub mod dashboard;
pub mod maintenance_schedule;
pub mod part;
pub mod part_request;
pub mod session;
pub mod stock_movement;
pub mod technician;
pub mod user;
pub mod work_order;
