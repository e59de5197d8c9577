//! HTTP handlers, one module per resource.

pub mod admin;
pub mod assets;
pub mod auth;
pub mod chat;
pub mod configuration;
pub mod dashboard;
pub mod part_requests;
pub mod parts;
pub mod schedules;
pub mod technicians;
pub mod work_orders;
