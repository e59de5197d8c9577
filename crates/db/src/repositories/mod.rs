//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` as the first argument. Multi-row mutations (work-order
//! flows, stock movements, schedule execution, request approval/delivery) own
//! a single transaction each and return [`crate::tx::FlowError`].

pub mod asset_repo;
pub mod configuration_repo;
pub mod dashboard_repo;
pub mod maintenance_schedule_repo;
pub mod part_repo;
pub mod part_request_repo;
pub mod session_repo;
pub mod stock_movement_repo;
pub mod technician_repo;
pub mod user_repo;
pub mod work_order_repo;

pub use asset_repo::AssetRepo;
pub use configuration_repo::ConfigRepo;
pub use dashboard_repo::DashboardRepo;
pub use maintenance_schedule_repo::MaintenanceScheduleRepo;
pub use part_repo::PartRepo;
pub use part_request_repo::PartRequestRepo;
pub use session_repo::SessionRepo;
pub use stock_movement_repo::StockMovementRepo;
pub use technician_repo::TechnicianRepo;
pub use user_repo::UserRepo;
pub use work_order_repo::WorkOrderRepo;
