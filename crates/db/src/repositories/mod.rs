//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods that
//! accept `&PgPool` (or `&mut PgConnection` for transaction-scoped writes)
//! as the first argument.

pub mod delivery_repo;
pub mod email_log_repo;
pub mod equipment_repo;
pub mod notification_repo;
pub mod professional_repo;
pub mod project_repo;
pub mod quotation_repo;
pub mod supplier_repo;
pub mod team_repo;
pub mod user_repo;

pub use delivery_repo::DeliveryRepo;
pub use email_log_repo::EmailLogRepo;
pub use equipment_repo::EquipmentRepo;
pub use notification_repo::NotificationRepo;
pub use professional_repo::ProfessionalRepo;
pub use project_repo::ProjectRepo;
pub use quotation_repo::QuotationRepo;
pub use supplier_repo::SupplierRepo;
pub use team_repo::TeamRepo;
pub use user_repo::UserRepo;
