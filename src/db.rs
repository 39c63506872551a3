pub mod user_repo;
pub use user_repo::UserRepository;
pub mod activity_repo;
pub use activity_repo::AuditRepository;
pub mod staff_repo;
pub use staff_repo::StaffRepository;
pub mod resident_repo;
pub use resident_repo::ResidentRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod donation_repo;
pub use donation_repo::DonationRepository;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
pub mod reminder_repo;
pub use reminder_repo::ReminderRepository;
pub mod agenda_repo;
pub use agenda_repo::AgendaRepository;
pub mod health_repo;
pub use health_repo::HealthRepository;
pub mod license_repo;
pub use license_repo::LicenseRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
