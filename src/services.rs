pub mod agenda_service;
pub mod auth;
pub mod dashboard_service;
pub mod donation_service;
pub mod finance_service;
pub mod health_service;
pub mod license_service;
pub mod reminder_service;
pub mod report_service;
pub mod resident_service;
pub mod settings_service;
pub mod staff_service;
pub mod storage_service;
pub mod supplier_service;
