pub mod activity;
pub mod agenda;
pub mod auth;
pub mod dashboard;
pub mod donations;
pub mod files;
pub mod finance;
pub mod health;
pub mod licenses;
pub mod reminders;
pub mod reports;
pub mod residents;
pub mod settings;
pub mod staff;
pub mod suppliers;
