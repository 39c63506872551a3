// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Crevin Care Hub", description = "API administrativa da Crevin"),
    paths(
        // --- Auth / Users ---
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::create_user,
        handlers::auth::list_users,

        // --- Staff ---
        handlers::staff::create_department,
        handlers::staff::list_departments,
        handlers::staff::update_department,
        handlers::staff::delete_department,
        handlers::staff::create_employee,
        handlers::staff::list_employees,
        handlers::staff::get_employee,
        handlers::staff::update_employee,
        handlers::staff::terminate_employee,
        handlers::staff::employee_birthdays,

        // --- Residents ---
        handlers::residents::create_resident,
        handlers::residents::list_residents,
        handlers::residents::get_resident,
        handlers::residents::update_resident,
        handlers::residents::discharge_resident,
        handlers::residents::resident_birthdays,

        // --- Health ---
        handlers::health::create_record,
        handlers::health::list_records,
        handlers::health::update_record,
        handlers::health::delete_record,
        handlers::health::upload_document,
        handlers::health::list_documents,
        handlers::health::document_link,
        handlers::health::delete_document,
        handlers::health::create_assessment,
        handlers::health::list_assessments,
        handlers::health::update_assessment,
        handlers::health::delete_assessment,
        handlers::health::create_session,
        handlers::health::list_sessions,
        handlers::health::update_session,
        handlers::health::delete_session,

        // --- Finance ---
        handlers::finance::create_account,
        handlers::finance::list_accounts,
        handlers::finance::update_account,
        handlers::finance::delete_account,
        handlers::finance::create_category,
        handlers::finance::list_categories,
        handlers::finance::delete_category,
        handlers::finance::create_receivable,
        handlers::finance::list_receivables,
        handlers::finance::get_receivable,
        handlers::finance::update_receivable,
        handlers::finance::delete_receivable,
        handlers::finance::settle_receivable,
        handlers::finance::create_payable,
        handlers::finance::list_payables,
        handlers::finance::get_payable,
        handlers::finance::update_payable,
        handlers::finance::delete_payable,
        handlers::finance::settle_payable,
        handlers::finance::generate_monthly_fees,

        // --- Donations / Suppliers ---
        handlers::donations::create_donation,
        handlers::donations::list_donations,
        handlers::donations::get_donation,
        handlers::donations::update_donation,
        handlers::donations::delete_donation,
        handlers::suppliers::create_supplier,
        handlers::suppliers::list_suppliers,
        handlers::suppliers::get_supplier,
        handlers::suppliers::update_supplier,
        handlers::suppliers::delete_supplier,

        // --- Reminders / Agenda ---
        handlers::reminders::create_reminder,
        handlers::reminders::list_reminders,
        handlers::reminders::update_reminder,
        handlers::reminders::complete_reminder,
        handlers::reminders::delete_reminder,
        handlers::agenda::create_event,
        handlers::agenda::list_events,
        handlers::agenda::update_event,
        handlers::agenda::delete_event,

        // --- Licenses ---
        handlers::licenses::create_license,
        handlers::licenses::list_licenses,
        handlers::licenses::get_license,
        handlers::licenses::update_license,
        handlers::licenses::delete_license,
        handlers::licenses::upload_license_document,
        handlers::licenses::license_document_link,

        // --- Files ---
        handlers::files::download_file,

        // --- Dashboard / Activity / Settings ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_birthdays,
        handlers::activity::list_activity,
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Reports ---
        handlers::reports::employees_report,
        handlers::reports::residents_report,
        handlers::reports::finance_report,
        handlers::reports::receivable_receipt,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::ProvisionUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Staff ---
            models::staff::Department,
            models::staff::DepartmentPayload,
            models::staff::EmployeeStatus,
            models::staff::Employee,
            models::staff::EmployeePayload,

            // --- Residents ---
            models::residents::Resident,
            models::residents::ResidentPayload,

            // --- Health ---
            models::health::MedicalRecordKind,
            models::health::MedicalRecord,
            models::health::MedicalRecordPayload,
            models::health::MedicalDocument,
            models::health::SignedLink,
            models::health::BmiClass,
            models::health::NutritionAssessment,
            models::health::NutritionAssessmentView,
            models::health::NutritionPayload,
            models::health::PhysioSession,
            models::health::PhysioPayload,

            // --- Finance ---
            models::finance::CategoryKind,
            models::finance::PaymentStatus,
            models::finance::BankAccount,
            models::finance::BankAccountPayload,
            models::finance::FinancialCategory,
            models::finance::CategoryPayload,
            models::finance::Receivable,
            models::finance::ReceivablePayload,
            models::finance::Payable,
            models::finance::PayablePayload,
            models::finance::SettlePayload,
            models::finance::MonthlyFeePayload,
            models::finance::MonthlyFeeReport,

            // --- Donations / Suppliers ---
            models::donations::DonationKind,
            models::donations::Donation,
            models::donations::DonationPayload,
            models::suppliers::Supplier,
            models::suppliers::SupplierPayload,

            // --- Reminders / Agenda ---
            models::reminders::ReminderPriority,
            models::reminders::Recurrence,
            models::reminders::Reminder,
            models::reminders::ReminderPayload,
            models::reminders::CompletedReminder,
            models::agenda::EventKind,
            models::agenda::AgendaEvent,
            models::agenda::AgendaEventPayload,

            // --- Licenses ---
            models::licenses::LicenseStatus,
            models::licenses::License,
            models::licenses::LicenseView,
            models::licenses::LicensePayload,

            // --- Dashboard / Activity / Settings ---
            models::dashboard::PersonKind,
            models::dashboard::BirthdayEntry,
            models::dashboard::DashboardSummary,
            models::activity::AuditAction,
            models::activity::AuditLog,
            models::activity::ActivityFeed,
            models::settings::InstitutionSettings,
            models::settings::UpdateSettingsRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Usuários e perfis"),
        (name = "Staff", description = "Setores e funcionários"),
        (name = "Residents", description = "Cadastro de idosos"),
        (name = "Health", description = "Prontuário: registros médicos, documentos, nutrição e fisioterapia"),
        (name = "Finance", description = "Contas bancárias, categorias, contas a pagar e a receber, mensalidades"),
        (name = "Donations", description = "Doações recebidas"),
        (name = "Suppliers", description = "Fornecedores"),
        (name = "Reminders", description = "Lembretes"),
        (name = "Agenda", description = "Agenda de eventos"),
        (name = "Licenses", description = "Licenças e alvarás de funcionamento"),
        (name = "Files", description = "Download por link assinado"),
        (name = "Dashboard", description = "Indicadores do painel"),
        (name = "Activity", description = "Atividades recentes"),
        (name = "Settings", description = "Dados da instituição"),
        (name = "Reports", description = "Relatórios em PDF")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
