// src/config.rs

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AgendaRepository, AuditRepository, DashboardRepository, DonationRepository, FinanceRepository,
        HealthRepository, LicenseRepository, ReminderRepository, ResidentRepository, SettingsRepository,
        StaffRepository, SupplierRepository, UserRepository,
    },
    services::{
        agenda_service::AgendaService,
        auth::AuthService,
        dashboard_service::DashboardService,
        donation_service::DonationService,
        finance_service::FinanceService,
        health_service::HealthService,
        license_service::LicenseService,
        reminder_service::ReminderService,
        report_service::ReportService,
        resident_service::ResidentService,
        settings_service::SettingsService,
        staff_service::StaffService,
        storage_service::{LocalStorage, StorageService},
        supplier_service::SupplierService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub storage_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub signed_url_ttl_secs: i64,
    /// `None` libera qualquer origem
    pub cors_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let db_max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {}", v))?,
            None => 5,
        };

        let signed_url_ttl_secs = match get("SIGNED_URL_TTL_SECS") {
            Some(v) => v
                .parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("SIGNED_URL_TTL_SECS inválido: {}", v))?,
            None => 3600,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections,
            storage_dir: get("STORAGE_DIR").unwrap_or_else(|| "./storage".to_string()).into(),
            fonts_dir: get("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string()).into(),
            font_family: get("FONT_FAMILY").unwrap_or_else(|| "Roboto".to_string()),
            signed_url_ttl_secs,
            cors_origin: get("CORS_ORIGIN"),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,

    pub auth_service: AuthService,
    pub staff_service: StaffService,
    pub resident_service: ResidentService,
    pub finance_service: FinanceService,
    pub donation_service: DonationService,
    pub supplier_service: SupplierService,
    pub reminder_service: ReminderService,
    pub agenda_service: AgendaService,
    pub health_service: HealthService,
    pub license_service: LicenseService,
    pub storage_service: StorageService,
    pub dashboard_service: DashboardService,
    pub settings_service: SettingsService,
    pub report_service: ReportService,
    pub audit_repo: AuditRepository,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    /// Monta o grafo de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool, config: AppConfig) -> Self {
        let audit_repo = AuditRepository::new(db_pool.clone());
        let resident_repo = ResidentRepository::new(db_pool.clone());

        let storage_service = StorageService::new(
            Arc::new(LocalStorage::new(config.storage_dir.clone())),
            config.jwt_secret.clone(),
            config.signed_url_ttl_secs,
        );

        let auth_service = AuthService::new(
            UserRepository::new(db_pool.clone()),
            audit_repo.clone(),
            config.jwt_secret.clone(),
            db_pool.clone(),
        );
        let staff_service =
            StaffService::new(StaffRepository::new(db_pool.clone()), audit_repo.clone(), db_pool.clone());
        let resident_service = ResidentService::new(resident_repo.clone(), audit_repo.clone(), db_pool.clone());
        let finance_service = FinanceService::new(
            FinanceRepository::new(db_pool.clone()),
            resident_repo,
            audit_repo.clone(),
            db_pool.clone(),
        );
        let settings_service =
            SettingsService::new(SettingsRepository::new(), audit_repo.clone(), db_pool.clone());

        let dashboard_service = DashboardService::new(
            DashboardRepository::new(),
            staff_service.clone(),
            resident_service.clone(),
            db_pool.clone(),
        );
        let report_service = ReportService::new(
            staff_service.clone(),
            resident_service.clone(),
            finance_service.clone(),
            settings_service.clone(),
            config.fonts_dir.clone(),
            config.font_family.clone(),
        );

        Self {
            donation_service: DonationService::new(
                DonationRepository::new(db_pool.clone()),
                audit_repo.clone(),
                db_pool.clone(),
            ),
            supplier_service: SupplierService::new(
                SupplierRepository::new(db_pool.clone()),
                audit_repo.clone(),
                db_pool.clone(),
            ),
            reminder_service: ReminderService::new(
                ReminderRepository::new(db_pool.clone()),
                audit_repo.clone(),
                db_pool.clone(),
            ),
            agenda_service: AgendaService::new(
                AgendaRepository::new(db_pool.clone()),
                audit_repo.clone(),
                db_pool.clone(),
            ),
            health_service: HealthService::new(
                HealthRepository::new(db_pool.clone()),
                audit_repo.clone(),
                storage_service.clone(),
                db_pool.clone(),
            ),
            license_service: LicenseService::new(
                LicenseRepository::new(db_pool.clone()),
                audit_repo.clone(),
                storage_service.clone(),
                db_pool.clone(),
            ),
            auth_service,
            staff_service,
            resident_service,
            finance_service,
            storage_service,
            dashboard_service,
            settings_service,
            report_service,
            audit_repo,
            config: Arc::new(config),
            db_pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/crevin"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.storage_dir, PathBuf::from("./storage"));
        assert_eq!(config.fonts_dir, PathBuf::from("./fonts"));
        assert_eq!(config.font_family, "Roboto");
        assert_eq!(config.signed_url_ttl_secs, 3600);
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/crevin"),
            ("JWT_SECRET", "segredo"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("SIGNED_URL_TTL_SECS", "600"),
            ("CORS_ORIGIN", "https://painel.crevin.org.br"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.signed_url_ttl_secs, 600);
        assert_eq!(config.cors_origin.as_deref(), Some("https://painel.crevin.org.br"));
    }

    #[test]
    fn requires_database_url_and_secret() {
        assert!(AppConfig::from_lookup(lookup(&[("JWT_SECRET", "x")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db")])).is_err());
        // vazio conta como ausente
        assert!(AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db"), ("JWT_SECRET", "  ")])).is_err());
    }

    #[test]
    fn rejects_invalid_numbers() {
        let base = [("DATABASE_URL", "postgres://db"), ("JWT_SECRET", "x")];
        let mut vars = base.to_vec();
        vars.push(("DB_MAX_CONNECTIONS", "zero"));
        assert!(AppConfig::from_lookup(lookup(&vars)).is_err());

        let mut vars = base.to_vec();
        vars.push(("SIGNED_URL_TTL_SECS", "0"));
        assert!(AppConfig::from_lookup(lookup(&vars)).is_err());
    }
}
