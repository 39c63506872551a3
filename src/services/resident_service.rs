// src/services/resident_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{dates, error::AppError, format},
    db::{AuditRepository, ResidentRepository},
    models::{
        activity::AuditAction,
        dashboard::{BirthdayEntry, PersonKind},
        residents::{Resident, ResidentFilter, ResidentPayload},
    },
};

#[derive(Clone)]
pub struct ResidentService {
    repo: ResidentRepository,
    audit: AuditRepository,
    pool: PgPool,
}

fn normalize_resident(payload: &mut ResidentPayload) -> Result<(), AppError> {
    payload.cpf = format::format_cpf(&payload.cpf)?;
    payload.phone = format::normalize_phone(payload.phone.as_deref());
    payload.emergency_phone = format::normalize_phone(payload.emergency_phone.as_deref());
    Ok(())
}

impl ResidentService {
    pub fn new(repo: ResidentRepository, audit: AuditRepository, pool: PgPool) -> Self {
        Self { repo, audit, pool }
    }

    pub async fn create(&self, user_id: Uuid, mut payload: ResidentPayload) -> Result<Resident, AppError> {
        normalize_resident(&mut payload)?;

        let mut tx = self.pool.begin().await?;
        let resident = self.repo.create(&mut *tx, &payload).await?;
        self.audit
            .record(&mut *tx, user_id, "residents", AuditAction::Create, Some(resident.id),
                &format!("Idoso cadastrado: {}", resident.full_name))
            .await?;
        tx.commit().await?;

        tracing::info!("Idoso {} cadastrado", resident.id);
        Ok(resident)
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, mut payload: ResidentPayload) -> Result<Resident, AppError> {
        normalize_resident(&mut payload)?;

        let mut tx = self.pool.begin().await?;
        let resident = self.repo.update(&mut *tx, id, &payload).await?;
        self.audit
            .record(&mut *tx, user_id, "residents", AuditAction::Update, Some(id),
                &format!("Idoso atualizado: {}", resident.full_name))
            .await?;
        tx.commit().await?;
        Ok(resident)
    }

    pub async fn get(&self, id: Uuid) -> Result<Resident, AppError> {
        self.repo.find(&self.pool, id).await
    }

    pub async fn list(&self, filter: &ResidentFilter) -> Result<Vec<Resident>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn list_active(&self) -> Result<Vec<Resident>, AppError> {
        self.repo.list_active(&self.pool).await
    }

    /// Exclusão lógica: inativo com data de saída.
    pub async fn discharge(&self, user_id: Uuid, id: Uuid) -> Result<Resident, AppError> {
        let today = Utc::now().date_naive();

        let mut tx = self.pool.begin().await?;
        let resident = self.repo.discharge(&mut *tx, id, today).await?;
        self.audit
            .record(&mut *tx, user_id, "residents", AuditAction::Delete, Some(id),
                &format!("Saída registrada: {}", resident.full_name))
            .await?;
        tx.commit().await?;
        Ok(resident)
    }

    pub async fn upcoming_birthdays(&self, today: NaiveDate, window_days: i64) -> Result<Vec<BirthdayEntry>, AppError> {
        let residents = self.repo.list_active(&self.pool).await?;
        Ok(dates::upcoming_birthdays(residents, today, window_days)
            .into_iter()
            .map(|(r, days)| BirthdayEntry::new(r.id, PersonKind::Resident, r.full_name, r.birth_date, days, today))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::common::test_support::{audit_count, seed_user};

    fn payload() -> ResidentPayload {
        serde_json::from_value(serde_json::json!({
            "fullName": "Maria das Dores",
            "cpf": "52998224725",
            "birthDate": "02/09/1938",
            "emergencyPhone": "11987654321",
            "benefitType": "BPC",
            "benefitAmount": "1.412,00",
            "contributionPercentage": "70",
            "admissionDate": "10/05/2022"
        }))
        .unwrap()
    }

    fn service(pool: PgPool) -> ResidentService {
        ResidentService::new(ResidentRepository::new(pool.clone()), AuditRepository::new(pool.clone()), pool)
    }

    #[test]
    fn normalizes_documents_before_saving() {
        let mut p = payload();
        normalize_resident(&mut p).unwrap();
        assert_eq!(p.cpf, "529.982.247-25");
        assert_eq!(p.emergency_phone.as_deref(), Some("(11) 98765-4321"));
        assert_eq!(p.phone, None);
    }

    // Precisa de um Postgres em DATABASE_URL: cargo test -- --ignored
    #[sqlx::test]
    #[ignore]
    async fn resident_round_trip_keeps_every_field(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());

        let created = service.create(user, payload()).await.unwrap();
        assert!(created.is_active);
        assert_eq!(created.discharge_date, None);

        let read = service.get(created.id).await.unwrap();
        assert_eq!(read.full_name, "Maria das Dores");
        assert_eq!(read.cpf, "529.982.247-25");
        assert_eq!(read.birth_date, NaiveDate::from_ymd_opt(1938, 9, 2).unwrap());
        assert_eq!(read.admission_date, NaiveDate::from_ymd_opt(2022, 5, 10).unwrap());
        assert_eq!(read.benefit_amount, Some(Decimal::new(141200, 2)));
        assert_eq!(read.contribution_percentage, Some(Decimal::new(70, 0)));

        let mut changed = payload();
        changed.medical_notes = Some("Hipertensa".into());
        let updated = service.update(user, created.id, changed).await.unwrap();
        assert_eq!(updated.medical_notes.as_deref(), Some("Hipertensa"));
        assert_eq!(updated.benefit_type.as_deref(), Some("BPC"));
        assert_eq!(audit_count(&pool, "residents").await, 2);
    }

    #[sqlx::test]
    #[ignore]
    async fn duplicate_cpf_is_a_unique_violation(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        service.create(user, payload()).await.unwrap();

        let err = service.create(user, payload()).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConstraintViolation(_)));
    }

    #[sqlx::test]
    #[ignore]
    async fn discharge_keeps_the_resident_on_file(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        let created = service.create(user, payload()).await.unwrap();

        let discharged = service.discharge(user, created.id).await.unwrap();
        assert!(!discharged.is_active);
        assert!(discharged.discharge_date.is_some());

        let still_there = service.get(created.id).await.unwrap();
        assert!(!still_there.is_active);
        assert!(service.list_active().await.unwrap().is_empty());

        let filter = ResidentFilter { search: Some("52998224725".into()), active: Some(false) };
        assert_eq!(service.list(&filter).await.unwrap().len(), 1);
    }
}
