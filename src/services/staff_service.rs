// src/services/staff_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{dates, error::AppError, format},
    db::{AuditRepository, StaffRepository},
    models::{
        activity::AuditAction,
        dashboard::{BirthdayEntry, PersonKind},
        staff::{Department, DepartmentPayload, Employee, EmployeeFilter, EmployeePayload},
    },
};

#[derive(Clone)]
pub struct StaffService {
    repo: StaffRepository,
    audit: AuditRepository,
    pool: PgPool,
}

/// Deixa CPF, telefone, CEP e e-mail no formato gravado no banco.
pub fn normalize_employee(payload: &mut EmployeePayload) -> Result<(), AppError> {
    payload.cpf = format::format_cpf(&payload.cpf)?;
    payload.phone = format::normalize_phone(payload.phone.as_deref());
    payload.zip_code = match payload.zip_code.as_deref() {
        Some(cep) => Some(format::format_cep(cep)?),
        None => None,
    };
    payload.email = payload.email.as_ref().map(|e| e.trim().to_lowercase());
    Ok(())
}

impl StaffService {
    pub fn new(repo: StaffRepository, audit: AuditRepository, pool: PgPool) -> Self {
        Self { repo, audit, pool }
    }

    // =========================================================================
    //  DEPARTAMENTOS
    // =========================================================================

    pub async fn create_department(&self, user_id: Uuid, payload: &DepartmentPayload) -> Result<Department, AppError> {
        let mut tx = self.pool.begin().await?;
        let department = self.repo.create_department(&mut *tx, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "departments", AuditAction::Create, Some(department.id),
                &format!("Departamento criado: {}", department.name))
            .await?;
        tx.commit().await?;
        Ok(department)
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        self.repo.list_departments().await
    }

    pub async fn update_department(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: &DepartmentPayload,
    ) -> Result<Department, AppError> {
        let mut tx = self.pool.begin().await?;
        let department = self.repo.update_department(&mut *tx, id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "departments", AuditAction::Update, Some(id),
                &format!("Departamento atualizado: {}", department.name))
            .await?;
        tx.commit().await?;
        Ok(department)
    }

    pub async fn delete_department(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let department = self.repo.delete_department(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, user_id, "departments", AuditAction::Delete, Some(id),
                &format!("Departamento excluído: {}", department.name))
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  FUNCIONÁRIOS
    // =========================================================================

    pub async fn create_employee(&self, user_id: Uuid, mut payload: EmployeePayload) -> Result<Employee, AppError> {
        normalize_employee(&mut payload)?;

        let mut tx = self.pool.begin().await?;
        let employee = self.repo.create_employee(&mut *tx, &payload).await?;
        self.audit
            .record(&mut *tx, user_id, "employees", AuditAction::Create, Some(employee.id),
                &format!("Funcionário cadastrado: {}", employee.full_name))
            .await?;
        tx.commit().await?;

        tracing::info!("Funcionário {} cadastrado", employee.id);
        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        user_id: Uuid,
        id: Uuid,
        mut payload: EmployeePayload,
    ) -> Result<Employee, AppError> {
        normalize_employee(&mut payload)?;

        let mut tx = self.pool.begin().await?;
        let employee = self.repo.update_employee(&mut *tx, id, &payload, Utc::now().date_naive()).await?;
        self.audit
            .record(&mut *tx, user_id, "employees", AuditAction::Update, Some(id),
                &format!("Funcionário atualizado: {}", employee.full_name))
            .await?;
        tx.commit().await?;
        Ok(employee)
    }

    pub async fn get_employee(&self, id: Uuid) -> Result<Employee, AppError> {
        self.repo.find_employee(&self.pool, id).await
    }

    pub async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        self.repo.list_employees(filter).await
    }

    /// Exclusão lógica: status TERMINATED com data de desligamento.
    pub async fn terminate_employee(&self, user_id: Uuid, id: Uuid) -> Result<Employee, AppError> {
        let today = Utc::now().date_naive();

        let mut tx = self.pool.begin().await?;
        let employee = self.repo.terminate_employee(&mut *tx, id, today).await?;
        self.audit
            .record(&mut *tx, user_id, "employees", AuditAction::Delete, Some(id),
                &format!("Funcionário desligado: {}", employee.full_name))
            .await?;
        tx.commit().await?;
        Ok(employee)
    }

    pub async fn upcoming_birthdays(&self, today: NaiveDate, window_days: i64) -> Result<Vec<BirthdayEntry>, AppError> {
        let employees = self.repo.list_current_employees().await?;
        Ok(dates::upcoming_birthdays(employees, today, window_days)
            .into_iter()
            .map(|(e, days)| BirthdayEntry::new(e.id, PersonKind::Employee, e.full_name, e.birth_date, days, today))
            .collect())
    }

    pub async fn list_current_employees(&self) -> Result<Vec<Employee>, AppError> {
        self.repo.list_current_employees().await
    }

    pub async fn department_names(&self) -> Result<Vec<(Uuid, String)>, AppError> {
        self.repo.department_names().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::test_support::{audit_count, seed_user},
        models::staff::EmployeeStatus,
    };

    fn payload() -> EmployeePayload {
        serde_json::from_value(serde_json::json!({
            "fullName": "João Pereira",
            "cpf": "52998224725",
            "birthDate": "12/04/1985",
            "phone": "11987654321",
            "email": " Joao@Crevin.org.br ",
            "zipCode": "01310100",
            "position": "Cuidador",
            "hireDate": "2020-02-01",
            "salary": "2.850,00"
        }))
        .unwrap()
    }

    #[test]
    fn normalizes_documents_before_saving() {
        let mut p = payload();
        normalize_employee(&mut p).unwrap();
        assert_eq!(p.cpf, "529.982.247-25");
        assert_eq!(p.phone.as_deref(), Some("(11) 98765-4321"));
        assert_eq!(p.zip_code.as_deref(), Some("01310-100"));
        assert_eq!(p.email.as_deref(), Some("joao@crevin.org.br"));
        assert_eq!(p.salary, Some(rust_decimal::Decimal::new(285000, 2)));
    }

    #[test]
    fn empty_optional_fields_stay_empty() {
        let mut p = payload();
        p.phone = None;
        p.zip_code = None;
        normalize_employee(&mut p).unwrap();
        assert_eq!(p.phone, None);
        assert_eq!(p.zip_code, None);
    }

    fn service(pool: PgPool) -> StaffService {
        StaffService::new(StaffRepository::new(pool.clone()), AuditRepository::new(pool.clone()), pool)
    }

    async fn department(service: &StaffService, user: Uuid) -> Department {
        let payload: DepartmentPayload =
            serde_json::from_value(serde_json::json!({ "name": "Enfermagem" })).unwrap();
        service.create_department(user, &payload).await.unwrap()
    }

    // Precisa de um Postgres em DATABASE_URL: cargo test -- --ignored
    #[sqlx::test]
    #[ignore]
    async fn employee_round_trip_keeps_every_field(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        let dept = department(&service, user).await;

        let mut p = payload();
        p.department_id = Some(dept.id);
        let created = service.create_employee(user, p).await.unwrap();
        assert_eq!(created.cpf, "529.982.247-25");
        assert_eq!(created.status, EmployeeStatus::Active);
        assert_eq!(created.termination_date, None);

        let read = service.get_employee(created.id).await.unwrap();
        assert_eq!(read.full_name, "João Pereira");
        assert_eq!(read.birth_date, NaiveDate::from_ymd_opt(1985, 4, 12).unwrap());
        assert_eq!(read.hire_date, NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
        assert_eq!(read.email.as_deref(), Some("joao@crevin.org.br"));
        assert_eq!(read.zip_code.as_deref(), Some("01310-100"));
        assert_eq!(read.salary, Some(rust_decimal::Decimal::new(285000, 2)));
        assert_eq!(read.department_id, Some(dept.id));

        let mut changed = payload();
        changed.position = "Enfermeiro".into();
        changed.status = Some(EmployeeStatus::Vacation);
        let updated = service.update_employee(user, created.id, changed).await.unwrap();
        assert_eq!(updated.position, "Enfermeiro");
        assert_eq!(updated.status, EmployeeStatus::Vacation);
        assert_eq!(updated.department_id, None);
        assert_eq!(audit_count(&pool, "employees").await, 2);
    }

    #[sqlx::test]
    #[ignore]
    async fn duplicate_cpf_is_a_unique_violation(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        service.create_employee(user, payload()).await.unwrap();

        // Mesmo CPF digitado sem pontuação
        let err = service.create_employee(user, payload()).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueConstraintViolation(_)));
        assert_eq!(audit_count(&pool, "employees").await, 1);
    }

    #[sqlx::test]
    #[ignore]
    async fn department_with_employees_cannot_be_deleted(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        let dept = department(&service, user).await;

        let mut p = payload();
        p.department_id = Some(dept.id);
        service.create_employee(user, p).await.unwrap();

        let err = service.delete_department(user, dept.id).await.unwrap_err();
        assert!(matches!(err, AppError::ReferenceViolation(_)));
        assert_eq!(service.list_departments().await.unwrap().len(), 1);
    }

    #[sqlx::test]
    #[ignore]
    async fn terminating_keeps_the_employee_on_file(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        let created = service.create_employee(user, payload()).await.unwrap();

        let terminated = service.terminate_employee(user, created.id).await.unwrap();
        assert_eq!(terminated.status, EmployeeStatus::Terminated);
        assert!(terminated.termination_date.is_some());

        let still_there = service.get_employee(created.id).await.unwrap();
        assert_eq!(still_there.status, EmployeeStatus::Terminated);
        assert!(service.list_current_employees().await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[ignore]
    async fn terminated_status_from_the_form_sets_the_date(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        let created = service.create_employee(user, payload()).await.unwrap();
        let repo = StaffRepository::new(pool.clone());
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();

        let mut p = payload();
        normalize_employee(&mut p).unwrap();
        p.status = Some(EmployeeStatus::Terminated);
        let terminated = repo.update_employee(&pool, created.id, &p, today).await.unwrap();
        assert_eq!(terminated.termination_date, Some(today));

        // Nova edição mantém a data original
        let later = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let edited = repo.update_employee(&pool, created.id, &p, later).await.unwrap();
        assert_eq!(edited.termination_date, Some(today));

        // Readmissão limpa a data
        p.status = Some(EmployeeStatus::Active);
        let rehired = repo.update_employee(&pool, created.id, &p, later).await.unwrap();
        assert_eq!(rehired.termination_date, None);
    }

    #[sqlx::test]
    #[ignore]
    async fn cpf_digits_find_the_employee(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        let created = service.create_employee(user, payload()).await.unwrap();

        for term in ["52998224725", "529.982", "98224"] {
            let filter = EmployeeFilter { search: Some(term.into()), ..Default::default() };
            let found = service.list_employees(&filter).await.unwrap();
            assert_eq!(found.len(), 1, "busca por {term}");
            assert_eq!(found[0].id, created.id);
        }

        let filter = EmployeeFilter { search: Some("11111".into()), ..Default::default() };
        assert!(service.list_employees(&filter).await.unwrap().is_empty());
    }
}
