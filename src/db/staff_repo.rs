// src/db/staff_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::{digits_pattern, like_pattern, map_constraint_error}, error::AppError},
    models::staff::{
        Department, DepartmentPayload, Employee, EmployeeFilter, EmployeePayload, EmployeeStatus,
    },
};

const DEPARTMENT_IN_USE: &str = "Existem funcionários vinculados a este departamento.";
const CPF_TAKEN: &str = "Já existe um funcionário cadastrado com este CPF.";

#[derive(Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  DEPARTAMENTOS
    // =========================================================================

    pub async fn create_department<'e, E>(
        &self,
        executor: E,
        payload: &DepartmentPayload,
    ) -> Result<Department, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let department = sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (name, description, is_active)
            VALUES ($1, $2, COALESCE($3, TRUE))
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(&payload.description)
        .bind(payload.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Já existe um departamento com este nome.", DEPARTMENT_IN_USE))?;

        Ok(department)
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(departments)
    }

    pub async fn update_department<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &DepartmentPayload,
    ) -> Result<Department, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments
            SET name = $2, description = $3, is_active = COALESCE($4, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.trim())
        .bind(&payload.description)
        .bind(payload.is_active)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Já existe um departamento com este nome.", DEPARTMENT_IN_USE))?
        .ok_or_else(|| AppError::NotFound("Departamento".into()))
    }

    pub async fn delete_department<'e, E>(&self, executor: E, id: Uuid) -> Result<Department, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Department>("DELETE FROM departments WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_constraint_error(e, DEPARTMENT_IN_USE, DEPARTMENT_IN_USE))?
            .ok_or_else(|| AppError::NotFound("Departamento".into()))
    }

    // =========================================================================
    //  FUNCIONÁRIOS
    // =========================================================================

    pub async fn create_employee<'e, E>(
        &self,
        executor: E,
        payload: &EmployeePayload,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                full_name, cpf, rg, birth_date, phone, email, address, zip_code,
                position, department_id, hire_date, salary, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, COALESCE($13, 'ACTIVE'), $14)
            RETURNING *
            "#,
        )
        .bind(payload.full_name.trim())
        .bind(&payload.cpf)
        .bind(&payload.rg)
        .bind(payload.birth_date)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(&payload.zip_code)
        .bind(payload.position.trim())
        .bind(payload.department_id)
        .bind(payload.hire_date)
        .bind(payload.salary)
        .bind(payload.status)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, CPF_TAKEN, "Departamento inexistente."))?;

        Ok(employee)
    }

    /// Status TERMINATED pelo formulário desliga na data `today`; qualquer
    /// outro status limpa a data de desligamento.
    pub async fn update_employee<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &EmployeePayload,
        today: NaiveDate,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees SET
                full_name = $2, cpf = $3, rg = $4, birth_date = $5, phone = $6,
                email = $7, address = $8, zip_code = $9, position = $10,
                department_id = $11, hire_date = $12, salary = $13,
                status = COALESCE($14, status), notes = $15,
                termination_date = CASE
                    WHEN COALESCE($14, status) = 'TERMINATED' THEN COALESCE(termination_date, $16)
                    ELSE NULL
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.full_name.trim())
        .bind(&payload.cpf)
        .bind(&payload.rg)
        .bind(payload.birth_date)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(&payload.zip_code)
        .bind(payload.position.trim())
        .bind(payload.department_id)
        .bind(payload.hire_date)
        .bind(payload.salary)
        .bind(payload.status)
        .bind(&payload.notes)
        .bind(today)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, CPF_TAKEN, "Departamento inexistente."))?
        .ok_or_else(|| AppError::NotFound("Funcionário".into()))
    }

    pub async fn find_employee<'e, E>(&self, executor: E, id: Uuid) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Funcionário".into()))
    }

    pub async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE ($1::text IS NULL OR full_name ILIKE $1 OR cpf ILIKE $1
                   OR regexp_replace(cpf, '[^0-9]', '', 'g') LIKE $4)
              AND ($2::employee_status IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR department_id = $3)
            ORDER BY full_name ASC
            "#,
        )
        .bind(like_pattern(filter.search.as_deref()))
        .bind(filter.status)
        .bind(filter.department_id)
        .bind(digits_pattern(filter.search.as_deref()))
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    // Quem ainda está na casa (para aniversários, dashboard e relatórios)
    pub async fn list_current_employees(&self) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE status <> 'TERMINATED' ORDER BY full_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    /// Desligamento (exclusão lógica).
    pub async fn terminate_employee<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        termination_date: NaiveDate,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET status = $2, termination_date = COALESCE(termination_date, $3), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(EmployeeStatus::Terminated)
        .bind(termination_date)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Funcionário".into()))
    }

    // Nome do departamento por ID (relatórios)
    pub async fn department_names(&self) -> Result<Vec<(Uuid, String)>, AppError> {
        let rows = sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM departments")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
