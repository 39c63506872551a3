// src/handlers/staff.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        dashboard::{BirthdayEntry, BirthdayQuery},
        staff::{Department, DepartmentPayload, Employee, EmployeeFilter, EmployeePayload},
    },
};

// =========================================================================
//  SETORES
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/departments",
    tag = "Staff",
    request_body = DepartmentPayload,
    responses(
        (status = 201, description = "Setor criado", body = Department),
        (status = 409, description = "Já existe um setor com esse nome")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_department(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<DepartmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let department = app_state.staff_service.create_department(user.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    get,
    path = "/api/departments",
    tag = "Staff",
    responses((status = 200, description = "Setores", body = Vec<Department>)),
    security(("api_jwt" = []))
)]
pub async fn list_departments(State(app_state): State<AppState>) -> Result<Json<Vec<Department>>, AppError> {
    Ok(Json(app_state.staff_service.list_departments().await?))
}

#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    tag = "Staff",
    request_body = DepartmentPayload,
    params(("id" = Uuid, Path, description = "ID do setor")),
    responses(
        (status = 200, description = "Setor atualizado", body = Department),
        (status = 404, description = "Setor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_department(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DepartmentPayload>,
) -> Result<Json<Department>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.staff_service.update_department(user.id, id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do setor")),
    responses(
        (status = 204, description = "Setor removido"),
        (status = 409, description = "Setor com funcionários vinculados")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_department(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.staff_service.delete_department(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  FUNCIONÁRIOS
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Staff",
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Funcionário cadastrado", body = Employee),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CPF já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<EmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let employee = app_state.staff_service.create_employee(user.id, payload).await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Staff",
    params(EmployeeFilter),
    responses((status = 200, description = "Funcionários", body = Vec<Employee>)),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    Query(filter): Query<EmployeeFilter>,
) -> Result<Json<Vec<Employee>>, AppError> {
    Ok(Json(app_state.staff_service.list_employees(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário", body = Employee),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, AppError> {
    Ok(Json(app_state.staff_service.get_employee(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Staff",
    request_body = EmployeePayload,
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário atualizado", body = Employee),
        (status = 404, description = "Funcionário não encontrado"),
        (status = 409, description = "CPF já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeePayload>,
) -> Result<Json<Employee>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.staff_service.update_employee(user.id, id, payload).await?))
}

// Desligamento (exclusão lógica)
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário desligado", body = Employee),
        (status = 404, description = "Funcionário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn terminate_employee(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, AppError> {
    Ok(Json(app_state.staff_service.terminate_employee(user.id, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/employees/birthdays",
    tag = "Staff",
    params(BirthdayQuery),
    responses((status = 200, description = "Próximos aniversariantes", body = Vec<BirthdayEntry>)),
    security(("api_jwt" = []))
)]
pub async fn employee_birthdays(
    State(app_state): State<AppState>,
    Query(query): Query<BirthdayQuery>,
) -> Result<Json<Vec<BirthdayEntry>>, AppError> {
    let today = Utc::now().date_naive();
    Ok(Json(app_state.staff_service.upcoming_birthdays(today, query.window()).await?))
}
