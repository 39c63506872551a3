// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::finance::{
        BankAccount, BankAccountPayload, CategoryFilter, CategoryPayload, FinancialCategory,
        MonthlyFeePayload, MonthlyFeeReport, Payable, PayablePayload, Receivable, ReceivablePayload,
        SettlePayload, TitleFilter,
    },
};

// =========================================================================
//  CONTAS BANCÁRIAS
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/finance/accounts",
    tag = "Finance",
    request_body = BankAccountPayload,
    responses((status = 201, description = "Conta cadastrada", body = BankAccount)),
    security(("api_jwt" = []))
)]
pub async fn create_account(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<BankAccountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let account = app_state.finance_service.create_account(user.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    get,
    path = "/api/finance/accounts",
    tag = "Finance",
    responses((status = 200, description = "Contas bancárias", body = Vec<BankAccount>)),
    security(("api_jwt" = []))
)]
pub async fn list_accounts(State(app_state): State<AppState>) -> Result<Json<Vec<BankAccount>>, AppError> {
    Ok(Json(app_state.finance_service.list_accounts().await?))
}

#[utoipa::path(
    put,
    path = "/api/finance/accounts/{id}",
    tag = "Finance",
    request_body = BankAccountPayload,
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 200, description = "Conta atualizada", body = BankAccount),
        (status = 404, description = "Conta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_account(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BankAccountPayload>,
) -> Result<Json<BankAccount>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.finance_service.update_account(user.id, id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/finance/accounts/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da conta")),
    responses(
        (status = 204, description = "Conta removida"),
        (status = 409, description = "Conta com lançamentos vinculados")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_account(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.delete_account(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  CATEGORIAS
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/finance/categories",
    tag = "Finance",
    request_body = CategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = FinancialCategory),
        (status = 409, description = "Categoria já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state.finance_service.create_category(user.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/api/finance/categories",
    tag = "Finance",
    params(CategoryFilter),
    responses((status = 200, description = "Categorias", body = Vec<FinancialCategory>)),
    security(("api_jwt" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> Result<Json<Vec<FinancialCategory>>, AppError> {
    Ok(Json(app_state.finance_service.list_categories(filter.kind).await?))
}

#[utoipa::path(
    delete,
    path = "/api/finance/categories/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 204, description = "Categoria removida"),
        (status = 409, description = "Categoria em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.delete_category(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  CONTAS A RECEBER
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/finance/receivables",
    tag = "Finance",
    request_body = ReceivablePayload,
    responses(
        (status = 201, description = "Conta a receber lançada", body = Receivable),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_receivable(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ReceivablePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let receivable = app_state.finance_service.create_receivable(user.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(receivable)))
}

#[utoipa::path(
    get,
    path = "/api/finance/receivables",
    tag = "Finance",
    params(TitleFilter),
    responses((status = 200, description = "Contas a receber", body = Vec<Receivable>)),
    security(("api_jwt" = []))
)]
pub async fn list_receivables(
    State(app_state): State<AppState>,
    Query(filter): Query<TitleFilter>,
) -> Result<Json<Vec<Receivable>>, AppError> {
    Ok(Json(app_state.finance_service.list_receivables(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/finance/receivables/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da conta a receber")),
    responses(
        (status = 200, description = "Conta a receber", body = Receivable),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_receivable(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Receivable>, AppError> {
    Ok(Json(app_state.finance_service.get_receivable(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/finance/receivables/{id}",
    tag = "Finance",
    request_body = ReceivablePayload,
    params(("id" = Uuid, Path, description = "ID da conta a receber")),
    responses(
        (status = 200, description = "Conta a receber atualizada", body = Receivable),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_receivable(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReceivablePayload>,
) -> Result<Json<Receivable>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.finance_service.update_receivable(user.id, id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/finance/receivables/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da conta a receber")),
    responses(
        (status = 204, description = "Conta a receber removida"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_receivable(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.delete_receivable(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/finance/receivables/{id}/settle",
    tag = "Finance",
    request_body = SettlePayload,
    params(("id" = Uuid, Path, description = "ID da conta a receber")),
    responses(
        (status = 200, description = "Recebimento registrado", body = Receivable),
        (status = 400, description = "Título já recebido ou cancelado")
    ),
    security(("api_jwt" = []))
)]
pub async fn settle_receivable(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SettlePayload>,
) -> Result<Json<Receivable>, AppError> {
    Ok(Json(app_state.finance_service.settle_receivable(user.id, id, &payload).await?))
}

// =========================================================================
//  CONTAS A PAGAR
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/finance/payables",
    tag = "Finance",
    request_body = PayablePayload,
    responses(
        (status = 201, description = "Conta a pagar lançada", body = Payable),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_payable(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<PayablePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let payable = app_state.finance_service.create_payable(user.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(payable)))
}

#[utoipa::path(
    get,
    path = "/api/finance/payables",
    tag = "Finance",
    params(TitleFilter),
    responses((status = 200, description = "Contas a pagar", body = Vec<Payable>)),
    security(("api_jwt" = []))
)]
pub async fn list_payables(
    State(app_state): State<AppState>,
    Query(filter): Query<TitleFilter>,
) -> Result<Json<Vec<Payable>>, AppError> {
    Ok(Json(app_state.finance_service.list_payables(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/finance/payables/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da conta a pagar")),
    responses(
        (status = 200, description = "Conta a pagar", body = Payable),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payable(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Payable>, AppError> {
    Ok(Json(app_state.finance_service.get_payable(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/finance/payables/{id}",
    tag = "Finance",
    request_body = PayablePayload,
    params(("id" = Uuid, Path, description = "ID da conta a pagar")),
    responses(
        (status = 200, description = "Conta a pagar atualizada", body = Payable),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_payable(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayablePayload>,
) -> Result<Json<Payable>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.finance_service.update_payable(user.id, id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/finance/payables/{id}",
    tag = "Finance",
    params(("id" = Uuid, Path, description = "ID da conta a pagar")),
    responses(
        (status = 204, description = "Conta a pagar removida"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_payable(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.delete_payable(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/finance/payables/{id}/settle",
    tag = "Finance",
    request_body = SettlePayload,
    params(("id" = Uuid, Path, description = "ID da conta a pagar")),
    responses(
        (status = 200, description = "Pagamento registrado", body = Payable),
        (status = 400, description = "Título já pago ou cancelado")
    ),
    security(("api_jwt" = []))
)]
pub async fn settle_payable(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SettlePayload>,
) -> Result<Json<Payable>, AppError> {
    Ok(Json(app_state.finance_service.settle_payable(user.id, id, &payload).await?))
}

// =========================================================================
//  MENSALIDADES
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/finance/monthly-fees",
    tag = "Finance",
    request_body = MonthlyFeePayload,
    responses(
        (status = 200, description = "Mensalidades geradas para a competência", body = MonthlyFeeReport),
        (status = 400, description = "Competência inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_monthly_fees(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<MonthlyFeePayload>,
) -> Result<Json<MonthlyFeeReport>, AppError> {
    payload.validate()?;

    let report = app_state.finance_service.generate_monthly_fees(user.id, &payload).await?;
    tracing::info!(
        generated = report.generated.len(),
        skipped = report.already_generated.len() + report.without_benefit.len(),
        "mensalidades processadas"
    );

    Ok(Json(report))
}
