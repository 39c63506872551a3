// src/handlers/reports.rs

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::{
    common::{dates, error::AppError},
    config::AppState,
    handlers::files::pdf_response,
    models::reports::FinanceReportQuery,
};

#[utoipa::path(
    get,
    path = "/api/reports/employees",
    tag = "Reports",
    responses((status = 200, description = "Relatório de funcionários", content_type = "application/pdf", body = Vec<u8>)),
    security(("api_jwt" = []))
)]
pub async fn employees_report(State(app_state): State<AppState>) -> Result<Response, AppError> {
    let today = Utc::now().date_naive();
    let pdf = app_state.report_service.employees_report(today).await?;
    pdf_response(pdf, &format!("funcionarios_{}.pdf", today.format("%Y-%m-%d")))
}

#[utoipa::path(
    get,
    path = "/api/reports/residents",
    tag = "Reports",
    responses((status = 200, description = "Relatório de idosos", content_type = "application/pdf", body = Vec<u8>)),
    security(("api_jwt" = []))
)]
pub async fn residents_report(State(app_state): State<AppState>) -> Result<Response, AppError> {
    let today = Utc::now().date_naive();
    let pdf = app_state.report_service.residents_report(today).await?;
    pdf_response(pdf, &format!("idosos_{}.pdf", today.format("%Y-%m-%d")))
}

// Sem período informado, usa o mês corrente
#[utoipa::path(
    get,
    path = "/api/reports/finance",
    tag = "Reports",
    params(FinanceReportQuery),
    responses(
        (status = 200, description = "Relatório financeiro do período", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn finance_report(
    State(app_state): State<AppState>,
    Query(query): Query<FinanceReportQuery>,
) -> Result<Response, AppError> {
    let today = Utc::now().date_naive();
    let from = query
        .from
        .or_else(|| dates::month_start(today.year(), today.month()))
        .unwrap_or(today);
    let to = query
        .to
        .or_else(|| dates::clamp_day(today.year(), today.month(), 31))
        .unwrap_or(today);

    let pdf = app_state.report_service.finance_report(from, to, today).await?;
    pdf_response(
        pdf,
        &format!("financeiro_{}_{}.pdf", from.format("%Y-%m-%d"), to.format("%Y-%m-%d")),
    )
}

#[utoipa::path(
    get,
    path = "/api/reports/receivables/{id}/receipt",
    tag = "Reports",
    params(("id" = Uuid, Path, description = "ID da conta a receber")),
    responses(
        (status = 200, description = "Recibo / cobrança com QR Code Pix", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Conta a receber não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn receivable_receipt(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let today = Utc::now().date_naive();
    let pdf = app_state.report_service.receivable_receipt(id, today).await?;
    pdf_response(pdf, &format!("recibo_{}.pdf", id))
}
