// src/handlers/health.rs
//
// Prontuário do idoso: registros médicos, documentos PDF, nutrição e
// fisioterapia. Tudo aninhado em /api/residents/{resident_id}.

use axum::{
    body::Bytes,
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
    models::health::{
        MedicalDocument, MedicalRecord, MedicalRecordPayload, NutritionAssessmentView, NutritionPayload,
        PhysioPayload, PhysioSession, SignedLink, UploadQuery,
    },
};

// =========================================================================
//  REGISTROS MÉDICOS
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/residents/{resident_id}/medical-records",
    tag = "Health",
    request_body = MedicalRecordPayload,
    params(("resident_id" = Uuid, Path, description = "ID do idoso")),
    responses(
        (status = 201, description = "Registro criado", body = MedicalRecord),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_record(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(resident_id): Path<Uuid>,
    Json(payload): Json<MedicalRecordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let record = app_state.health_service.create_record(user.id, resident_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/residents/{resident_id}/medical-records",
    tag = "Health",
    params(("resident_id" = Uuid, Path, description = "ID do idoso")),
    responses((status = 200, description = "Registros (mais recentes primeiro)", body = Vec<MedicalRecord>)),
    security(("api_jwt" = []))
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    Path(resident_id): Path<Uuid>,
) -> Result<Json<Vec<MedicalRecord>>, AppError> {
    Ok(Json(app_state.health_service.list_records(resident_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/residents/{resident_id}/medical-records/{id}",
    tag = "Health",
    request_body = MedicalRecordPayload,
    params(
        ("resident_id" = Uuid, Path, description = "ID do idoso"),
        ("id" = Uuid, Path, description = "ID do registro")
    ),
    responses(
        (status = 200, description = "Registro atualizado", body = MedicalRecord),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_record(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((resident_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MedicalRecordPayload>,
) -> Result<Json<MedicalRecord>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.health_service.update_record(user.id, resident_id, id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/residents/{resident_id}/medical-records/{id}",
    tag = "Health",
    params(
        ("resident_id" = Uuid, Path, description = "ID do idoso"),
        ("id" = Uuid, Path, description = "ID do registro")
    ),
    responses(
        (status = 204, description = "Registro removido"),
        (status = 404, description = "Registro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_record(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((resident_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state.health_service.delete_record(user.id, resident_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  DOCUMENTOS (PDF)
// =========================================================================

// Corpo cru em application/pdf; o nome vem na query string
#[utoipa::path(
    post,
    path = "/api/residents/{resident_id}/documents",
    tag = "Health",
    request_body(content = Vec<u8>, description = "Arquivo PDF", content_type = "application/pdf"),
    params(
        ("resident_id" = Uuid, Path, description = "ID do idoso"),
        UploadQuery
    ),
    responses(
        (status = 201, description = "Documento anexado", body = MedicalDocument),
        (status = 400, description = "O arquivo não é um PDF")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(resident_id): Path<Uuid>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let document = app_state
        .health_service
        .upload_document(user.id, resident_id, &query.file_name, &body)
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    get,
    path = "/api/residents/{resident_id}/documents",
    tag = "Health",
    params(("resident_id" = Uuid, Path, description = "ID do idoso")),
    responses((status = 200, description = "Documentos do idoso", body = Vec<MedicalDocument>)),
    security(("api_jwt" = []))
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    Path(resident_id): Path<Uuid>,
) -> Result<Json<Vec<MedicalDocument>>, AppError> {
    Ok(Json(app_state.health_service.list_documents(resident_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/residents/{resident_id}/documents/{id}/link",
    tag = "Health",
    params(
        ("resident_id" = Uuid, Path, description = "ID do idoso"),
        ("id" = Uuid, Path, description = "ID do documento")
    ),
    responses(
        (status = 200, description = "Link temporário de download", body = SignedLink),
        (status = 404, description = "Documento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn document_link(
    State(app_state): State<AppState>,
    Path((resident_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SignedLink>, AppError> {
    Ok(Json(app_state.health_service.document_link(resident_id, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/residents/{resident_id}/documents/{id}",
    tag = "Health",
    params(
        ("resident_id" = Uuid, Path, description = "ID do idoso"),
        ("id" = Uuid, Path, description = "ID do documento")
    ),
    responses(
        (status = 204, description = "Documento removido"),
        (status = 404, description = "Documento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((resident_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state.health_service.delete_document(user.id, resident_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  NUTRIÇÃO
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/residents/{resident_id}/nutrition",
    tag = "Health",
    request_body = NutritionPayload,
    params(("resident_id" = Uuid, Path, description = "ID do idoso")),
    responses(
        (status = 201, description = "Avaliação registrada (com IMC)", body = NutritionAssessmentView),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_assessment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(resident_id): Path<Uuid>,
    Json(payload): Json<NutritionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let assessment = app_state.health_service.create_assessment(user.id, resident_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(assessment)))
}

#[utoipa::path(
    get,
    path = "/api/residents/{resident_id}/nutrition",
    tag = "Health",
    params(("resident_id" = Uuid, Path, description = "ID do idoso")),
    responses((status = 200, description = "Avaliações nutricionais", body = Vec<NutritionAssessmentView>)),
    security(("api_jwt" = []))
)]
pub async fn list_assessments(
    State(app_state): State<AppState>,
    Path(resident_id): Path<Uuid>,
) -> Result<Json<Vec<NutritionAssessmentView>>, AppError> {
    Ok(Json(app_state.health_service.list_assessments(resident_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/residents/{resident_id}/nutrition/{id}",
    tag = "Health",
    request_body = NutritionPayload,
    params(
        ("resident_id" = Uuid, Path, description = "ID do idoso"),
        ("id" = Uuid, Path, description = "ID da avaliação")
    ),
    responses(
        (status = 200, description = "Avaliação atualizada", body = NutritionAssessmentView),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_assessment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((resident_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<NutritionPayload>,
) -> Result<Json<NutritionAssessmentView>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.health_service.update_assessment(user.id, resident_id, id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/residents/{resident_id}/nutrition/{id}",
    tag = "Health",
    params(
        ("resident_id" = Uuid, Path, description = "ID do idoso"),
        ("id" = Uuid, Path, description = "ID da avaliação")
    ),
    responses(
        (status = 204, description = "Avaliação removida"),
        (status = 404, description = "Avaliação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_assessment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((resident_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state.health_service.delete_assessment(user.id, resident_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  FISIOTERAPIA
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/residents/{resident_id}/physio",
    tag = "Health",
    request_body = PhysioPayload,
    params(("resident_id" = Uuid, Path, description = "ID do idoso")),
    responses(
        (status = 201, description = "Sessão registrada", body = PhysioSession),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_session(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(resident_id): Path<Uuid>,
    Json(payload): Json<PhysioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = app_state.health_service.create_session(user.id, resident_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/residents/{resident_id}/physio",
    tag = "Health",
    params(("resident_id" = Uuid, Path, description = "ID do idoso")),
    responses((status = 200, description = "Sessões de fisioterapia", body = Vec<PhysioSession>)),
    security(("api_jwt" = []))
)]
pub async fn list_sessions(
    State(app_state): State<AppState>,
    Path(resident_id): Path<Uuid>,
) -> Result<Json<Vec<PhysioSession>>, AppError> {
    Ok(Json(app_state.health_service.list_sessions(resident_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/residents/{resident_id}/physio/{id}",
    tag = "Health",
    request_body = PhysioPayload,
    params(
        ("resident_id" = Uuid, Path, description = "ID do idoso"),
        ("id" = Uuid, Path, description = "ID da sessão")
    ),
    responses(
        (status = 200, description = "Sessão atualizada", body = PhysioSession),
        (status = 404, description = "Sessão não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_session(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((resident_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<PhysioPayload>,
) -> Result<Json<PhysioSession>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.health_service.update_session(user.id, resident_id, id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/residents/{resident_id}/physio/{id}",
    tag = "Health",
    params(
        ("resident_id" = Uuid, Path, description = "ID do idoso"),
        ("id" = Uuid, Path, description = "ID da sessão")
    ),
    responses(
        (status = 204, description = "Sessão removida"),
        (status = 404, description = "Sessão não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_session(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((resident_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state.health_service.delete_session(user.id, resident_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
