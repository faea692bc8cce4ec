// src/handlers/loteamentos.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermManageLotes, PermViewLoteamentos, RequirePermission},
    },
    models::{
        lote::Lote,
        loteamento::{CreateLoteamentoPayload, Loteamento, UpdateLoteamentoPayload},
    },
};

// GET /api/loteamentos
#[utoipa::path(
    get,
    path = "/api/loteamentos",
    tag = "Loteamentos",
    responses(
        (status = 200, description = "Empreendimentos, mais recentes primeiro", body = [Loteamento])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_loteamentos(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewLoteamentos>,
) -> Result<impl IntoResponse, AppError> {
    let loteamentos = app_state.loteamento_service.list().await?;
    Ok(Json(loteamentos))
}

// GET /api/loteamentos/{id}
#[utoipa::path(
    get,
    path = "/api/loteamentos/{id}",
    tag = "Loteamentos",
    params(("id" = Uuid, Path, description = "ID do loteamento")),
    responses(
        (status = 200, description = "Loteamento encontrado", body = Loteamento),
        (status = 404, description = "Loteamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_loteamento(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewLoteamentos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let loteamento = app_state.loteamento_service.get(id).await?;
    Ok(Json(loteamento))
}

// POST /api/loteamentos
#[utoipa::path(
    post,
    path = "/api/loteamentos",
    tag = "Loteamentos",
    request_body = CreateLoteamentoPayload,
    responses(
        (status = 201, description = "Loteamento criado", body = Loteamento),
        (status = 403, description = "Apenas o administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_loteamento(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    _guard: RequirePermission<PermManageLotes>,
    Json(payload): Json<CreateLoteamentoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let loteamento = app_state.loteamento_service.create(&caller, &payload).await?;
    Ok((StatusCode::CREATED, Json(loteamento)))
}

// PUT /api/loteamentos/{id}
#[utoipa::path(
    put,
    path = "/api/loteamentos/{id}",
    tag = "Loteamentos",
    params(("id" = Uuid, Path, description = "ID do loteamento")),
    request_body = UpdateLoteamentoPayload,
    responses(
        (status = 200, description = "Loteamento atualizado", body = Loteamento),
        (status = 404, description = "Loteamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_loteamento(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageLotes>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLoteamentoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let loteamento = app_state.loteamento_service.update(id, &payload).await?;
    Ok(Json(loteamento))
}

// GET /api/loteamentos/{id}/lotes — o mapa de quadras e lotes
#[utoipa::path(
    get,
    path = "/api/loteamentos/{id}/lotes",
    tag = "Loteamentos",
    params(("id" = Uuid, Path, description = "ID do loteamento")),
    responses(
        (status = 200, description = "Lotes ordenados por quadra e número", body = [Lote])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_lotes_do_loteamento(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewLoteamentos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // Confere que o empreendimento existe para não devolver lista vazia
    // em id inválido
    app_state.loteamento_service.get(id).await?;

    let lotes = app_state.lote_service.list_by_loteamento(id).await?;
    Ok(Json(lotes))
}
