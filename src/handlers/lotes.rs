// src/handlers/lotes.rs

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
        rbac::{PermManageLotes, PermManageReservations, PermViewLoteamentos, RequirePermission},
    },
    models::lote::{CreateLotePayload, FilaReserva, Lote, ReservarLotePayload},
};

// POST /api/lotes
#[utoipa::path(
    post,
    path = "/api/lotes",
    tag = "Lotes",
    request_body = CreateLotePayload,
    responses(
        (status = 201, description = "Lote criado como disponível", body = Lote),
        (status = 409, description = "Já existe lote com essa quadra/número no loteamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lote(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageLotes>,
    Json(payload): Json<CreateLotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lote = app_state.lote_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(lote)))
}

// GET /api/lotes/{id}
#[utoipa::path(
    get,
    path = "/api/lotes/{id}",
    tag = "Lotes",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 200, description = "Lote encontrado", body = Lote),
        (status = 404, description = "Lote não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lote(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewLoteamentos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let lote = app_state.lote_service.get(id).await?;
    Ok(Json(lote))
}

// POST /api/lotes/{id}/reservar — disponível -> reservado
#[utoipa::path(
    post,
    path = "/api/lotes/{id}/reservar",
    tag = "Lotes",
    params(("id" = Uuid, Path, description = "ID do lote")),
    request_body = ReservarLotePayload,
    responses(
        (status = 200, description = "Reserva aplicada", body = Lote),
        (status = 409, description = "O lote não estava mais disponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn reservar_lote(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    _guard: RequirePermission<PermManageReservations>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReservarLotePayload>,
) -> Result<impl IntoResponse, AppError> {
    let resultado = app_state
        .lote_service
        .reservar(id, caller.id, payload.data_fim_reserva)
        .await?;

    let lote = resultado.into_result()?;
    Ok(Json(lote))
}

// POST /api/lotes/{id}/cancelar-reserva — reservado -> disponível
#[utoipa::path(
    post,
    path = "/api/lotes/{id}/cancelar-reserva",
    tag = "Lotes",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 200, description = "Reserva cancelada; lote limpo", body = Lote),
        (status = 409, description = "O lote não estava reservado")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancelar_reserva(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageReservations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resultado = app_state.lote_service.cancelar_reserva(id).await?;
    let lote = resultado.into_result()?;
    Ok(Json(lote))
}

// POST /api/lotes/{id}/aprovar-venda — reservado -> vendido
#[utoipa::path(
    post,
    path = "/api/lotes/{id}/aprovar-venda",
    tag = "Lotes",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 200, description = "Venda aprovada", body = Lote),
        (status = 409, description = "O lote não estava reservado")
    ),
    security(("api_jwt" = []))
)]
pub async fn aprovar_venda(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageLotes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resultado = app_state.lote_service.aprovar_venda(id).await?;
    let lote = resultado.into_result()?;
    Ok(Json(lote))
}

// POST /api/lotes/{id}/fila — o chamador entra no fim da fila
#[utoipa::path(
    post,
    path = "/api/lotes/{id}/fila",
    tag = "Lotes",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 201, description = "Posição na fila", body = FilaReserva),
        (status = 404, description = "Lote não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn entrar_fila(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    _guard: RequirePermission<PermManageReservations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entrada = app_state.lote_service.entrar_fila(id, caller.id).await?;
    Ok((StatusCode::CREATED, Json(entrada)))
}

// GET /api/lotes/{id}/fila
#[utoipa::path(
    get,
    path = "/api/lotes/{id}/fila",
    tag = "Lotes",
    params(("id" = Uuid, Path, description = "ID do lote")),
    responses(
        (status = 200, description = "Fila em ordem de posição", body = [FilaReserva])
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_fila(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageReservations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let fila = app_state.lote_service.fila(id).await?;
    Ok(Json(fila))
}
