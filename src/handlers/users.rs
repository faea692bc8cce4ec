// src/handlers/users.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermManageUsers, RequirePermission},
    },
    models::auth::{Role, UserPermissions, UserProfile},
};

// ---
// Payload: criação de conta (admin/coordenador)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub role: Role,

    pub avatar_url: Option<String>,

    // Obrigatório quando um administrador cria assistente/corretor;
    // ignorado (e forçado) quando quem cria é coordenador.
    pub coordenador_id: Option<Uuid>,

    #[schema(value_type = Option<Object>)]
    pub permissions: Option<UserPermissions>,
}

// `avatarUrl` e `coordenadorId` são anuláveis: ausente não mexe,
// `null` limpa, valor substitui.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "crate::models::campo_opcional")]
    #[schema(value_type = Option<String>)]
    pub avatar_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "crate::models::campo_opcional")]
    #[schema(value_type = Option<Uuid>)]
    pub coordenador_id: Option<Option<Uuid>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    #[serde(default)]
    pub show_inactive: bool,
    // Usado pelo seletor de coordenador no formulário de criação
    pub role: Option<Role>,
}

// Redefinição disparada pela gestão: nova senha provisória por e-mail
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado; senha provisória enviada por e-mail", body = UserProfile),
        (status = 403, description = "Regras de criação violadas"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(criador): AuthenticatedUser,
    _guard: RequirePermission<PermManageUsers>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let perfil = app_state
        .user_service
        .create_user(
            &criador,
            &payload.email,
            &payload.name,
            payload.role,
            payload.avatar_url.as_deref(),
            payload.coordenador_id,
            payload.permissions.as_ref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(perfil)))
}

// GET /api/users?showInactive=true&role=coordenador
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(
        ("showInactive" = Option<bool>, Query, description = "Inclui contas desativadas"),
        ("role" = Option<Role>, Query, description = "Filtra por papel")
    ),
    responses(
        (status = 200, description = "Lista de usuários", body = [UserProfile])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let perfis = app_state
        .user_service
        .list(query.show_inactive, query.role)
        .await?;
    Ok(Json(perfis))
}

// POST /api/users/reset-password
#[utoipa::path(
    post,
    path = "/api/users/reset-password",
    tag = "Users",
    request_body = ResetPasswordPayload,
    responses(
        (status = 204, description = "Nova senha provisória enviada por e-mail"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.user_service.reset_password(&payload.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Perfil encontrado", body = UserProfile),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let perfil = app_state.user_service.get(id).await?;
    Ok(Json(perfil))
}

// GET /api/users/{id}/equipe — usuários vinculados a um coordenador
#[utoipa::path(
    get,
    path = "/api/users/{id}/equipe",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do coordenador")),
    responses(
        (status = 200, description = "Equipe do coordenador", body = [UserProfile])
    ),
    security(("api_jwt" = []))
)]
pub async fn get_equipe(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let perfis = app_state.user_service.equipe(id).await?;
    Ok(Json(perfis))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = UserProfile),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let perfil = app_state
        .user_service
        .update_profile(
            id,
            payload.name.as_deref(),
            payload.avatar_url.as_ref().map(|o| o.as_deref()),
            payload.coordenador_id,
        )
        .await?;

    Ok(Json(perfil))
}

// PUT /api/users/{id}/permissions — substitui o mapa de override
#[utoipa::path(
    put,
    path = "/api/users/{id}/permissions",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = Object,
    responses(
        (status = 200, description = "Permissões atualizadas", body = UserProfile),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_permissions(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Path(id): Path<Uuid>,
    Json(permissions): Json<UserPermissions>,
) -> Result<impl IntoResponse, AppError> {
    let perfil = app_state
        .user_service
        .update_permissions(id, &permissions)
        .await?;
    Ok(Json(perfil))
}

// PUT /api/users/{id}/status — suspender/reativar
#[utoipa::path(
    put,
    path = "/api/users/{id}/status",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = UserProfile),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_status(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let perfil = app_state
        .user_service
        .toggle_status(id, payload.is_active)
        .await?;
    Ok(Json(perfil))
}

// DELETE /api/users/{id} — só o administrador
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário excluído definitivamente"),
        (status = 403, description = "Apenas o administrador"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    _guard: RequirePermission<PermManageUsers>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edicao_parcial_distingue_ausente_de_null() {
        let vazio: UpdateUserPayload = serde_json::from_str("{}").unwrap();
        assert!(vazio.avatar_url.is_none());
        assert!(vazio.coordenador_id.is_none());

        let limpa: UpdateUserPayload =
            serde_json::from_str(r#"{"avatarUrl": null, "coordenadorId": null}"#).unwrap();
        assert_eq!(limpa.avatar_url, Some(None));
        assert_eq!(limpa.coordenador_id, Some(None));

        let troca: UpdateUserPayload =
            serde_json::from_str(r#"{"avatarUrl": "https://cdn/x.png"}"#).unwrap();
        assert_eq!(troca.avatar_url, Some(Some("https://cdn/x.png".to_string())));
        assert!(troca.coordenador_id.is_none());
    }
}
