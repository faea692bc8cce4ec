// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, ChangePasswordPayload, DemoLoginPayload, LoginPayload, UserProfile},
};

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Autenticado com sucesso", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas"),
        (status = 403, description = "Conta desativada")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, profile) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token, profile }))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Perfil do usuário autenticado", body = UserProfile),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(perfil): AuthenticatedUser) -> Json<UserProfile> {
    Json(perfil)
}

// Troca de senha do próprio usuário
#[utoipa::path(
    put,
    path = "/api/auth/password",
    tag = "Auth",
    request_body = ChangePasswordPayload,
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 400, description = "Validação falhou"),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(perfil): AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .auth_service
        .change_password(perfil.id, &payload.password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// Login no modo de demonstração (sem banco): substitui a sessão local
#[utoipa::path(
    post,
    path = "/api/auth/demo/login",
    tag = "Auth",
    request_body = DemoLoginPayload,
    responses(
        (status = 200, description = "Sessão demo criada", body = AuthResponse),
        (status = 400, description = "Validação falhou"),
        (status = 403, description = "Modo demo desabilitado ou papel não admitido")
    )
)]
pub async fn demo_login(
    State(app_state): State<AppState>,
    Json(payload): Json<DemoLoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, profile) = app_state.auth_service.demo_login(&payload).await?;
    Ok(Json(AuthResponse { token, profile }))
}

#[utoipa::path(
    post,
    path = "/api/auth/demo/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Sessão demo removida")
    )
)]
pub async fn demo_logout(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.demo_logout()?;
    Ok(StatusCode::NO_CONTENT)
}
