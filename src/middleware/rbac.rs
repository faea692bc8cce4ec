// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Permissao, UserProfile},
};

/// 1. O trait que define o que é uma capacidade exigida pela rota
pub trait PermissionDef: Send + Sync + 'static {
    fn permissao() -> Permissao;
}

/// 2. O extrator (guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts: o perfil já foi pendurado nos
// extensions pelo auth_guard; a decisão em si é o resolvedor puro.
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let perfil = parts.extensions.get::<UserProfile>();
        if perfil.is_none() {
            return Err(AppError::InvalidToken);
        }

        let exigida = T::permissao();
        if !app_state.permission_policy.has_permission(perfil, exigida) {
            return Err(AppError::Forbidden(format!(
                "Você precisa da permissão '{}' para realizar esta ação.",
                exigida.as_str()
            )));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermViewDashboard;
impl PermissionDef for PermViewDashboard {
    fn permissao() -> Permissao { Permissao::ViewDashboard }
}

pub struct PermViewLoteamentos;
impl PermissionDef for PermViewLoteamentos {
    fn permissao() -> Permissao { Permissao::ViewLoteamentos }
}

pub struct PermManageLotes;
impl PermissionDef for PermManageLotes {
    fn permissao() -> Permissao { Permissao::ManageLotes }
}

pub struct PermManageUsers;
impl PermissionDef for PermManageUsers {
    fn permissao() -> Permissao { Permissao::ManageUsers }
}

pub struct PermManageReservations;
impl PermissionDef for PermManageReservations {
    fn permissao() -> Permissao { Permissao::ManageReservations }
}
