// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, UserPermissions, UserProfile},
};

// O repositório de perfis, responsável por todas as interações com a
// tabela 'profiles'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, AppError> {
        let perfil = sqlx::query_as::<_, UserProfile>("SELECT * FROM profiles WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(perfil)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let perfil = sqlx::query_as::<_, UserProfile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(perfil)
    }

    // Lista geral (admin/coordenador); inativos entram só quando pedido,
    // e o papel é um filtro opcional (ex.: montar o seletor de
    // coordenadores no formulário de criação).
    pub async fn list(
        &self,
        show_inactive: bool,
        role: Option<Role>,
    ) -> Result<Vec<UserProfile>, AppError> {
        let perfis = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT * FROM profiles
            WHERE ($1 OR is_active = true)
              AND ($2::perfil_role IS NULL OR role = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(show_inactive)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(perfis)
    }

    // "Minha equipe": usuários vinculados a um coordenador específico
    pub async fn list_by_coordenador(&self, coordenador_id: Uuid) -> Result<Vec<UserProfile>, AppError> {
        let perfis = sqlx::query_as::<_, UserProfile>(
            "SELECT * FROM profiles WHERE coordenador_id = $1 ORDER BY created_at DESC",
        )
        .bind(coordenador_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(perfis)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        role: Role,
        password_hash: &str,
        avatar_url: Option<&str>,
        coordenador_id: Option<Uuid>,
        permissions: Option<&UserPermissions>,
    ) -> Result<UserProfile, AppError> {
        let perfil = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO profiles (email, name, role, password_hash, avatar_url, coordenador_id, permissions)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(password_hash)
        .bind(avatar_url)
        .bind(coordenador_id)
        .bind(permissions.map(Json))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })?;

        Ok(perfil)
    }

    // Edição parcial de perfil: só os campos enviados são alterados.
    // Para as colunas anuláveis, o Option externo diz se o campo foi
    // enviado e o interno leva o valor novo (inclusive NULL) — COALESCE
    // não serve aqui porque impediria limpar a coluna.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        avatar_url: Option<Option<&str>>,
        coordenador_id: Option<Option<Uuid>>,
    ) -> Result<UserProfile, AppError> {
        let perfil = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE profiles
            SET name           = COALESCE($2, name),
                avatar_url     = CASE WHEN $3 THEN $4 ELSE avatar_url END,
                coordenador_id = CASE WHEN $5 THEN $6 ELSE coordenador_id END,
                updated_at     = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(avatar_url.is_some())
        .bind(avatar_url.flatten())
        .bind(coordenador_id.is_some())
        .bind(coordenador_id.flatten())
        .fetch_optional(&self.pool)
        .await?;

        perfil.ok_or(AppError::UserNotFound)
    }

    // Substitui por inteiro o mapa de override de permissões
    pub async fn update_permissions(
        &self,
        id: Uuid,
        permissions: &UserPermissions,
    ) -> Result<UserProfile, AppError> {
        let perfil = sqlx::query_as::<_, UserProfile>(
            "UPDATE profiles SET permissions = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Json(permissions))
        .fetch_optional(&self.pool)
        .await?;

        perfil.ok_or(AppError::UserNotFound)
    }

    // "Remoção" de usuário: nunca apagamos, apenas desativamos
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<UserProfile, AppError> {
        let perfil = sqlx::query_as::<_, UserProfile>(
            "UPDATE profiles SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;

        perfil.ok_or(AppError::UserNotFound)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        let resultado = sqlx::query(
            "UPDATE profiles SET password_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    pub async fn touch_last_login(&self, id: Uuid, quando: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE profiles SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(quando)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // Deleção de nível administrativo (espelha a superfície de admin do
    // provedor de auth original). Os fluxos normais usam set_active.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let resultado = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }
}
