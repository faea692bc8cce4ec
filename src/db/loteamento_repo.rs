// src/db/loteamento_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::loteamento::{CreateLoteamentoPayload, Loteamento, UpdateLoteamentoPayload},
};

#[derive(Clone)]
pub struct LoteamentoRepository {
    pool: PgPool,
}

impl LoteamentoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Mais recentes primeiro, como na listagem da tela
    pub async fn list(&self) -> Result<Vec<Loteamento>, AppError> {
        let loteamentos =
            sqlx::query_as::<_, Loteamento>("SELECT * FROM loteamentos ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(loteamentos)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Loteamento>, AppError> {
        let loteamento =
            sqlx::query_as::<_, Loteamento>("SELECT * FROM loteamentos WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(loteamento)
    }

    pub async fn create(
        &self,
        payload: &CreateLoteamentoPayload,
        created_by: Uuid,
    ) -> Result<Loteamento, AppError> {
        let loteamento = sqlx::query_as::<_, Loteamento>(
            r#"
            INSERT INTO loteamentos (nome, cidade, estado, endereco, descricao, infraestrutura, imagem_url, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&payload.nome)
        .bind(&payload.cidade)
        .bind(&payload.estado)
        .bind(&payload.endereco)
        .bind(&payload.descricao)
        .bind(&payload.infraestrutura)
        .bind(&payload.imagem_url)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(loteamento)
    }

    // Edição parcial: campos não enviados ficam como estão. A imagem é a
    // única coluna anulável, então é a única que aceita "null = limpar".
    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateLoteamentoPayload,
    ) -> Result<Loteamento, AppError> {
        let loteamento = sqlx::query_as::<_, Loteamento>(
            r#"
            UPDATE loteamentos
            SET nome           = COALESCE($2, nome),
                cidade         = COALESCE($3, cidade),
                estado         = COALESCE($4, estado),
                endereco       = COALESCE($5, endereco),
                descricao      = COALESCE($6, descricao),
                infraestrutura = COALESCE($7, infraestrutura),
                imagem_url     = CASE WHEN $8 THEN $9 ELSE imagem_url END,
                is_active      = COALESCE($10, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.nome)
        .bind(&payload.cidade)
        .bind(&payload.estado)
        .bind(&payload.endereco)
        .bind(&payload.descricao)
        .bind(&payload.infraestrutura)
        .bind(payload.imagem_url.is_some())
        .bind(payload.imagem_url.clone().flatten())
        .bind(payload.is_active)
        .fetch_optional(&self.pool)
        .await?;

        loteamento.ok_or(AppError::NotFound)
    }
}
