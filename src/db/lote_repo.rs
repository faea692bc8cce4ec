// src/db/lote_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lote::{CreateLotePayload, Lote},
};

// Repositório de lotes. As transições de status são UPDATEs condicionais:
// o WHERE repete o status esperado, então a escrita só acontece se o
// registro ainda estiver naquele estado (compare-and-swap no banco).
// `None` significa "a guarda falhou", nunca um erro.
#[derive(Clone)]
pub struct LoteRepository {
    pool: PgPool,
}

impl LoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Lote>, AppError> {
        let lote = sqlx::query_as::<_, Lote>("SELECT * FROM lotes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lote)
    }

    // Ordenação da tela: quadra, depois número
    pub async fn list_by_loteamento(&self, loteamento_id: Uuid) -> Result<Vec<Lote>, AppError> {
        let lotes = sqlx::query_as::<_, Lote>(
            "SELECT * FROM lotes WHERE loteamento_id = $1 ORDER BY quadra, numero",
        )
        .bind(loteamento_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lotes)
    }

    // Coleção completa para o agregador do dashboard
    pub async fn list_all(&self) -> Result<Vec<Lote>, AppError> {
        let lotes = sqlx::query_as::<_, Lote>("SELECT * FROM lotes")
            .fetch_all(&self.pool)
            .await?;
        Ok(lotes)
    }

    // Lote novo entra sempre como disponível
    pub async fn create(&self, payload: &CreateLotePayload) -> Result<Lote, AppError> {
        let lote = sqlx::query_as::<_, Lote>(
            r#"
            INSERT INTO lotes (loteamento_id, quadra, numero, area, valor)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(payload.loteamento_id)
        .bind(&payload.quadra)
        .bind(&payload.numero)
        .bind(payload.area)
        .bind(payload.valor)
        .fetch_one(&self.pool)
        .await?;

        Ok(lote)
    }

    // disponivel -> reservado. De duas reservas concorrentes, só a que
    // chegar primeiro casa o WHERE; a outra recebe None.
    pub async fn reservar(
        &self,
        lote_id: Uuid,
        responsavel_id: Uuid,
        data_fim_reserva: DateTime<Utc>,
    ) -> Result<Option<Lote>, AppError> {
        let lote = sqlx::query_as::<_, Lote>(
            r#"
            UPDATE lotes
            SET status           = 'reservado',
                responsavel_id   = $2,
                data_reserva     = now(),
                data_fim_reserva = $3
            WHERE id = $1 AND status = 'disponivel'
            RETURNING *
            "#,
        )
        .bind(lote_id)
        .bind(responsavel_id)
        .bind(data_fim_reserva)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lote)
    }

    // reservado -> disponivel, zerando responsável e datas da reserva
    pub async fn cancelar_reserva(&self, lote_id: Uuid) -> Result<Option<Lote>, AppError> {
        let lote = sqlx::query_as::<_, Lote>(
            r#"
            UPDATE lotes
            SET status           = 'disponivel',
                responsavel_id   = NULL,
                data_reserva     = NULL,
                data_fim_reserva = NULL
            WHERE id = $1 AND status = 'reservado'
            RETURNING *
            "#,
        )
        .bind(lote_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lote)
    }

    // reservado -> vendido (estado terminal)
    pub async fn aprovar_venda(&self, lote_id: Uuid) -> Result<Option<Lote>, AppError> {
        let lote = sqlx::query_as::<_, Lote>(
            r#"
            UPDATE lotes
            SET status     = 'vendido',
                data_venda = now()
            WHERE id = $1 AND status = 'reservado'
            RETURNING *
            "#,
        )
        .bind(lote_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lote)
    }
}
