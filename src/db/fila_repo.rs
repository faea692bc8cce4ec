// src/db/fila_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::lote::FilaReserva};

#[derive(Clone)]
pub struct FilaRepository {
    pool: PgPool,
}

impl FilaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Entra no fim da fila do lote: lê a posição máxima atual e insere em
    // max+1 dentro de uma transação. Posições vagas nunca são reusadas.
    //
    // Duas entradas simultâneas podem ler o mesmo MAX e colidir no UNIQUE
    // (lote_id, posicao); a perdedora relê e tenta a posição seguinte em
    // vez de devolver a colisão como erro de banco.
    //
    // A promoção da cabeça da fila quando o lote volta a ficar disponível
    // é um ponto de extensão: só o caminho de inserção existe hoje.
    pub async fn entrar(&self, lote_id: Uuid, usuario_id: Uuid) -> Result<FilaReserva, AppError> {
        const TENTATIVAS: usize = 3;

        for _ in 0..TENTATIVAS - 1 {
            match self.tentar_entrar(lote_id, usuario_id).await {
                Err(AppError::DatabaseError(e)) if eh_violacao_de_posicao(&e) => continue,
                resultado => return resultado,
            }
        }
        self.tentar_entrar(lote_id, usuario_id).await
    }

    async fn tentar_entrar(
        &self,
        lote_id: Uuid,
        usuario_id: Uuid,
    ) -> Result<FilaReserva, AppError> {
        let mut tx = self.pool.begin().await?;

        let posicao_atual: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(posicao), 0) FROM fila_reservas WHERE lote_id = $1",
        )
        .bind(lote_id)
        .fetch_one(&mut *tx)
        .await?;

        let entrada = sqlx::query_as::<_, FilaReserva>(
            r#"
            INSERT INTO fila_reservas (lote_id, usuario_id, posicao, notificado)
            VALUES ($1, $2, $3, false)
            RETURNING *
            "#,
        )
        .bind(lote_id)
        .bind(usuario_id)
        .bind(posicao_atual + 1)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(entrada)
    }

    // Fila de um lote em ordem de chegada (usada na tela de detalhes)
    pub async fn list_by_lote(&self, lote_id: Uuid) -> Result<Vec<FilaReserva>, AppError> {
        let fila = sqlx::query_as::<_, FilaReserva>(
            "SELECT * FROM fila_reservas WHERE lote_id = $1 ORDER BY posicao",
        )
        .bind(lote_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fila)
    }
}

fn eh_violacao_de_posicao(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn semeia(pool: &PgPool) -> (Uuid, Uuid) {
        let (usuario_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO profiles (email, name, role, password_hash)
             VALUES ('corretor@oklotes.com', 'Corretor', 'corretor', 'hash')
             RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let (loteamento_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO loteamentos (nome, cidade, estado, endereco, created_by)
             VALUES ('Jardim das Acácias', 'Campinas', 'SP', 'Rod. SP-101, km 12', $1)
             RETURNING id",
        )
        .bind(usuario_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let (lote_id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO lotes (loteamento_id, quadra, numero, area, valor)
             VALUES ($1, 'A', '01', 250.00, 150000.00)
             RETURNING id",
        )
        .bind(loteamento_id)
        .fetch_one(pool)
        .await
        .unwrap();

        (lote_id, usuario_id)
    }

    #[sqlx::test]
    async fn posicoes_crescem_em_ordem_de_chegada(pool: PgPool) {
        let (lote_id, usuario_id) = semeia(&pool).await;
        let repo = FilaRepository::new(pool);

        let primeira = repo.entrar(lote_id, usuario_id).await.unwrap();
        let segunda = repo.entrar(lote_id, usuario_id).await.unwrap();

        assert_eq!(primeira.posicao, 1);
        assert_eq!(segunda.posicao, 2);
        assert!(!primeira.notificado);

        let fila = repo.list_by_lote(lote_id).await.unwrap();
        assert_eq!(fila.len(), 2);
        assert_eq!(fila[0].posicao, 1);
        assert_eq!(fila[1].posicao, 2);
    }

    #[sqlx::test]
    async fn entradas_concorrentes_ganham_posicoes_distintas(pool: PgPool) {
        let (lote_id, usuario_id) = semeia(&pool).await;
        let repo = FilaRepository::new(pool);

        // As duas podem ler o mesmo MAX; a colisão no UNIQUE é absorvida
        // pelo retry e ambas entram
        let (a, b) = tokio::join!(
            repo.entrar(lote_id, usuario_id),
            repo.entrar(lote_id, usuario_id),
        );
        let a = a.unwrap();
        let b = b.unwrap();

        let mut posicoes = vec![a.posicao, b.posicao];
        posicoes.sort_unstable();
        assert_eq!(posicoes, vec![1, 2]);
    }
}
