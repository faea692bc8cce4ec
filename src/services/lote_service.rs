// src/services/lote_service.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FilaRepository, LoteRepository},
    models::lote::{CreateLotePayload, FilaReserva, Lote, TransicaoLote, TransitionOutcome},
};

// O workflow de status do lote. Cada transição é uma única escrita
// condicional no repositório; aqui só traduzimos o Option que volta do
// banco em um resultado etiquetado (aplicada vs. guarda falhou), sem
// retry e sem compensação.
#[derive(Clone)]
pub struct LoteService {
    lote_repo: LoteRepository,
    fila_repo: FilaRepository,
}

impl LoteService {
    pub fn new(lote_repo: LoteRepository, fila_repo: FilaRepository) -> Self {
        Self { lote_repo, fila_repo }
    }

    pub async fn get(&self, id: Uuid) -> Result<Lote, AppError> {
        self.lote_repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn list_by_loteamento(&self, loteamento_id: Uuid) -> Result<Vec<Lote>, AppError> {
        self.lote_repo.list_by_loteamento(loteamento_id).await
    }

    pub async fn create(&self, payload: &CreateLotePayload) -> Result<Lote, AppError> {
        self.lote_repo.create(payload).await
    }

    pub async fn reservar(
        &self,
        lote_id: Uuid,
        responsavel_id: Uuid,
        data_fim_reserva: DateTime<Utc>,
    ) -> Result<TransitionOutcome, AppError> {
        let atualizado = self
            .lote_repo
            .reservar(lote_id, responsavel_id, data_fim_reserva)
            .await?;

        Ok(Self::etiquetar(atualizado, TransicaoLote::Reservar))
    }

    pub async fn cancelar_reserva(&self, lote_id: Uuid) -> Result<TransitionOutcome, AppError> {
        let atualizado = self.lote_repo.cancelar_reserva(lote_id).await?;
        Ok(Self::etiquetar(atualizado, TransicaoLote::CancelarReserva))
    }

    pub async fn aprovar_venda(&self, lote_id: Uuid) -> Result<TransitionOutcome, AppError> {
        let atualizado = self.lote_repo.aprovar_venda(lote_id).await?;
        Ok(Self::etiquetar(atualizado, TransicaoLote::AprovarVenda))
    }

    // Entrar na fila independe do status do lote; não é transição.
    pub async fn entrar_fila(
        &self,
        lote_id: Uuid,
        usuario_id: Uuid,
    ) -> Result<FilaReserva, AppError> {
        // Confere que o lote existe antes de enfileirar
        self.lote_repo
            .find_by_id(lote_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.fila_repo.entrar(lote_id, usuario_id).await
    }

    pub async fn fila(&self, lote_id: Uuid) -> Result<Vec<FilaReserva>, AppError> {
        self.fila_repo.list_by_lote(lote_id).await
    }

    fn etiquetar(atualizado: Option<Lote>, transicao: TransicaoLote) -> TransitionOutcome {
        match atualizado {
            Some(lote) => {
                tracing::info!(
                    "Lote {}-{} agora está '{}'",
                    lote.quadra,
                    lote.numero,
                    lote.status
                );
                TransitionOutcome::Aplicada(lote)
            }
            None => {
                // Perdeu a corrida (ou o estado nunca foi o esperado):
                // ninguém mexeu no registro.
                tracing::warn!(
                    "Guarda de '{}' falhou: o lote não está mais '{}'",
                    transicao.nome(),
                    transicao.status_esperado()
                );
                TransitionOutcome::GuardaFalhou { transicao }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lote::LoteStatus;
    use rust_decimal::Decimal;

    fn lote(status: LoteStatus) -> Lote {
        Lote {
            id: Uuid::new_v4(),
            loteamento_id: Uuid::new_v4(),
            quadra: "B".to_string(),
            numero: "12".to_string(),
            area: Decimal::new(30000, 2),
            valor: Decimal::new(18000000, 2),
            status,
            responsavel_id: None,
            data_reserva: None,
            data_fim_reserva: None,
            data_venda: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn update_que_casou_vira_aplicada() {
        let resultado = LoteService::etiquetar(Some(lote(LoteStatus::Reservado)), TransicaoLote::Reservar);
        assert!(matches!(resultado, TransitionOutcome::Aplicada(_)));
    }

    #[test]
    fn update_vazio_vira_guarda_falhou_com_a_transicao() {
        let resultado = LoteService::etiquetar(None, TransicaoLote::AprovarVenda);
        match resultado {
            TransitionOutcome::GuardaFalhou { transicao } => {
                assert_eq!(transicao, TransicaoLote::AprovarVenda);
            }
            TransitionOutcome::Aplicada(_) => panic!("não deveria ter aplicado"),
        }
    }
}
