// src/models/lote.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Ciclo de vida de um lote: exatamente três estados
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lote_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoteStatus {
    Disponivel,
    Reservado,
    Vendido,
}

impl LoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoteStatus::Disponivel => "disponivel",
            LoteStatus::Reservado => "reservado",
            LoteStatus::Vendido => "vendido",
        }
    }
}

impl fmt::Display for LoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unidade vendável de um loteamento (tabela `lotes`)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lote {
    pub id: Uuid,
    pub loteamento_id: Uuid,
    pub quadra: String,
    pub numero: String,
    pub area: Decimal,
    pub valor: Decimal,
    pub status: LoteStatus,

    // Preenchidos apenas enquanto o lote está reservado/vendido;
    // zerados quando volta a ficar disponível.
    pub responsavel_id: Option<Uuid>,
    pub data_reserva: Option<DateTime<Utc>>,
    pub data_fim_reserva: Option<DateTime<Utc>>,
    pub data_venda: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

// ---
// Transições guardadas do workflow
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransicaoLote {
    Reservar,
    CancelarReserva,
    AprovarVenda,
}

impl TransicaoLote {
    pub fn nome(&self) -> &'static str {
        match self {
            TransicaoLote::Reservar => "reservar",
            TransicaoLote::CancelarReserva => "cancelar reserva",
            TransicaoLote::AprovarVenda => "aprovar venda",
        }
    }

    // Status que o lote precisa ter para a transição ser aplicada.
    // A verificação real acontece no UPDATE condicional; aqui fica só o
    // contrato usado para montar mensagens de conflito.
    pub fn status_esperado(&self) -> LoteStatus {
        match self {
            TransicaoLote::Reservar => LoteStatus::Disponivel,
            TransicaoLote::CancelarReserva => LoteStatus::Reservado,
            TransicaoLote::AprovarVenda => LoteStatus::Reservado,
        }
    }
}

// Resultado etiquetado de uma transição: ou o registro atualizado, ou a
// guarda que falhou. Nunca um "resultado vazio" que o chamador possa
// esquecer de checar.
#[derive(Debug)]
pub enum TransitionOutcome {
    Aplicada(Lote),
    GuardaFalhou { transicao: TransicaoLote },
}

impl TransitionOutcome {
    pub fn into_result(self) -> Result<Lote, crate::common::error::AppError> {
        match self {
            TransitionOutcome::Aplicada(lote) => Ok(lote),
            TransitionOutcome::GuardaFalhou { transicao } => {
                Err(crate::common::error::AppError::TransitionConflict {
                    transicao: transicao.nome().to_string(),
                    esperado: transicao.status_esperado().to_string(),
                })
            }
        }
    }
}

// ---
// Fila de reservas (tabela `fila_reservas`)
// ---
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilaReserva {
    pub id: Uuid,
    pub lote_id: Uuid,
    pub usuario_id: Uuid,
    pub posicao: i32,
    pub data_entrada: DateTime<Utc>,
    pub notificado: bool,
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLotePayload {
    pub loteamento_id: Uuid,

    #[validate(length(min = 1, message = "A quadra é obrigatória."))]
    pub quadra: String,

    #[validate(length(min = 1, message = "O número é obrigatório."))]
    pub numero: String,

    pub area: Decimal,
    pub valor: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservarLotePayload {
    // Quando a reserva expira (escolhida pelo corretor na tela)
    pub data_fim_reserva: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::AppError;

    fn lote_de_teste(status: LoteStatus) -> Lote {
        Lote {
            id: Uuid::new_v4(),
            loteamento_id: Uuid::new_v4(),
            quadra: "A".to_string(),
            numero: "01".to_string(),
            area: Decimal::new(25000, 2),
            valor: Decimal::new(15000000, 2),
            status,
            responsavel_id: None,
            data_reserva: None,
            data_fim_reserva: None,
            data_venda: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn transicao_aplicada_devolve_o_lote() {
        let lote = lote_de_teste(LoteStatus::Reservado);
        let id = lote.id;
        let resultado = TransitionOutcome::Aplicada(lote).into_result().unwrap();
        assert_eq!(resultado.id, id);
    }

    #[test]
    fn guarda_falhou_vira_conflito_nomeando_a_transicao() {
        let outcome = TransitionOutcome::GuardaFalhou {
            transicao: TransicaoLote::Reservar,
        };
        match outcome.into_result() {
            Err(AppError::TransitionConflict { transicao, esperado }) => {
                assert_eq!(transicao, "reservar");
                assert_eq!(esperado, "disponivel");
            }
            other => panic!("esperava TransitionConflict, veio {:?}", other),
        }
    }

    #[test]
    fn aprovar_venda_exige_lote_reservado() {
        assert_eq!(
            TransicaoLote::AprovarVenda.status_esperado(),
            LoteStatus::Reservado
        );
        assert_eq!(
            TransicaoLote::CancelarReserva.status_esperado(),
            LoteStatus::Reservado
        );
    }
}
