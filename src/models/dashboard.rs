// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::lote::Lote;

// View-model completo do dashboard, montado em memória a partir das
// coleções já buscadas (lotes + perfis).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_lotes: usize,
    pub lotes_disponiveis: usize,
    pub lotes_reservados: usize,
    pub lotes_vendidos: usize,
    pub valor_total_vendas: Decimal,
    pub vendas_por_mes: Vec<VendaMensal>,
    pub ultimas_reservas: Vec<Lote>,
    pub ultimas_vendas: Vec<Lote>,
    pub corretores_top: Vec<TopCorretor>,
}

// Um bucket (ano, mês) de vendas fechadas
#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendaMensal {
    pub ano: i32,
    pub mes: u32,
    // Abreviação pt-BR para o eixo do gráfico ("Jan", "Fev", ...)
    pub label: String,
    pub quantidade: u32,
    pub valor: Decimal,
}

#[derive(Debug, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopCorretor {
    pub nome: String,
    pub vendas: u32,
    pub valor: Decimal,
}
