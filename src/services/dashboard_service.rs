// src/services/dashboard_service.rs

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LoteRepository, UserRepository},
    models::{
        auth::UserProfile,
        dashboard::{DashboardStats, TopCorretor, VendaMensal},
        lote::{Lote, LoteStatus},
    },
};

// Abreviações pt-BR para o eixo do gráfico
const MESES: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

#[derive(Clone)]
pub struct DashboardService {
    lote_repo: LoteRepository,
    user_repo: UserRepository,
}

impl DashboardService {
    pub fn new(lote_repo: LoteRepository, user_repo: UserRepository) -> Self {
        Self { lote_repo, user_repo }
    }

    // Busca as coleções completas e reduz tudo em memória; nenhuma
    // escrita no banco.
    pub async fn get_stats(&self) -> Result<DashboardStats, AppError> {
        let lotes = self.lote_repo.list_all().await?;
        let perfis = self.user_repo.list(true, None).await?;
        Ok(montar_stats(&lotes, &perfis))
    }
}

// Agregador puro: coleções vazias produzem contagens zeradas e listas
// vazias, nunca erro.
pub fn montar_stats(lotes: &[Lote], perfis: &[UserProfile]) -> DashboardStats {
    let disponiveis = lotes.iter().filter(|l| l.status == LoteStatus::Disponivel).count();
    let reservados = lotes.iter().filter(|l| l.status == LoteStatus::Reservado).count();
    let vendidos = lotes.iter().filter(|l| l.status == LoteStatus::Vendido).count();

    let valor_total_vendas = lotes
        .iter()
        .filter(|l| l.status == LoteStatus::Vendido)
        .map(|l| l.valor)
        .sum::<Decimal>();

    DashboardStats {
        total_lotes: lotes.len(),
        lotes_disponiveis: disponiveis,
        lotes_reservados: reservados,
        lotes_vendidos: vendidos,
        valor_total_vendas,
        vendas_por_mes: vendas_por_mes(lotes),
        ultimas_reservas: ultimas(lotes, LoteStatus::Reservado, |l| l.data_reserva, 3),
        ultimas_vendas: ultimas(lotes, LoteStatus::Vendido, |l| l.data_venda, 3),
        corretores_top: top_corretores(lotes, perfis, 5),
    }
}

// Agrupa as vendas fechadas por (ano, mês) do carimbo de venda e ordena
// cronologicamente pelos números, não por comparação de strings.
fn vendas_por_mes(lotes: &[Lote]) -> Vec<VendaMensal> {
    let mut buckets: HashMap<(i32, u32), (u32, Decimal)> = HashMap::new();

    for lote in lotes {
        if lote.status != LoteStatus::Vendido {
            continue;
        }
        // Só participam lotes que carregam o carimbo de venda
        let Some(data_venda) = lote.data_venda else {
            continue;
        };
        let chave = (data_venda.year(), data_venda.month());
        let bucket = buckets.entry(chave).or_insert((0, Decimal::ZERO));
        bucket.0 += 1;
        bucket.1 += lote.valor;
    }

    let mut vendas: Vec<VendaMensal> = buckets
        .into_iter()
        .map(|((ano, mes), (quantidade, valor))| VendaMensal {
            ano,
            mes,
            label: MESES[(mes - 1) as usize].to_string(),
            quantidade,
            valor,
        })
        .collect();

    vendas.sort_by_key(|v| (v.ano, v.mes));
    vendas
}

// Os N registros mais recentes de um status, ordenados pelo carimbo
// relevante (desconsiderando registros sem o carimbo).
fn ultimas(
    lotes: &[Lote],
    status: LoteStatus,
    carimbo: impl Fn(&Lote) -> Option<chrono::DateTime<chrono::Utc>>,
    n: usize,
) -> Vec<Lote> {
    let mut filtrados: Vec<&Lote> = lotes
        .iter()
        .filter(|l| l.status == status && carimbo(l).is_some())
        .collect();

    filtrados.sort_by_key(|l| std::cmp::Reverse(carimbo(l)));
    filtrados.into_iter().take(n).cloned().collect()
}

// Ranking de corretores por quantidade de vendas; o nome vem da coleção
// de perfis, com fallback para o próprio id quando não há perfil.
fn top_corretores(lotes: &[Lote], perfis: &[UserProfile], n: usize) -> Vec<TopCorretor> {
    let nomes: HashMap<Uuid, String> = perfis
        .iter()
        .map(|p| (p.id, p.display_name()))
        .collect();

    let mut por_corretor: HashMap<Uuid, (u32, Decimal)> = HashMap::new();
    for lote in lotes {
        if lote.status != LoteStatus::Vendido {
            continue;
        }
        let Some(responsavel) = lote.responsavel_id else {
            continue;
        };
        let entrada = por_corretor.entry(responsavel).or_insert((0, Decimal::ZERO));
        entrada.0 += 1;
        entrada.1 += lote.valor;
    }

    let mut ranking: Vec<TopCorretor> = por_corretor
        .into_iter()
        .map(|(id, (vendas, valor))| TopCorretor {
            nome: nomes.get(&id).cloned().unwrap_or_else(|| id.to_string()),
            vendas,
            valor,
        })
        .collect();

    ranking.sort_by(|a, b| b.vendas.cmp(&a.vendas));
    ranking.truncate(n);
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn lote_com(
        status: LoteStatus,
        valor: i64,
        responsavel: Option<Uuid>,
        data_venda: Option<chrono::DateTime<chrono::Utc>>,
        data_reserva: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Lote {
        Lote {
            id: Uuid::new_v4(),
            loteamento_id: Uuid::new_v4(),
            quadra: "A".to_string(),
            numero: "01".to_string(),
            area: Decimal::new(25000, 2),
            valor: Decimal::new(valor, 0),
            status,
            responsavel_id: responsavel,
            data_reserva,
            data_fim_reserva: None,
            data_venda,
            created_at: Utc::now(),
        }
    }

    fn perfil(nome: &str) -> UserProfile {
        use crate::models::auth::Role;
        UserProfile {
            id: Uuid::new_v4(),
            email: format!("{}@oklotes.com", nome.to_lowercase().replace(' ', ".")),
            name: nome.to_string(),
            role: Role::Corretor,
            password_hash: String::new(),
            avatar_url: None,
            is_active: true,
            last_login: None,
            coordenador_id: None,
            permissions: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn dia(ano: i32, mes: u32, dia: u32) -> chrono::DateTime<chrono::Utc> {
        Utc.with_ymd_and_hms(ano, mes, dia, 12, 0, 0).unwrap()
    }

    #[test]
    fn colecoes_vazias_produzem_saida_zerada() {
        let stats = montar_stats(&[], &[]);
        assert_eq!(stats.total_lotes, 0);
        assert_eq!(stats.lotes_disponiveis, 0);
        assert_eq!(stats.lotes_reservados, 0);
        assert_eq!(stats.lotes_vendidos, 0);
        assert_eq!(stats.valor_total_vendas, Decimal::ZERO);
        assert!(stats.vendas_por_mes.is_empty());
        assert!(stats.ultimas_reservas.is_empty());
        assert!(stats.ultimas_vendas.is_empty());
        assert!(stats.corretores_top.is_empty());
    }

    #[test]
    fn contagens_particionam_a_colecao() {
        let lotes = vec![
            lote_com(LoteStatus::Disponivel, 100, None, None, None),
            lote_com(LoteStatus::Disponivel, 100, None, None, None),
            lote_com(LoteStatus::Reservado, 100, None, None, Some(dia(2025, 5, 1))),
            lote_com(LoteStatus::Vendido, 150_000, None, Some(dia(2025, 5, 2)), None),
            lote_com(LoteStatus::Vendido, 200_000, None, Some(dia(2025, 6, 3)), None),
        ];
        let stats = montar_stats(&lotes, &[]);

        assert_eq!(
            stats.lotes_disponiveis + stats.lotes_reservados + stats.lotes_vendidos,
            stats.total_lotes
        );
        assert_eq!(stats.lotes_disponiveis, 2);
        assert_eq!(stats.lotes_reservados, 1);
        assert_eq!(stats.lotes_vendidos, 2);
        // Só vendas entram no total
        assert_eq!(stats.valor_total_vendas, Decimal::new(350_000, 0));
    }

    #[test]
    fn vendas_por_mes_ordena_por_ano_e_mes_numericos() {
        let lotes = vec![
            lote_com(LoteStatus::Vendido, 100, None, Some(dia(2025, 2, 10)), None),
            lote_com(LoteStatus::Vendido, 200, None, Some(dia(2024, 11, 5)), None),
            lote_com(LoteStatus::Vendido, 300, None, Some(dia(2025, 2, 20)), None),
            // Vendido sem carimbo: fica de fora do gráfico
            lote_com(LoteStatus::Vendido, 999, None, None, None),
        ];
        let vendas = vendas_por_mes(&lotes);

        assert_eq!(vendas.len(), 2);
        assert_eq!((vendas[0].ano, vendas[0].mes), (2024, 11));
        assert_eq!(vendas[0].label, "Nov");
        assert_eq!(vendas[0].quantidade, 1);
        assert_eq!((vendas[1].ano, vendas[1].mes), (2025, 2));
        assert_eq!(vendas[1].label, "Fev");
        assert_eq!(vendas[1].quantidade, 2);
        assert_eq!(vendas[1].valor, Decimal::new(400, 0));
    }

    #[test]
    fn ultimas_vendas_pega_as_tres_mais_recentes() {
        let lotes = vec![
            lote_com(LoteStatus::Vendido, 1, None, Some(dia(2025, 5, 15)), None),
            lote_com(LoteStatus::Vendido, 2, None, Some(dia(2025, 5, 20)), None),
            lote_com(LoteStatus::Vendido, 3, None, Some(dia(2025, 5, 18)), None),
            lote_com(LoteStatus::Vendido, 4, None, Some(dia(2025, 5, 10)), None),
        ];
        let stats = montar_stats(&lotes, &[]);

        assert_eq!(stats.ultimas_vendas.len(), 3);
        assert_eq!(stats.ultimas_vendas[0].data_venda, Some(dia(2025, 5, 20)));
        assert_eq!(stats.ultimas_vendas[1].data_venda, Some(dia(2025, 5, 18)));
        assert_eq!(stats.ultimas_vendas[2].data_venda, Some(dia(2025, 5, 15)));
    }

    #[test]
    fn top_corretores_ordena_por_quantidade_de_vendas() {
        let u1 = perfil("Ana Costa");
        let u2 = perfil("Pedro Almeida");

        let mut lotes = Vec::new();
        for _ in 0..3 {
            lotes.push(lote_com(LoteStatus::Vendido, 100, Some(u1.id), Some(dia(2025, 4, 1)), None));
        }
        for _ in 0..5 {
            lotes.push(lote_com(LoteStatus::Vendido, 100, Some(u2.id), Some(dia(2025, 4, 2)), None));
        }

        let ranking = top_corretores(&lotes, &[u1, u2], 5);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].nome, "Pedro Almeida");
        assert_eq!(ranking[0].vendas, 5);
        assert_eq!(ranking[1].nome, "Ana Costa");
        assert_eq!(ranking[1].vendas, 3);
    }

    #[test]
    fn corretor_sem_perfil_aparece_pelo_id_cru() {
        let fantasma = Uuid::new_v4();
        let lotes = vec![lote_com(
            LoteStatus::Vendido,
            100,
            Some(fantasma),
            Some(dia(2025, 3, 1)),
            None,
        )];

        let ranking = top_corretores(&lotes, &[], 5);
        assert_eq!(ranking[0].nome, fantasma.to_string());
    }

    #[test]
    fn ranking_respeita_o_limite_de_cinco() {
        let mut lotes = Vec::new();
        for _ in 0..7 {
            lotes.push(lote_com(
                LoteStatus::Vendido,
                100,
                Some(Uuid::new_v4()),
                Some(dia(2025, 1, 1)),
                None,
            ));
        }
        let stats = montar_stats(&lotes, &[]);
        assert_eq!(stats.corretores_top.len(), 5);
    }
}
