// src/services/permissions.rs

use std::str::FromStr;

use crate::models::auth::{Permissao, Role, UserProfile};

// Tabela padrão por papel: todas as oito capacidades explícitas, sem
// defaulting implícito. Adicionar papel/capacidade é editar dados, não
// escrever novo if/else.
const PADRAO_ASSISTENTE: [(Permissao, bool); 8] = [
    (Permissao::ViewDashboard, true),
    (Permissao::ViewLoteamentos, true),
    (Permissao::ManageLotes, true),
    (Permissao::ManageUsers, false),
    (Permissao::ViewReports, true),
    (Permissao::ManageReservations, true),
    (Permissao::SendNotifications, true),
    (Permissao::UseChat, true),
];

const PADRAO_CORRETOR: [(Permissao, bool); 8] = [
    (Permissao::ViewDashboard, true),
    (Permissao::ViewLoteamentos, true),
    (Permissao::ManageLotes, false),
    (Permissao::ManageUsers, false),
    (Permissao::ViewReports, false),
    (Permissao::ManageReservations, true),
    (Permissao::SendNotifications, false),
    (Permissao::UseChat, true),
];

fn tabela_padrao(role: Role) -> Option<&'static [(Permissao, bool)]> {
    match role {
        Role::Assistente => Some(&PADRAO_ASSISTENTE),
        Role::Corretor => Some(&PADRAO_CORRETOR),
        // Administrador/coordenador passam pelo curto-circuito de acesso
        // total; se forem retirados da política, caem aqui e negam tudo.
        Role::Administrador | Role::Coordenador => None,
    }
}

// Política configurável: quais papéis recebem acesso irrestrito.
// Uma revisão do sistema dava acesso total também ao coordenador, outra
// não; por isso isto é parâmetro e não código.
#[derive(Debug, Clone)]
pub struct PermissionPolicy {
    blanket_roles: Vec<Role>,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self {
            blanket_roles: vec![Role::Administrador, Role::Coordenador],
        }
    }
}

impl PermissionPolicy {
    pub fn new(blanket_roles: Vec<Role>) -> Self {
        Self { blanket_roles }
    }

    // Lê a lista da env FULL_ACCESS_ROLES ("administrador,coordenador").
    // Valores desconhecidos derrubam a inicialização em vez de silenciar.
    pub fn from_env_value(raw: &str) -> Result<Self, String> {
        let mut roles = Vec::new();
        for parte in raw.split(',').filter(|p| !p.trim().is_empty()) {
            roles.push(Role::from_str(parte)?);
        }
        Ok(Self { blanket_roles: roles })
    }

    fn tem_acesso_total(&self, role: Role) -> bool {
        self.blanket_roles.contains(&role)
    }

    // O resolvedor: puro, sem efeitos colaterais.
    //
    // Ordem de resolução:
    //   1. sem perfil -> false;
    //   2. papel com acesso total -> true, ANTES do override (um `false`
    //      explícito no mapa não revoga o acesso do topo);
    //   3. override explícito, se o mapa define a capacidade;
    //   4. tabela padrão do papel;
    //   5. qualquer outro caso -> false.
    pub fn has_permission(&self, profile: Option<&UserProfile>, permissao: Permissao) -> bool {
        let Some(profile) = profile else {
            return false;
        };

        if self.tem_acesso_total(profile.role) {
            return true;
        }

        if let Some(permissions) = &profile.permissions {
            if let Some(valor) = permissions.get(permissao) {
                return valor;
            }
        }

        match tabela_padrao(profile.role) {
            Some(tabela) => tabela
                .iter()
                .find(|(p, _)| *p == permissao)
                .map(|(_, v)| *v)
                .unwrap_or(false),
            None => false,
        }
    }
}

// Checagem grosseira de papel. NÃO é igualdade estrita: o administrador
// satisfaz qualquer consulta de papel (superset de direitos); os demais
// papéis só casam com o próprio nome. Decisão de projeto mantida em todas
// as revisões do sistema.
pub fn is_role(profile: Option<&UserProfile>, role: Role) -> bool {
    match profile {
        Some(p) => p.role == Role::Administrador || p.role == role,
        None => false,
    }
}

// Flag ausente conta como ativo.
pub fn user_is_active(profile: Option<&UserProfile>) -> bool {
    profile.map(|p| p.is_active).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserPermissions;
    use sqlx::types::Json;

    const TODAS: [Permissao; 8] = [
        Permissao::ViewDashboard,
        Permissao::ViewLoteamentos,
        Permissao::ManageLotes,
        Permissao::ManageUsers,
        Permissao::ViewReports,
        Permissao::ManageReservations,
        Permissao::SendNotifications,
        Permissao::UseChat,
    ];

    fn perfil(role: Role) -> UserProfile {
        use chrono::Utc;
        UserProfile {
            id: uuid::Uuid::new_v4(),
            email: "alguem@oklotes.com".to_string(),
            name: "Alguém".to_string(),
            role,
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

    #[test]
    fn sem_perfil_nega_tudo() {
        let policy = PermissionPolicy::default();
        for p in TODAS {
            assert!(!policy.has_permission(None, p));
        }
        assert!(!is_role(None, Role::Corretor));
        assert!(!user_is_active(None));
    }

    #[test]
    fn papeis_do_topo_tem_todas_as_capacidades() {
        let policy = PermissionPolicy::default();
        for role in [Role::Administrador, Role::Coordenador] {
            let p = perfil(role);
            for cap in TODAS {
                assert!(policy.has_permission(Some(&p), cap), "{role} sem {cap:?}");
            }
        }
    }

    #[test]
    fn override_false_nao_revoga_acesso_do_topo() {
        let policy = PermissionPolicy::default();
        let mut p = perfil(Role::Administrador);
        let mut mapa = UserPermissions::default();
        mapa.0.insert(Permissao::ManageUsers, false);
        p.permissions = Some(Json(mapa));

        // O curto-circuito vem antes do mapa explícito
        assert!(policy.has_permission(Some(&p), Permissao::ManageUsers));
    }

    #[test]
    fn assistente_segue_a_tabela_padrao_exatamente() {
        let policy = PermissionPolicy::default();
        let p = perfil(Role::Assistente);
        for (cap, esperado) in PADRAO_ASSISTENTE {
            assert_eq!(policy.has_permission(Some(&p), cap), esperado, "{cap:?}");
        }
        // Cenário do contrato: assistente sem override
        assert!(!policy.has_permission(Some(&p), Permissao::ManageUsers));
        assert!(policy.has_permission(Some(&p), Permissao::ViewDashboard));
    }

    #[test]
    fn corretor_segue_a_tabela_padrao_exatamente() {
        let policy = PermissionPolicy::default();
        let p = perfil(Role::Corretor);
        for (cap, esperado) in PADRAO_CORRETOR {
            assert_eq!(policy.has_permission(Some(&p), cap), esperado, "{cap:?}");
        }
    }

    #[test]
    fn override_explicito_vale_para_papeis_da_base() {
        let policy = PermissionPolicy::default();
        let mut p = perfil(Role::Corretor);
        let mut mapa = UserPermissions::default();
        mapa.0.insert(Permissao::ManageLotes, true); // padrão do corretor é false
        mapa.0.insert(Permissao::UseChat, false); // padrão do corretor é true
        p.permissions = Some(Json(mapa));

        assert!(policy.has_permission(Some(&p), Permissao::ManageLotes));
        assert!(!policy.has_permission(Some(&p), Permissao::UseChat));
        // Capacidade fora do mapa segue a tabela padrão
        assert!(policy.has_permission(Some(&p), Permissao::ViewDashboard));
    }

    #[test]
    fn politica_sem_coordenador_trata_coordenador_como_base() {
        let policy = PermissionPolicy::new(vec![Role::Administrador]);
        let p = perfil(Role::Coordenador);
        // Fora da política e sem linha na tabela padrão: nega tudo
        for cap in TODAS {
            assert!(!policy.has_permission(Some(&p), cap));
        }
    }

    #[test]
    fn politica_via_env() {
        let policy = PermissionPolicy::from_env_value("administrador, coordenador").unwrap();
        assert!(policy.tem_acesso_total(Role::Coordenador));

        assert!(PermissionPolicy::from_env_value("gerente").is_err());
    }

    #[test]
    fn administrador_satisfaz_qualquer_consulta_de_papel() {
        let admin = perfil(Role::Administrador);
        for role in [
            Role::Administrador,
            Role::Coordenador,
            Role::Assistente,
            Role::Corretor,
        ] {
            assert!(is_role(Some(&admin), role));
        }

        let corretor = perfil(Role::Corretor);
        assert!(is_role(Some(&corretor), Role::Corretor));
        assert!(!is_role(Some(&corretor), Role::Assistente));
        assert!(!is_role(Some(&corretor), Role::Administrador));
    }

    #[test]
    fn usuario_inativo() {
        let mut p = perfil(Role::Assistente);
        assert!(user_is_active(Some(&p)));
        p.is_active = false;
        assert!(!user_is_active(Some(&p)));
    }
}
