// src/models/auth.rs

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Papéis da hierarquia (quatro níveis, do topo para a base)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "perfil_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrador,
    Coordenador,
    Assistente,
    Corretor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrador => "administrador",
            Role::Coordenador => "coordenador",
            Role::Assistente => "assistente",
            Role::Corretor => "corretor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "administrador" => Ok(Role::Administrador),
            "coordenador" => Ok(Role::Coordenador),
            "assistente" => Ok(Role::Assistente),
            "corretor" => Ok(Role::Corretor),
            other => Err(format!("Role inválido: {}", other)),
        }
    }
}

// ---
// As oito capacidades do sistema
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permissao {
    ViewDashboard,
    ViewLoteamentos,
    ManageLotes,
    ManageUsers,
    ViewReports,
    ManageReservations,
    SendNotifications,
    UseChat,
}

impl Permissao {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permissao::ViewDashboard => "view_dashboard",
            Permissao::ViewLoteamentos => "view_loteamentos",
            Permissao::ManageLotes => "manage_lotes",
            Permissao::ManageUsers => "manage_users",
            Permissao::ViewReports => "view_reports",
            Permissao::ManageReservations => "manage_reservations",
            Permissao::SendNotifications => "send_notifications",
            Permissao::UseChat => "use_chat",
        }
    }
}

// Override explícito por usuário: capacidade -> bool.
// Guardado como JSONB na coluna `permissions`; quando ausente, valem os
// padrões do papel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPermissions(pub HashMap<Permissao, bool>);

impl UserPermissions {
    pub fn get(&self, permissao: Permissao) -> Option<bool> {
        self.0.get(&permissao).copied()
    }
}

// ---
// Perfil de usuário (tabela `profiles`)
// ---
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,

    // Vínculo de equipe: assistente/corretor apontam para um coordenador
    pub coordenador_id: Option<Uuid>,

    #[schema(value_type = Option<Object>)]
    pub permissions: Option<Json<UserPermissions>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    // Nome de exibição: cai para o prefixo do e-mail quando o nome está
    // vazio ou foi preenchido com o próprio papel.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() || self.name == self.role.as_str() {
            self.email
                .split('@')
                .next()
                .unwrap_or("Usuário")
                .to_string()
        } else {
            self.name.clone()
        }
    }
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[validate(must_match(other = "password", message = "As senhas não conferem."))]
    pub password_confirmation: String,
}

// Login no modo de demonstração: monta um perfil local sem tocar no banco.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DemoLoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub role: Role,
}

// Resposta de autenticação com o token e o perfil carregado
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub profile: UserProfile,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializa_em_minusculas() {
        assert_eq!(serde_json::to_string(&Role::Coordenador).unwrap(), "\"coordenador\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"corretor\"").unwrap(),
            Role::Corretor
        );
    }

    #[test]
    fn permissoes_deserializam_como_mapa_plano() {
        let json = r#"{"view_dashboard": true, "manage_users": false}"#;
        let perms: UserPermissions = serde_json::from_str(json).unwrap();
        assert_eq!(perms.get(Permissao::ViewDashboard), Some(true));
        assert_eq!(perms.get(Permissao::ManageUsers), Some(false));
        // Capacidade não definida no mapa: ausente, não false
        assert_eq!(perms.get(Permissao::UseChat), None);
    }

    #[test]
    fn display_name_cai_para_prefixo_do_email() {
        let mut perfil = perfil_de_teste();
        perfil.name = "corretor".to_string(); // nome preenchido com o papel
        assert_eq!(perfil.display_name(), "joao.silva");

        perfil.name = "João Silva".to_string();
        assert_eq!(perfil.display_name(), "João Silva");
    }

    pub(crate) fn perfil_de_teste() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: "joao.silva@oklotes.com".to_string(),
            name: "João Silva".to_string(),
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
}
