// src/services/session.rs

use std::path::PathBuf;

use crate::{common::error::AppError, models::auth::UserProfile};

// Sessão de demonstração persistida localmente: um único perfil
// serializado em JSON, sem versionamento de schema.
//
// Ciclo de vida explícito: lido uma vez na inicialização, substituído por
// inteiro no login demo, removido no logout. Injetado no fluxo de
// autenticação em vez de lido de forma ambiente em vários pontos.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Option<UserProfile>, AppError> {
        let conteudo = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(anyhow::Error::from(e).into()),
        };

        let perfil = serde_json::from_str::<StoredProfile>(&conteudo)
            .map_err(|e| anyhow::anyhow!("Sessão demo corrompida: {}", e))?;
        Ok(Some(perfil.into()))
    }

    pub fn replace(&self, profile: &UserProfile) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(&StoredProfile::from(profile))
            .map_err(|e| anyhow::anyhow!("Falha ao serializar sessão demo: {}", e))?;
        std::fs::write(&self.path, json).map_err(|e| anyhow::Error::from(e))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AppError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::from(e).into()),
        }
    }
}

// O que vai para o disco. `UserProfile` não deriva Deserialize (o hash de
// senha nunca sai pela API), então o espelho local cuida da ida e volta.
#[derive(serde::Serialize, serde::Deserialize)]
struct StoredProfile {
    id: uuid::Uuid,
    email: String,
    name: String,
    role: crate::models::auth::Role,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&UserProfile> for StoredProfile {
    fn from(p: &UserProfile) -> Self {
        Self {
            id: p.id,
            email: p.email.clone(),
            name: p.name.clone(),
            role: p.role,
            is_active: p.is_active,
            created_at: p.created_at,
        }
    }
}

impl From<StoredProfile> for UserProfile {
    fn from(s: StoredProfile) -> Self {
        UserProfile {
            id: s.id,
            email: s.email,
            name: s.name,
            role: s.role,
            password_hash: String::new(),
            avatar_url: None,
            is_active: s.is_active,
            last_login: None,
            coordenador_id: None,
            permissions: None,
            created_at: s.created_at,
            updated_at: s.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use chrono::Utc;
    use uuid::Uuid;

    fn store_temporario() -> SessionStore {
        let path = std::env::temp_dir().join(format!("ok-demo-{}.json", Uuid::new_v4()));
        SessionStore::new(path)
    }

    fn perfil_demo() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: "demo@oklotes.com".to_string(),
            name: "Usuária Demo".to_string(),
            role: Role::Coordenador,
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
    fn arquivo_ausente_carrega_como_none() {
        let store = store_temporario();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn replace_e_load_fazem_a_ida_e_volta() {
        let store = store_temporario();
        let perfil = perfil_demo();
        store.replace(&perfil).unwrap();

        let carregado = store.load().unwrap().expect("sessão deveria existir");
        assert_eq!(carregado.id, perfil.id);
        assert_eq!(carregado.email, perfil.email);
        assert_eq!(carregado.role, Role::Coordenador);

        store.clear().unwrap();
    }

    #[test]
    fn clear_e_idempotente() {
        let store = store_temporario();
        let perfil = perfil_demo();
        store.replace(&perfil).unwrap();

        store.clear().unwrap();
        store.clear().unwrap(); // segunda remoção não é erro
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn login_demo_substitui_a_sessao_por_inteiro() {
        let store = store_temporario();
        let primeiro = perfil_demo();
        store.replace(&primeiro).unwrap();

        let mut segundo = perfil_demo();
        segundo.email = "outra@oklotes.com".to_string();
        segundo.role = Role::Corretor;
        store.replace(&segundo).unwrap();

        let carregado = store.load().unwrap().unwrap();
        assert_eq!(carregado.email, "outra@oklotes.com");
        assert_eq!(carregado.role, Role::Corretor);

        store.clear().unwrap();
    }
}
