// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, DemoLoginPayload, Role, UserProfile},
    services::{permissions, session::SessionStore},
};

// Hashing de senha em thread separada (bcrypt é CPU-bound)
pub async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

// O modo demo emite tokens reais para perfis que não existem no banco, e
// esses tokens valem para as rotas de mutação. Dois limites, então:
// o modo inteiro fica atrás de DEMO_MODE (desligado por padrão) e a
// sessão demo nunca recebe um papel com acesso irrestrito.
fn validar_acesso_demo(habilitado: bool, role: Role) -> Result<(), AppError> {
    if !habilitado {
        return Err(AppError::Forbidden(
            "O modo de demonstração está desabilitado.".to_string(),
        ));
    }
    match role {
        Role::Administrador | Role::Coordenador => Err(AppError::Forbidden(
            "O modo de demonstração só aceita os papéis assistente e corretor.".to_string(),
        )),
        Role::Assistente | Role::Corretor => Ok(()),
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    session_store: SessionStore,
    jwt_secret: String,
    demo_enabled: bool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        session_store: SessionStore,
        jwt_secret: String,
        demo_enabled: bool,
    ) -> Self {
        Self {
            user_repo,
            session_store,
            jwt_secret,
            demo_enabled,
        }
    }

    pub async fn login_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, UserProfile), AppError> {
        let perfil = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !permissions::user_is_active(Some(&perfil)) {
            return Err(AppError::InactiveUser);
        }

        let password_clone = password.to_owned();
        let hash_clone = perfil.password_hash.clone();

        // Executa a verificação em um thread separado
        let senha_valida = tokio::task::spawn_blocking(move || verify(&password_clone, &hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_valida {
            return Err(AppError::InvalidCredentials);
        }

        self.user_repo.touch_last_login(perfil.id, Utc::now()).await?;

        let token = self.create_token(perfil.id)?;
        Ok((token, perfil))
    }

    // Valida o token e recarrega o perfil. Se o id não existir no banco e
    // o modo demo estiver ativo, cai para a sessão de demonstração antes
    // de desistir.
    pub async fn validate_token(&self, token: &str) -> Result<UserProfile, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        if let Some(perfil) = self.user_repo.find_by_id(token_data.claims.sub).await? {
            if !permissions::user_is_active(Some(&perfil)) {
                return Err(AppError::InactiveUser);
            }
            return Ok(perfil);
        }

        if self.demo_enabled {
            if let Some(demo) = self.session_store.load()? {
                if demo.id == token_data.claims.sub {
                    return Ok(demo);
                }
            }
        }

        Err(AppError::UserNotFound)
    }

    pub async fn change_password(&self, user_id: Uuid, nova_senha: &str) -> Result<(), AppError> {
        let password_hash = hash_password(nova_senha.to_owned()).await?;
        self.user_repo.update_password(user_id, &password_hash).await
    }

    // Login de demonstração: monta um perfil local, substitui a sessão
    // persistida por inteiro e emite um token normal para ele.
    pub async fn demo_login(
        &self,
        payload: &DemoLoginPayload,
    ) -> Result<(String, UserProfile), AppError> {
        validar_acesso_demo(self.demo_enabled, payload.role)?;

        let agora = Utc::now();
        let perfil = UserProfile {
            id: Uuid::new_v4(),
            email: payload.email.clone(),
            name: payload.name.clone(),
            role: payload.role,
            password_hash: String::new(),
            avatar_url: None,
            is_active: true,
            last_login: Some(agora),
            coordenador_id: None,
            permissions: None,
            created_at: agora,
            updated_at: agora,
        };

        self.session_store.replace(&perfil)?;
        tracing::info!("🎭 Sessão demo criada para {} ({})", perfil.email, perfil.role);

        let token = self.create_token(perfil.id)?;
        Ok((token, perfil))
    }

    pub fn demo_logout(&self) -> Result<(), AppError> {
        self.session_store.clear()
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_desligado_nega_qualquer_papel() {
        for role in [
            Role::Administrador,
            Role::Coordenador,
            Role::Assistente,
            Role::Corretor,
        ] {
            let resultado = validar_acesso_demo(false, role);
            assert!(matches!(resultado, Err(AppError::Forbidden(_))), "{role}");
        }
    }

    // Um token demo passa pelo auth_guard como qualquer outro; um papel
    // de acesso irrestrito na sessão demo daria todas as capacidades a
    // quem nunca se autenticou de verdade.
    #[test]
    fn demo_nunca_emite_sessao_com_acesso_irrestrito() {
        for role in [Role::Administrador, Role::Coordenador] {
            let resultado = validar_acesso_demo(true, role);
            assert!(matches!(resultado, Err(AppError::Forbidden(_))), "{role}");
        }
    }

    #[test]
    fn demo_ligado_aceita_os_papeis_da_base() {
        for role in [Role::Assistente, Role::Corretor] {
            assert!(validar_acesso_demo(true, role).is_ok(), "{role}");
        }
    }
}
