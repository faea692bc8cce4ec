// src/services/user_service.rs

use std::sync::Arc;

use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Role, UserPermissions, UserProfile},
    services::{auth::hash_password, email::Mailer, permissions},
};

// Regras de criação de conta, espelhando as do sistema original:
//   - ninguém cria administrador pelo app;
//   - coordenador só cria assistente/corretor, e o vínculo é forçado para
//     o próprio id;
//   - administrador precisa indicar um coordenador ao criar assistente ou
//     corretor;
//   - assistente/corretor não criam ninguém.
// Devolve o coordenador_id final do novo usuário.
fn resolver_vinculo_de_criacao(
    criador: &UserProfile,
    novo_role: Role,
    coordenador_id: Option<Uuid>,
) -> Result<Option<Uuid>, AppError> {
    if novo_role == Role::Administrador {
        return Err(AppError::Forbidden(
            "Usuário administrador só pode ser criado diretamente no banco.".to_string(),
        ));
    }

    match criador.role {
        Role::Assistente | Role::Corretor => Err(AppError::Forbidden(
            "Você não tem permissão para criar usuários.".to_string(),
        )),
        Role::Coordenador => {
            if novo_role == Role::Coordenador {
                return Err(AppError::Forbidden(
                    "Coordenador não pode criar outro coordenador.".to_string(),
                ));
            }
            // Ignora o que veio no payload: a equipe é sempre a do criador
            Ok(Some(criador.id))
        }
        Role::Administrador => {
            if matches!(novo_role, Role::Assistente | Role::Corretor) && coordenador_id.is_none() {
                return Err(AppError::Forbidden(
                    "Selecione um coordenador para criar assistentes ou corretores.".to_string(),
                ));
            }
            Ok(coordenador_id)
        }
    }
}

// Senha provisória enviada no e-mail de boas-vindas
fn gerar_senha_provisoria() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    mailer: Arc<dyn Mailer>,
}

impl UserService {
    pub fn new(user_repo: UserRepository, mailer: Arc<dyn Mailer>) -> Self {
        Self { user_repo, mailer }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_user(
        &self,
        criador: &UserProfile,
        email: &str,
        name: &str,
        role: Role,
        avatar_url: Option<&str>,
        coordenador_id: Option<Uuid>,
        permissions_override: Option<&UserPermissions>,
    ) -> Result<UserProfile, AppError> {
        let vinculo = resolver_vinculo_de_criacao(criador, role, coordenador_id)?;

        let senha_provisoria = gerar_senha_provisoria();
        let password_hash = hash_password(senha_provisoria.clone()).await?;

        let perfil = self
            .user_repo
            .create(
                email,
                name,
                role,
                &password_hash,
                avatar_url,
                vinculo,
                permissions_override,
            )
            .await?;

        tracing::info!("👤 Usuário {} criado por {}", perfil.email, criador.email);

        // Entrega única: se o relay falhar, o erro sobe e a conta já criada
        // permanece (sem compensação, como no fluxo original).
        self.mailer
            .send_welcome_email(&perfil.email, &senha_provisoria)
            .await?;

        Ok(perfil)
    }

    pub async fn list(
        &self,
        show_inactive: bool,
        role: Option<Role>,
    ) -> Result<Vec<UserProfile>, AppError> {
        self.user_repo.list(show_inactive, role).await
    }

    pub async fn get(&self, id: Uuid) -> Result<UserProfile, AppError> {
        self.user_repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)
    }

    pub async fn equipe(&self, coordenador_id: Uuid) -> Result<Vec<UserProfile>, AppError> {
        self.user_repo.list_by_coordenador(coordenador_id).await
    }

    // Os campos anuláveis chegam em dois níveis de Option: o de fora diz
    // se o campo foi enviado, o de dentro diz se limpa ou substitui.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        avatar_url: Option<Option<&str>>,
        coordenador_id: Option<Option<Uuid>>,
    ) -> Result<UserProfile, AppError> {
        self.user_repo
            .update_profile(id, name, avatar_url, coordenador_id)
            .await
    }

    // Redefinição administrativa: nova senha provisória entregue por
    // e-mail, no mesmo fluxo da criação de conta.
    pub async fn reset_password(&self, email: &str) -> Result<(), AppError> {
        let perfil = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let senha_provisoria = gerar_senha_provisoria();
        let password_hash = hash_password(senha_provisoria.clone()).await?;
        self.user_repo.update_password(perfil.id, &password_hash).await?;

        tracing::info!("🔑 Senha de {} redefinida", perfil.email);

        self.mailer
            .send_welcome_email(&perfil.email, &senha_provisoria)
            .await?;

        Ok(())
    }

    pub async fn update_permissions(
        &self,
        id: Uuid,
        permissions: &UserPermissions,
    ) -> Result<UserProfile, AppError> {
        self.user_repo.update_permissions(id, permissions).await
    }

    // Suspender/reativar: a "remoção" dos fluxos normais
    pub async fn toggle_status(&self, id: Uuid, is_active: bool) -> Result<UserProfile, AppError> {
        self.user_repo.set_active(id, is_active).await
    }

    // Deleção definitiva, restrita ao topo da hierarquia
    pub async fn delete(&self, caller: &UserProfile, id: Uuid) -> Result<(), AppError> {
        if !permissions::is_role(Some(caller), Role::Administrador) {
            return Err(AppError::Forbidden(
                "Apenas o administrador pode excluir usuários definitivamente.".to_string(),
            ));
        }
        self.user_repo.delete(id).await
    }
}
