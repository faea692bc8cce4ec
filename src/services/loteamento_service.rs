// src/services/loteamento_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LoteamentoRepository,
    models::{
        auth::{Role, UserProfile},
        loteamento::{CreateLoteamentoPayload, Loteamento, UpdateLoteamentoPayload},
    },
    services::permissions,
};

#[derive(Clone)]
pub struct LoteamentoService {
    repo: LoteamentoRepository,
}

impl LoteamentoService {
    pub fn new(repo: LoteamentoRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Loteamento>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Loteamento, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    // Apenas o administrador cadastra empreendimentos
    pub async fn create(
        &self,
        caller: &UserProfile,
        payload: &CreateLoteamentoPayload,
    ) -> Result<Loteamento, AppError> {
        if !permissions::is_role(Some(caller), Role::Administrador) {
            return Err(AppError::Forbidden(
                "Apenas o administrador pode criar loteamentos.".to_string(),
            ));
        }

        let loteamento = self.repo.create(payload, caller.id).await?;
        tracing::info!("🏗️ Loteamento '{}' criado em {}/{}", loteamento.nome, loteamento.cidade, loteamento.estado);
        Ok(loteamento)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateLoteamentoPayload,
    ) -> Result<Loteamento, AppError> {
        self.repo.update(id, payload).await
    }
}
