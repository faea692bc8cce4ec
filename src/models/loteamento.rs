// src/models/loteamento.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Um empreendimento com vários lotes vendáveis (tabela `loteamentos`)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Loteamento {
    pub id: Uuid,
    pub nome: String,
    pub cidade: String,
    pub estado: String,
    pub endereco: String,
    pub descricao: String,
    pub infraestrutura: Vec<String>,
    pub imagem_url: Option<String>,
    pub created_by: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoteamentoPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,

    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub cidade: String,

    #[validate(length(equal = 2, message = "Use a sigla do estado (ex.: SP)."))]
    pub estado: String,

    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub endereco: String,

    #[serde(default)]
    pub descricao: String,

    #[serde(default)]
    pub infraestrutura: Vec<String>,

    pub imagem_url: Option<String>,
}

// Edição parcial: apenas os campos enviados são alterados.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoteamentoPayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub nome: Option<String>,

    pub cidade: Option<String>,

    #[validate(length(equal = 2, message = "Use a sigla do estado (ex.: SP)."))]
    pub estado: Option<String>,

    pub endereco: Option<String>,
    pub descricao: Option<String>,
    pub infraestrutura: Option<Vec<String>>,

    // Anulável: ausente não mexe, null remove a imagem, valor substitui
    #[serde(default, deserialize_with = "crate::models::campo_opcional")]
    #[schema(value_type = Option<String>)]
    pub imagem_url: Option<Option<String>>,

    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imagem_distingue_ausente_de_null() {
        let vazio: UpdateLoteamentoPayload = serde_json::from_str("{}").unwrap();
        assert!(vazio.imagem_url.is_none());

        let remove: UpdateLoteamentoPayload =
            serde_json::from_str(r#"{"imagemUrl": null}"#).unwrap();
        assert_eq!(remove.imagem_url, Some(None));

        let troca: UpdateLoteamentoPayload =
            serde_json::from_str(r#"{"imagemUrl": "https://cdn/mapa.png"}"#).unwrap();
        assert_eq!(troca.imagem_url, Some(Some("https://cdn/mapa.png".to_string())));
    }
}
