// src/services/email.rs

use async_trait::async_trait;
use serde::Serialize;

use crate::common::error::AppError;

// Corpo aceito pelo relay externo de boas-vindas
#[derive(Debug, Serialize)]
pub struct WelcomeEmail<'a> {
    pub to: &'a str,
    pub password: &'a str,
}

// Entrega única, sem retry e sem confirmação: o relay é um colaborador
// externo e o erro dele sobe inalterado para o chamador.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_welcome_email(&self, to: &str, password: &str) -> Result<(), AppError>;
}

// Implementação real: POST JSON para o endpoint configurado
// (WELCOME_EMAIL_URL), o mesmo contrato do serviço de e-mail original.
pub struct HttpRelayMailer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRelayMailer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl Mailer for HttpRelayMailer {
    async fn send_welcome_email(&self, to: &str, password: &str) -> Result<(), AppError> {
        let resposta = self
            .client
            .post(&self.endpoint)
            .json(&WelcomeEmail { to, password })
            .send()
            .await?;

        resposta.error_for_status()?;
        tracing::info!("📧 E-mail de boas-vindas encaminhado para {}", to);
        Ok(())
    }
}

#[cfg(test)]
pub mod teste {
    use super::*;
    use std::sync::Mutex;

    // Mailer de teste: apenas registra os envios.
    #[derive(Default)]
    pub struct MailerEspiao {
        pub enviados: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Mailer for MailerEspiao {
        async fn send_welcome_email(&self, to: &str, password: &str) -> Result<(), AppError> {
            self.enviados
                .lock()
                .unwrap()
                .push((to.to_string(), password.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn espiao_registra_cada_envio() {
        let espiao = MailerEspiao::default();
        espiao
            .send_welcome_email("nova@oklotes.com", "senha123x")
            .await
            .unwrap();

        let enviados = espiao.enviados.lock().unwrap();
        assert_eq!(enviados.len(), 1);
        assert_eq!(enviados[0].0, "nova@oklotes.com");
        assert_eq!(enviados[0].1, "senha123x");
    }

    #[test]
    fn corpo_do_email_segue_o_contrato_do_relay() {
        let corpo = WelcomeEmail { to: "nova@oklotes.com", password: "abc123" };
        let json = serde_json::to_value(&corpo).unwrap();
        assert_eq!(json["to"], "nova@oklotes.com");
        assert_eq!(json["password"], "abc123");
    }
}
