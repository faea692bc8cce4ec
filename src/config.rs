// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{FilaRepository, LoteRepository, LoteamentoRepository, UserRepository},
    services::{
        auth::AuthService,
        dashboard_service::DashboardService,
        email::{HttpRelayMailer, Mailer},
        lote_service::LoteService,
        loteamento_service::LoteamentoService,
        permissions::PermissionPolicy,
        session::SessionStore,
        user_service::UserService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub permission_policy: PermissionPolicy,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub loteamento_service: LoteamentoService,
    pub lote_service: LoteService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Quais papéis recebem acesso irrestrito (política configurável)
        let permission_policy = match env::var("FULL_ACCESS_ROLES") {
            Ok(valor) => PermissionPolicy::from_env_value(&valor)
                .map_err(|e| anyhow::anyhow!("FULL_ACCESS_ROLES inválida: {}", e))?,
            Err(_) => PermissionPolicy::default(),
        };

        let welcome_email_url = env::var("WELCOME_EMAIL_URL")
            .unwrap_or_else(|_| "http://localhost:3333/api/send-welcome-email".to_string());

        let demo_session_path =
            env::var("DEMO_SESSION_PATH").unwrap_or_else(|_| "demo-session.json".to_string());

        // Modo demo desligado por padrão: ele emite tokens válidos para
        // perfis que não existem no banco.
        let demo_enabled = env::var("DEMO_MODE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let loteamento_repo = LoteamentoRepository::new(db_pool.clone());
        let lote_repo = LoteRepository::new(db_pool.clone());
        let fila_repo = FilaRepository::new(db_pool.clone());

        let session_store = SessionStore::new(&demo_session_path);

        // A sessão demo é lida uma única vez na inicialização
        if demo_enabled {
            if let Some(demo) = session_store.load()? {
                tracing::info!("🎭 Sessão demo existente encontrada para {}", demo.email);
            }
        }

        let mailer: Arc<dyn Mailer> = Arc::new(HttpRelayMailer::new(welcome_email_url));

        let auth_service =
            AuthService::new(user_repo.clone(), session_store, jwt_secret, demo_enabled);
        let user_service = UserService::new(user_repo.clone(), mailer);
        let loteamento_service = LoteamentoService::new(loteamento_repo);
        let lote_service = LoteService::new(lote_repo.clone(), fila_repo);
        let dashboard_service = DashboardService::new(lote_repo, user_repo);

        Ok(Self {
            db_pool,
            permission_policy,
            auth_service,
            user_service,
            loteamento_service,
            lote_service,
            dashboard_service,
        })
    }
}
