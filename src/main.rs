//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas: login normal e entrada no modo demo
    let public_auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/demo/login", post(handlers::auth::demo_login));

    // As demais rotas de sessão exigem um Bearer token válido
    let session_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/password", put(handlers::auth::change_password))
        .route("/demo/logout", post(handlers::auth::demo_logout))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let auth_routes = public_auth_routes.merge(session_routes);

    let user_routes = Router::new()
        .route("/"
               ,post(handlers::users::create_user)
               .get(handlers::users::list_users)
        )
        .route("/{id}"
               ,get(handlers::users::get_user)
               .put(handlers::users::update_user)
               .delete(handlers::users::delete_user)
        )
        .route("/reset-password", post(handlers::users::reset_password))
        .route("/{id}/equipe", get(handlers::users::get_equipe))
        .route("/{id}/permissions", put(handlers::users::update_permissions))
        .route("/{id}/status", put(handlers::users::toggle_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let loteamento_routes = Router::new()
        .route("/"
               ,post(handlers::loteamentos::create_loteamento)
               .get(handlers::loteamentos::list_loteamentos)
        )
        .route("/{id}"
               ,get(handlers::loteamentos::get_loteamento)
               .put(handlers::loteamentos::update_loteamento)
        )
        .route("/{id}/lotes", get(handlers::loteamentos::list_lotes_do_loteamento))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let lote_routes = Router::new()
        .route("/", post(handlers::lotes::create_lote))
        .route("/{id}", get(handlers::lotes::get_lote))
        .route("/{id}/reservar", post(handlers::lotes::reservar_lote))
        .route("/{id}/cancelar-reserva", post(handlers::lotes::cancelar_reserva))
        .route("/{id}/aprovar-venda", post(handlers::lotes::aprovar_venda))
        .route("/{id}/fila"
               ,post(handlers::lotes::entrar_fila)
               .get(handlers::lotes::listar_fila)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/stats", get(handlers::dashboard::get_stats))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/loteamentos", loteamento_routes)
        .nest("/api/lotes", lote_routes)
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
