// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::change_password,
        handlers::auth::demo_login,
        handlers::auth::demo_logout,

        // --- Users ---
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::get_equipe,
        handlers::users::update_user,
        handlers::users::update_permissions,
        handlers::users::toggle_status,
        handlers::users::delete_user,
        handlers::users::reset_password,

        // --- Loteamentos ---
        handlers::loteamentos::list_loteamentos,
        handlers::loteamentos::get_loteamento,
        handlers::loteamentos::create_loteamento,
        handlers::loteamentos::update_loteamento,
        handlers::loteamentos::list_lotes_do_loteamento,

        // --- Lotes ---
        handlers::lotes::create_lote,
        handlers::lotes::get_lote,
        handlers::lotes::reservar_lote,
        handlers::lotes::cancelar_reserva,
        handlers::lotes::aprovar_venda,
        handlers::lotes::entrar_fila,
        handlers::lotes::listar_fila,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::UserProfile,
            models::auth::LoginPayload,
            models::auth::ChangePasswordPayload,
            models::auth::DemoLoginPayload,
            models::auth::AuthResponse,

            // --- Loteamentos ---
            models::loteamento::Loteamento,
            models::loteamento::CreateLoteamentoPayload,
            models::loteamento::UpdateLoteamentoPayload,

            // --- Lotes ---
            models::lote::LoteStatus,
            models::lote::Lote,
            models::lote::FilaReserva,
            models::lote::CreateLotePayload,
            models::lote::ReservarLotePayload,

            // --- Dashboard ---
            models::dashboard::DashboardStats,
            models::dashboard::VendaMensal,
            models::dashboard::TopCorretor,

            // --- Payloads ---
            handlers::users::CreateUserPayload,
            handlers::users::UpdateUserPayload,
            handlers::users::StatusPayload,
            handlers::users::ResetPasswordPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e sessão demo"),
        (name = "Users", description = "Contas, vínculos e permissões"),
        (name = "Loteamentos", description = "Empreendimentos e seus lotes"),
        (name = "Lotes", description = "Workflow de reserva e venda"),
        (name = "Dashboard", description = "Indicadores do portfólio")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
