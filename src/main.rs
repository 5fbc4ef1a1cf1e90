// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
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

    // .expect() é aceitável aqui: se a configuração falhar, a aplicação não
    // deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas: registro, login por papel, distritos e comprovantes
    let public_routes = Router::new()
        .route("/api/user/register", post(handlers::auth::register_user))
        .route("/api/owner/register", post(handlers::auth::register_owner))
        .route("/api/admin/login", post(handlers::auth::login_admin))
        .route("/api/owner/login", post(handlers::auth::login_owner))
        .route("/api/user/login", post(handlers::auth::login_user))
        .route("/api/districts", get(handlers::districts::list_districts))
        .route("/uploads/{file}", get(handlers::uploads::serve_upload));

    let admin_routes = Router::new()
        .route("/venues", get(handlers::venues::admin_list_venues))
        .route(
            "/venues/{id}",
            get(handlers::venues::admin_get_venue)
                .put(handlers::venues::admin_update_venue)
                .delete(handlers::venues::admin_delete_venue),
        )
        .route("/venues/{id}/confirm", put(handlers::venues::admin_confirm_venue))
        .route("/venues/{id}/assign-owner", put(handlers::venues::admin_assign_owner))
        .route("/bookings", get(handlers::bookings::admin_list_bookings))
        .route("/bookings/{id}", delete(handlers::bookings::admin_delete_booking))
        .route("/users", get(handlers::auth::list_users))
        .route(
            "/owners",
            get(handlers::auth::list_owners).post(handlers::auth::create_owner),
        )
        .route(
            "/subscription-payments",
            get(handlers::subscriptions::admin_list_subscriptions),
        )
        .route(
            "/subscription-payments/{id}/confirm",
            put(handlers::subscriptions::admin_confirm_subscription),
        )
        .route(
            "/subscription-payments/{id}/reject",
            put(handlers::subscriptions::admin_reject_subscription),
        );

    let owner_routes = Router::new()
        .route(
            "/venues",
            get(handlers::venues::owner_list_venues).post(handlers::venues::owner_create_venue),
        )
        .route("/bookings", get(handlers::bookings::owner_list_bookings))
        .route(
            "/bookings/{id}/confirm-payment",
            put(handlers::bookings::owner_review_payment),
        )
        .route(
            "/commission-payments",
            get(handlers::payments::owner_list_commissions),
        )
        .route(
            "/commission-payments/{id}/upload-receipt",
            post(handlers::payments::owner_upload_commission_receipt),
        )
        .route(
            "/subscription-info",
            get(handlers::subscriptions::owner_subscription_info),
        )
        .route(
            "/subscriptions",
            get(handlers::subscriptions::owner_list_subscriptions),
        )
        .route(
            "/create-subscription",
            post(handlers::subscriptions::owner_create_subscription),
        )
        .route(
            "/subscription/{id}/upload-receipt",
            post(handlers::subscriptions::owner_upload_subscription_receipt),
        );

    let user_routes = Router::new()
        .route("/venues", get(handlers::venues::customer_list_venues))
        .route("/venues/{id}", get(handlers::venues::customer_get_venue))
        .route(
            "/venues/{id}/availability",
            get(handlers::venues::customer_venue_availability),
        )
        .route(
            "/bookings",
            get(handlers::bookings::user_list_bookings)
                .post(handlers::bookings::user_create_booking),
        )
        .route(
            "/bookings/{id}/upload-receipt",
            post(handlers::bookings::user_upload_receipt),
        )
        .route("/bookings/{id}", delete(handlers::bookings::user_cancel_booking));

    // Combina tudo no router principal; os nests por papel passam pelo
    // auth_guard e cada handler exige o papel via RequireRole.
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(public_routes)
        .nest(
            "/api/admin",
            admin_routes.layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        )
        .nest(
            "/api/owner",
            owner_routes.layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        )
        .nest(
            "/api/user",
            user_routes.layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:8000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
