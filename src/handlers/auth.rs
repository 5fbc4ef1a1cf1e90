// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminRole, RequireRole},
    models::auth::{LoginPayload, RegisterPayload, Role, User},
};

// O papel vem da rota; o corpo das respostas usa o nome do papel como chave
// ({"token": ..., "user": ...} ou {"token": ..., "owner": ...}), que é o
// contrato que os clientes esperam.
fn auth_response(token: String, user: User) -> Json<Value> {
    let mut body = serde_json::Map::new();
    body.insert("token".into(), json!(token));
    body.insert(user.role.as_str().into(), json!(user));
    Json(Value::Object(body))
}

// POST /api/user/register
#[utoipa::path(
    post,
    path = "/api/user/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Cliente registrado, token emitido")
    )
)]
pub async fn register_user(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state.auth_service.register(&payload, Role::User).await?;
    Ok((StatusCode::CREATED, auth_response(token, user)))
}

// POST /api/owner/register
#[utoipa::path(
    post,
    path = "/api/owner/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Dono registrado, token emitido")
    )
)]
pub async fn register_owner(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state.auth_service.register(&payload, Role::Owner).await?;
    Ok((StatusCode::CREATED, auth_response(token, user)))
}

async fn login_as(
    app_state: AppState,
    payload: LoginPayload,
    role: Role,
) -> Result<Json<Value>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state.auth_service.login(&payload.username, &payload.password, role).await?;
    Ok(auth_response(token, user))
}

// POST /api/admin/login
#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login do admin")
    )
)]
pub async fn login_admin(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<Value>, AppError> {
    login_as(app_state, payload, Role::Admin).await
}

// POST /api/owner/login
#[utoipa::path(
    post,
    path = "/api/owner/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login do dono")
    )
)]
pub async fn login_owner(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<Value>, AppError> {
    login_as(app_state, payload, Role::Owner).await
}

// POST /api/user/login
#[utoipa::path(
    post,
    path = "/api/user/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login do cliente")
    )
)]
pub async fn login_user(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<Value>, AppError> {
    login_as(app_state, payload, Role::User).await
}

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Users",
    responses(
        (status = 200, description = "Lista de clientes", body = [User])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.auth_service.list_by_role(Role::User).await?;
    Ok(Json(users))
}

// GET /api/admin/owners
#[utoipa::path(
    get,
    path = "/api/admin/owners",
    tag = "Users",
    responses(
        (status = 200, description = "Lista de donos", body = [User])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_owners(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
) -> Result<Json<Vec<User>>, AppError> {
    let owners = app_state.auth_service.list_by_role(Role::Owner).await?;
    Ok(Json(owners))
}

// POST /api/admin/owners
#[utoipa::path(
    post,
    path = "/api/admin/owners",
    tag = "Users",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Conta de dono criada pelo admin", body = User)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_owner(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // O admin cria a conta; o token emitido não é devolvido aqui
    let (_, owner) = app_state.auth_service.register(&payload, Role::Owner).await?;
    Ok((StatusCode::CREATED, Json(owner)))
}
