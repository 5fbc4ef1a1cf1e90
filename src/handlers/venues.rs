// src/handlers/venues.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminRole, CustomerRole, OwnerRole, RequireRole},
    models::venue::{
        AssignOwnerPayload, CreateVenuePayload, CustomerVenueView, VenueDetails, VenueFilters,
        VenueView,
    },
    services::availability::MonthAvailability,
};

// --- Admin ---

// GET /api/admin/venues
#[utoipa::path(
    get,
    path = "/api/admin/venues",
    tag = "Venues",
    params(VenueFilters),
    responses(
        (status = 200, description = "Todos os salões, confirmados ou não", body = [VenueView])
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_list_venues(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Query(filters): Query<VenueFilters>,
) -> Result<Json<Vec<VenueView>>, AppError> {
    let venues = app_state.venue_service.list_all(&filters).await?;
    Ok(Json(venues))
}

// GET /api/admin/venues/{id}
#[utoipa::path(
    get,
    path = "/api/admin/venues/{id}",
    tag = "Venues",
    params(("id" = Uuid, Path, description = "ID do salão")),
    responses(
        (status = 200, description = "Detalhe do salão com reservas", body = VenueDetails)
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_get_venue(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<VenueDetails>, AppError> {
    let details = app_state.venue_service.details(id).await?;
    Ok(Json(details))
}

// PUT /api/admin/venues/{id}
#[utoipa::path(
    put,
    path = "/api/admin/venues/{id}",
    tag = "Venues",
    request_body = CreateVenuePayload,
    params(("id" = Uuid, Path, description = "ID do salão")),
    responses(
        (status = 200, description = "Salão atualizado", body = VenueView)
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_update_venue(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateVenuePayload>,
) -> Result<Json<VenueView>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let venue = app_state.venue_service.update(id, &payload).await?;
    Ok(Json(venue))
}

// PUT /api/admin/venues/{id}/confirm
#[utoipa::path(
    put,
    path = "/api/admin/venues/{id}/confirm",
    tag = "Venues",
    params(("id" = Uuid, Path, description = "ID do salão")),
    responses(
        (status = 200, description = "Salão confirmado e visível aos clientes", body = VenueView)
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_confirm_venue(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<VenueView>, AppError> {
    let venue = app_state.venue_service.confirm(id).await?;
    Ok(Json(venue))
}

// PUT /api/admin/venues/{id}/assign-owner
#[utoipa::path(
    put,
    path = "/api/admin/venues/{id}/assign-owner",
    tag = "Venues",
    request_body = AssignOwnerPayload,
    params(("id" = Uuid, Path, description = "ID do salão")),
    responses(
        (status = 200, description = "Dono vinculado ao salão", body = VenueView)
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_assign_owner(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignOwnerPayload>,
) -> Result<Json<VenueView>, AppError> {
    let venue = app_state.venue_service.assign_owner(id, &payload).await?;
    Ok(Json(venue))
}

// DELETE /api/admin/venues/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/venues/{id}",
    tag = "Venues",
    params(("id" = Uuid, Path, description = "ID do salão")),
    responses(
        (status = 204, description = "Salão removido")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_delete_venue(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.venue_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Dono ---

// GET /api/owner/venues
#[utoipa::path(
    get,
    path = "/api/owner/venues",
    tag = "Venues",
    params(VenueFilters),
    responses(
        (status = 200, description = "Salões do dono autenticado", body = [VenueView])
    ),
    security(("api_jwt" = []))
)]
pub async fn owner_list_venues(
    State(app_state): State<AppState>,
    RequireRole(owner, _): RequireRole<OwnerRole>,
    Query(filters): Query<VenueFilters>,
) -> Result<Json<Vec<VenueView>>, AppError> {
    let venues = app_state.venue_service.list_for_owner(owner.id, &filters).await?;
    Ok(Json(venues))
}

// POST /api/owner/venues
#[utoipa::path(
    post,
    path = "/api/owner/venues",
    tag = "Venues",
    request_body = CreateVenuePayload,
    responses(
        (status = 201, description = "Salão criado aguardando confirmação do admin", body = VenueView)
    ),
    security(("api_jwt" = []))
)]
pub async fn owner_create_venue(
    State(app_state): State<AppState>,
    RequireRole(owner, _): RequireRole<OwnerRole>,
    Json(payload): Json<CreateVenuePayload>,
) -> Result<(StatusCode, Json<VenueView>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let venue = app_state.venue_service.create_for_owner(owner.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(venue)))
}

// --- Cliente ---

// GET /api/user/venues
#[utoipa::path(
    get,
    path = "/api/user/venues",
    tag = "Venues",
    params(VenueFilters),
    responses(
        (status = 200, description = "Salões confirmados com o status visto pelo cliente", body = [CustomerVenueView])
    ),
    security(("api_jwt" = []))
)]
pub async fn customer_list_venues(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<CustomerRole>,
    Query(filters): Query<VenueFilters>,
) -> Result<Json<Vec<CustomerVenueView>>, AppError> {
    let venues = app_state.venue_service.list_for_customer(user.id, &filters).await?;
    Ok(Json(venues))
}

// GET /api/user/venues/{id}
#[utoipa::path(
    get,
    path = "/api/user/venues/{id}",
    tag = "Venues",
    params(("id" = Uuid, Path, description = "ID do salão")),
    responses(
        (status = 200, description = "Detalhe do salão com as reservas ativas", body = VenueDetails)
    ),
    security(("api_jwt" = []))
)]
pub async fn customer_get_venue(
    State(app_state): State<AppState>,
    RequireRole(_cliente, _): RequireRole<CustomerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<VenueDetails>, AppError> {
    let details = app_state.venue_service.details_for_customer(id).await?;
    Ok(Json(details))
}

// GET /api/user/venues/{id}/availability
#[utoipa::path(
    get,
    path = "/api/user/venues/{id}/availability",
    tag = "Venues",
    params(("id" = Uuid, Path, description = "ID do salão")),
    responses(
        (status = 200, description = "Janela de 3 meses classificada dia a dia", body = [MonthAvailability])
    ),
    security(("api_jwt" = []))
)]
pub async fn customer_venue_availability(
    State(app_state): State<AppState>,
    RequireRole(_cliente, _): RequireRole<CustomerRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MonthAvailability>>, AppError> {
    let window = app_state.venue_service.availability(id).await?;
    Ok(Json(window))
}
