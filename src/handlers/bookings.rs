// src/handlers/bookings.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        uploads::{remove_saved_receipt, save_receipt_image},
    },
    config::AppState,
    db::booking_repo::BookingScope,
    middleware::auth::{AdminRole, CustomerRole, OwnerRole, RequireRole},
    models::{
        booking::{Booking, BookingCreated, BookingFilters, BookingView, CreateBookingPayload},
        payment::PaymentActionPayload,
    },
};

// --- Admin ---

// GET /api/admin/bookings
#[utoipa::path(
    get,
    path = "/api/admin/bookings",
    tag = "Bookings",
    params(BookingFilters),
    responses(
        (status = 200, description = "Todas as reservas", body = [BookingView])
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_list_bookings(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    let bookings = app_state.booking_service.list(BookingScope::All, &filters).await?;
    Ok(Json(bookings))
}

// DELETE /api/admin/bookings/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/bookings/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 204, description = "Reserva removida definitivamente")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_delete_booking(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.booking_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Dono ---

// GET /api/owner/bookings
#[utoipa::path(
    get,
    path = "/api/owner/bookings",
    tag = "Bookings",
    params(BookingFilters),
    responses(
        (status = 200, description = "Reservas nos salões do dono", body = [BookingView])
    ),
    security(("api_jwt" = []))
)]
pub async fn owner_list_bookings(
    State(app_state): State<AppState>,
    RequireRole(owner, _): RequireRole<OwnerRole>,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    let bookings =
        app_state.booking_service.list(BookingScope::Owner(owner.id), &filters).await?;
    Ok(Json(bookings))
}

// PUT /api/owner/bookings/{id}/confirm-payment
#[utoipa::path(
    put,
    path = "/api/owner/bookings/{id}/confirm-payment",
    tag = "Bookings",
    request_body = PaymentActionPayload,
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Na confirmação, devolve a comissão a pagar ao admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn owner_review_payment(
    State(app_state): State<AppState>,
    RequireRole(owner, _): RequireRole<OwnerRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentActionPayload>,
) -> Result<Json<Value>, AppError> {
    let outcome = app_state
        .payment_service
        .review_booking_payment(&owner, id, payload.action)
        .await?;

    match outcome {
        Some(due) => Ok(Json(json!({
            "message": "Pagamento confirmado.",
            "commission_amount": due.commission_amount,
            "admin_card_number": due.admin_card_number,
        }))),
        None => Ok(Json(json!({ "message": "Pagamento rejeitado." }))),
    }
}

// --- Cliente ---

// GET /api/user/bookings
#[utoipa::path(
    get,
    path = "/api/user/bookings",
    tag = "Bookings",
    params(BookingFilters),
    responses(
        (status = 200, description = "Reservas do cliente autenticado", body = [BookingView])
    ),
    security(("api_jwt" = []))
)]
pub async fn user_list_bookings(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<CustomerRole>,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    let bookings =
        app_state.booking_service.list(BookingScope::Customer(user.id), &filters).await?;
    Ok(Json(bookings))
}

// POST /api/user/bookings
#[utoipa::path(
    post,
    path = "/api/user/bookings",
    tag = "Bookings",
    request_body = CreateBookingPayload,
    responses(
        (status = 201, description = "Reserva criada com instruções de pagamento", body = BookingCreated),
        (status = 400, description = "Data no passado ou lugares acima da capacidade"),
        (status = 409, description = "Data já reservada neste salão")
    ),
    security(("api_jwt" = []))
)]
pub async fn user_create_booking(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<CustomerRole>,
    Json(payload): Json<CreateBookingPayload>,
) -> Result<(StatusCode, Json<BookingCreated>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let created = app_state.booking_service.create(user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// POST /api/user/bookings/{id}/upload-receipt
#[utoipa::path(
    post,
    path = "/api/user/bookings/{id}/upload-receipt",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 200, description = "Comprovante anexado, pagamento aguardando o dono", body = Booking),
        (status = 400, description = "Arquivo ausente ou fora dos formatos de imagem aceitos")
    ),
    security(("api_jwt" = []))
)]
pub async fn user_upload_receipt(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<CustomerRole>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Booking>, AppError> {
    let receipt_url = save_receipt_image(multipart, &app_state.upload_dir).await?;
    match app_state.booking_service.attach_receipt(user.id, id, &receipt_url).await {
        Ok(booking) => Ok(Json(booking)),
        Err(err) => {
            // A reserva recusou o comprovante; o arquivo gravado sai junto
            remove_saved_receipt(&app_state.upload_dir, &receipt_url).await;
            Err(err)
        }
    }
}

// DELETE /api/user/bookings/{id}
#[utoipa::path(
    delete,
    path = "/api/user/bookings/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "ID da reserva")),
    responses(
        (status = 204, description = "Reserva cancelada, data liberada no calendário"),
        (status = 409, description = "Reserva não pode mais ser cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn user_cancel_booking(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<CustomerRole>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.booking_service.cancel(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
