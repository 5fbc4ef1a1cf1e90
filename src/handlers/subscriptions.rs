// src/handlers/subscriptions.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        uploads::{remove_saved_receipt, save_receipt_image},
    },
    config::AppState,
    middleware::auth::{AdminRole, OwnerRole, RequireRole},
    models::payment::{
        PaymentAction, SubscriptionFilters, SubscriptionInfo, SubscriptionPayment,
    },
    services::payment_service::SubscriptionCreation,
};

// --- Dono ---

// GET /api/owner/subscription-info
#[utoipa::path(
    get,
    path = "/api/owner/subscription-info",
    tag = "Subscriptions",
    responses(
        (status = 200, description = "Resumo da assinatura do mês corrente", body = SubscriptionInfo)
    ),
    security(("api_jwt" = []))
)]
pub async fn owner_subscription_info(
    State(app_state): State<AppState>,
    RequireRole(owner, _): RequireRole<OwnerRole>,
) -> Result<Json<SubscriptionInfo>, AppError> {
    let info = app_state.payment_service.subscription_info(&owner).await?;
    Ok(Json(info))
}

// GET /api/owner/subscriptions
#[utoipa::path(
    get,
    path = "/api/owner/subscriptions",
    tag = "Subscriptions",
    responses(
        (status = 200, description = "Histórico de assinaturas do dono", body = [SubscriptionPayment])
    ),
    security(("api_jwt" = []))
)]
pub async fn owner_list_subscriptions(
    State(app_state): State<AppState>,
    RequireRole(owner, _): RequireRole<OwnerRole>,
) -> Result<Json<Vec<SubscriptionPayment>>, AppError> {
    let subscriptions = app_state.payment_service.list_owner_subscriptions(owner.id).await?;
    Ok(Json(subscriptions))
}

// POST /api/owner/create-subscription
#[utoipa::path(
    post,
    path = "/api/owner/create-subscription",
    tag = "Subscriptions",
    responses(
        (status = 201, description = "Assinatura do mês criada", body = SubscriptionPayment),
        (status = 200, description = "Mês sem reservas, nada a cobrar"),
        (status = 409, description = "Assinatura deste mês já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn owner_create_subscription(
    State(app_state): State<AppState>,
    RequireRole(owner, _): RequireRole<OwnerRole>,
) -> Result<Response, AppError> {
    match app_state.payment_service.create_monthly_subscription(&owner).await? {
        SubscriptionCreation::Created(subscription) => {
            Ok((StatusCode::CREATED, Json(subscription)).into_response())
        }
        SubscriptionCreation::NothingToCharge => Ok(Json(json!({
            "message": "Nenhuma reserva neste mês; não há assinatura a pagar.",
        }))
        .into_response()),
    }
}

// POST /api/owner/subscription/{id}/upload-receipt
#[utoipa::path(
    post,
    path = "/api/owner/subscription/{id}/upload-receipt",
    tag = "Subscriptions",
    params(("id" = Uuid, Path, description = "ID da assinatura")),
    responses(
        (status = 200, description = "Comprovante anexado, assinatura aguardando o admin", body = SubscriptionPayment),
        (status = 409, description = "Assinatura fora do estado pendente")
    ),
    security(("api_jwt" = []))
)]
pub async fn owner_upload_subscription_receipt(
    State(app_state): State<AppState>,
    RequireRole(owner, _): RequireRole<OwnerRole>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<SubscriptionPayment>, AppError> {
    let receipt_url = save_receipt_image(multipart, &app_state.upload_dir).await?;
    match app_state.payment_service.attach_subscription_receipt(owner.id, id, &receipt_url).await {
        Ok(subscription) => Ok(Json(subscription)),
        Err(err) => {
            remove_saved_receipt(&app_state.upload_dir, &receipt_url).await;
            Err(err)
        }
    }
}

// --- Admin ---

// GET /api/admin/subscription-payments
#[utoipa::path(
    get,
    path = "/api/admin/subscription-payments",
    tag = "Subscriptions",
    params(SubscriptionFilters),
    responses(
        (status = 200, description = "Assinaturas de todos os donos", body = [SubscriptionPayment])
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_list_subscriptions(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Query(filters): Query<SubscriptionFilters>,
) -> Result<Json<Vec<SubscriptionPayment>>, AppError> {
    let subscriptions = app_state.payment_service.list_subscriptions(&filters).await?;
    Ok(Json(subscriptions))
}

// PUT /api/admin/subscription-payments/{id}/confirm
#[utoipa::path(
    put,
    path = "/api/admin/subscription-payments/{id}/confirm",
    tag = "Subscriptions",
    params(("id" = Uuid, Path, description = "ID da assinatura")),
    responses(
        (status = 200, description = "Assinatura confirmada e validade do dono estendida", body = SubscriptionPayment),
        (status = 409, description = "Assinatura sem comprovante enviado")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_confirm_subscription(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubscriptionPayment>, AppError> {
    let subscription = app_state
        .payment_service
        .review_subscription_payment(id, PaymentAction::Confirm)
        .await?;
    Ok(Json(subscription))
}

// PUT /api/admin/subscription-payments/{id}/reject
#[utoipa::path(
    put,
    path = "/api/admin/subscription-payments/{id}/reject",
    tag = "Subscriptions",
    params(("id" = Uuid, Path, description = "ID da assinatura")),
    responses(
        (status = 200, description = "Assinatura rejeitada", body = SubscriptionPayment),
        (status = 409, description = "Assinatura sem comprovante enviado")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_reject_subscription(
    State(app_state): State<AppState>,
    RequireRole(_admin, _): RequireRole<AdminRole>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubscriptionPayment>, AppError> {
    let subscription = app_state
        .payment_service
        .review_subscription_payment(id, PaymentAction::Reject)
        .await?;
    Ok(Json(subscription))
}
