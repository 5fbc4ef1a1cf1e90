// src/handlers/payments.rs

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        uploads::{remove_saved_receipt, save_receipt_image},
    },
    config::AppState,
    middleware::auth::{OwnerRole, RequireRole},
    models::payment::CommissionView,
};

// GET /api/owner/commission-payments
#[utoipa::path(
    get,
    path = "/api/owner/commission-payments",
    tag = "Payments",
    responses(
        (status = 200, description = "Comissões devidas pelo dono ao admin", body = [CommissionView])
    ),
    security(("api_jwt" = []))
)]
pub async fn owner_list_commissions(
    State(app_state): State<AppState>,
    RequireRole(owner, _): RequireRole<OwnerRole>,
) -> Result<Json<Vec<CommissionView>>, AppError> {
    let commissions = app_state.payment_service.list_commissions(owner.id).await?;
    Ok(Json(commissions))
}

// POST /api/owner/commission-payments/{id}/upload-receipt
#[utoipa::path(
    post,
    path = "/api/owner/commission-payments/{id}/upload-receipt",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID da comissão")),
    responses(
        (status = 200, description = "Comprovante da comissão anexado"),
        (status = 409, description = "Comissão fora do estado pendente ou já com comprovante")
    ),
    security(("api_jwt" = []))
)]
pub async fn owner_upload_commission_receipt(
    State(app_state): State<AppState>,
    RequireRole(owner, _): RequireRole<OwnerRole>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let receipt_url = save_receipt_image(multipart, &app_state.upload_dir).await?;
    if let Err(err) =
        app_state.payment_service.attach_commission_receipt(owner.id, id, &receipt_url).await
    {
        remove_saved_receipt(&app_state.upload_dir, &receipt_url).await;
        return Err(err);
    }

    Ok(Json(json!({
        "message": "Comprovante enviado.",
        "receipt_url": receipt_url,
    })))
}
