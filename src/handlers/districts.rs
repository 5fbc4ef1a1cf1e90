// src/handlers/districts.rs

use axum::Json;

use crate::models::district::{District, DISTRICTS};

// GET /api/districts
#[utoipa::path(
    get,
    path = "/api/districts",
    tag = "Districts",
    responses(
        (status = 200, description = "Distritos de Tashkent", body = [District])
    )
)]
pub async fn list_districts() -> Json<&'static [District]> {
    Json(DISTRICTS)
}
