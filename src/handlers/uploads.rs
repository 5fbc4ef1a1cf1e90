// src/handlers/uploads.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{common::uploads::content_type_for_file, config::AppState};

// GET /uploads/{file}
//
// Serve os comprovantes gravados em disco. Os nomes são sempre UUIDs gerados
// no upload; qualquer coisa com separador de caminho é recusada.
pub async fn serve_upload(
    State(app_state): State<AppState>,
    Path(file_name): Path<String>,
) -> Response {
    if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
        return not_found();
    }

    match tokio::fs::read(app_state.upload_dir.join(&file_name)).await {
        Ok(bytes) => {
            let headers = [(header::CONTENT_TYPE, content_type_for_file(&file_name))];
            (headers, bytes).into_response()
        }
        Err(_) => not_found(),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Arquivo não encontrado." }))).into_response()
}
