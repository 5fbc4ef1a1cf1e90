use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// A taxonomia segue o fluxo de reservas: erros de validação (antes de
// qualquer escrita), erros de disponibilidade (conflito de data) e erros
// de estado (ação inválida para o ciclo de vida atual do pagamento).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado para este papel")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Salão não encontrado")]
    VenueNotFound,

    #[error("Reserva não encontrada")]
    BookingNotFound,

    #[error("Pagamento não encontrado")]
    PaymentNotFound,

    #[error("Número de lugares acima da capacidade ({0})")]
    SeatsExceedCapacity(i32),

    // Erros de disponibilidade: o motor de calendário é consultivo, mas o
    // índice único do banco garante a mesma resposta em caso de corrida.
    #[error("A data {0} já está reservada")]
    DateAlreadyBooked(NaiveDate),

    #[error("A data {0} já passou")]
    DateInPast(NaiveDate),

    // Ação inválida para o estado atual (ex.: confirmar reserva não paga).
    // O chamador deve recarregar o estado do servidor e decidir de novo.
    #[error("Estado inválido: {0}")]
    InvalidState(String),

    #[error("Já existe uma assinatura para este mês")]
    SubscriptionAlreadyExists,

    #[error("Comprovante inválido: {0}")]
    InvalidReceipt(String),

    #[error("Erro no upload: {0}")]
    MultipartError(#[from] axum::extract::multipart::MultipartError),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de IO")]
    IoError(#[from] std::io::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::UsernameAlreadyExists => {
                (StatusCode::CONFLICT, "Este nome de usuário já está em uso.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Usuário ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Você não tem permissão para realizar esta ação.".to_string(),
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string()),
            AppError::VenueNotFound => (StatusCode::NOT_FOUND, "Salão não encontrado.".to_string()),
            AppError::BookingNotFound => {
                (StatusCode::NOT_FOUND, "Reserva não encontrada.".to_string())
            }
            AppError::PaymentNotFound => {
                (StatusCode::NOT_FOUND, "Pagamento não encontrado.".to_string())
            }
            AppError::SeatsExceedCapacity(capacity) => (
                StatusCode::BAD_REQUEST,
                format!("Número de lugares acima da capacidade máxima de {} pessoas.", capacity),
            ),
            AppError::DateAlreadyBooked(date) => (
                StatusCode::CONFLICT,
                format!("A data {} já está reservada neste salão.", date),
            ),
            AppError::DateInPast(date) => (
                StatusCode::BAD_REQUEST,
                format!("A data {} já passou e não pode ser reservada.", date),
            ),
            AppError::InvalidState(msg) => (StatusCode::CONFLICT, msg),
            AppError::SubscriptionAlreadyExists => (
                StatusCode::CONFLICT,
                "Já existe uma assinatura criada para este mês.".to_string(),
            ),
            AppError::InvalidReceipt(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MultipartError(e) => (
                StatusCode::BAD_REQUEST,
                format!("Falha ao processar o upload: {}", e),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
