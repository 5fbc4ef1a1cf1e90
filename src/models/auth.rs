use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papel fechado do usuário. Todo o controle de acesso é feito sobre esta
// enum, nunca sobre strings soltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Owner,
    User,
}

impl Role {
    // O segmento de rota usado pelo front ("/admin/login" etc.) e a chave
    // do objeto de usuário na resposta de login.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::User => "user",
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub phone_number: Option<String>,
    pub role: Role,

    // Cartão do dono do salão, destino dos pagamentos dos clientes
    pub card_number: Option<String>,
    // Donos: até quando a assinatura mensal está quitada
    pub subscription_expires_at: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
}

// Dados para registro de um novo usuário (cliente ou dono)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub first_name: String,
    #[validate(length(min = 2, message = "O sobrenome deve ter no mínimo 2 caracteres."))]
    pub last_name: String,
    #[validate(length(min = 3, message = "O usuário deve ter no mínimo 3 caracteres."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    pub phone_number: Option<String>,
    // Donos podem informar o cartão que receberá os pagamentos
    pub card_number: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 3, message = "O usuário deve ter no mínimo 3 caracteres."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub role: Role, // Papel embutido no token
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
