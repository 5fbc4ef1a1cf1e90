use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

const USER_COLUMNS: &str = "id, first_name, last_name, username, password_hash, phone_number, \
                            role, card_number, subscription_expires_at, created_at";

// O repositório de usuários, responsável por todas as interações com a
// tabela 'users' (clientes, donos e admins).
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário, com tratamento específico para username duplicado.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        password_hash: &str,
        phone_number: Option<&str>,
        role: Role,
        card_number: Option<&str>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, username, password_hash, phone_number, role, card_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(username)
        .bind(password_hash)
        .bind(phone_number)
        .bind(role)
        .bind(card_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("users_username_key")
                {
                    return AppError::UsernameAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at DESC"
        ))
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Estende a assinatura do dono (efeito da confirmação pelo admin).
    pub async fn set_subscription_expiry<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        expires_at: NaiveDate,
    ) -> Result<(), AppError>
    where
        E: sqlx::Executor<'e, Database = sqlx::Postgres>,
    {
        // GREATEST: confirmar um mês antigo depois de um mais novo nunca
        // encurta a validade já concedida
        let result = sqlx::query(
            "UPDATE users
             SET subscription_expires_at = GREATEST(COALESCE(subscription_expires_at, $2), $2)
             WHERE id = $1 AND role = 'owner'",
        )
        .bind(owner_id)
        .bind(expires_at)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }
}
