use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{
        CommissionRow, SubscriptionFilters, SubscriptionPayment, SubscriptionStatus,
    },
};

const COMMISSION_COLUMNS: &str =
    "id, booking_id, owner_id, amount, admin_card_number, status, receipt_url, created_at";

const SUBSCRIPTION_COLUMNS: &str = "id, owner_id, month, year, total_bookings, total_capacity, \
    subscription_amount, admin_card_number, status, receipt_url, created_at";

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Comissões ---

    /// Insere a comissão derivada na confirmação do pagamento de uma reserva.
    /// Roda dentro da MESMA transação que confirma a reserva.
    pub async fn insert_commission<'e, E>(
        &self,
        executor: E,
        booking_id: Uuid,
        owner_id: Uuid,
        amount: i64,
        admin_card_number: &str,
    ) -> Result<Uuid, AppError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO commission_payments (booking_id, owner_id, amount, admin_card_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(booking_id)
        .bind(owner_id)
        .bind(amount)
        .bind(admin_card_number)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn list_commissions_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<CommissionRow>, AppError> {
        let rows = sqlx::query_as::<_, CommissionRow>(
            r#"
            SELECT c.id, c.booking_id, c.amount, c.admin_card_number, c.status,
                   c.receipt_url, c.created_at,
                   v.name AS venue_name, v.district_id, b.booking_date,
                   u.first_name, u.last_name
            FROM commission_payments c
            JOIN bookings b ON b.id = c.booking_id
            JOIN venues v ON v.id = b.venue_id
            JOIN users u ON u.id = b.user_id
            WHERE c.owner_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Anexa o comprovante da comissão. Só enquanto pendente e sem
    /// comprovante anterior; a comissão segue pendente após o anexo.
    pub async fn attach_commission_receipt(
        &self,
        id: Uuid,
        owner_id: Uuid,
        receipt_url: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE commission_payments SET receipt_url = $3 \
             WHERE id = $1 AND owner_id = $2 AND status = 'pending' AND receipt_url IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .bind(receipt_url)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Assinaturas mensais ---

    pub async fn find_subscription(
        &self,
        owner_id: Uuid,
        month: i32,
        year: i32,
    ) -> Result<Option<SubscriptionPayment>, AppError> {
        let maybe = sqlx::query_as::<_, SubscriptionPayment>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscription_payments \
             WHERE owner_id = $1 AND month = $2 AND year = $3"
        ))
        .bind(owner_id)
        .bind(month)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn find_subscription_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<SubscriptionPayment>, AppError> {
        let maybe = sqlx::query_as::<_, SubscriptionPayment>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscription_payments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_subscription(
        &self,
        owner_id: Uuid,
        month: i32,
        year: i32,
        total_bookings: i32,
        total_capacity: i32,
        subscription_amount: i64,
        admin_card_number: &str,
    ) -> Result<SubscriptionPayment, AppError> {
        let subscription = sqlx::query_as::<_, SubscriptionPayment>(&format!(
            r#"
            INSERT INTO subscription_payments
                (owner_id, month, year, total_bookings, total_capacity, subscription_amount, admin_card_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(month)
        .bind(year)
        .bind(total_bookings)
        .bind(total_capacity)
        .bind(subscription_amount)
        .bind(admin_card_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("subscription_payments_owner_period_key")
                {
                    return AppError::SubscriptionAlreadyExists;
                }
            }
            e.into()
        })?;
        Ok(subscription)
    }

    pub async fn list_subscriptions_for_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<SubscriptionPayment>, AppError> {
        let rows = sqlx::query_as::<_, SubscriptionPayment>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscription_payments \
             WHERE owner_id = $1 ORDER BY year DESC, month DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Listagem do admin, com filtro de status.
    pub async fn list_subscriptions(
        &self,
        filters: &SubscriptionFilters,
    ) -> Result<Vec<SubscriptionPayment>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscription_payments WHERE 1=1"
        ));
        if let Some(status) = filters.status {
            qb.push(" AND status = ").push_bind(status);
        }
        qb.push(" ORDER BY year DESC, month DESC, created_at DESC");

        let rows = qb.build_query_as::<SubscriptionPayment>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Anexa comprovante da assinatura: pending -> paid.
    pub async fn attach_subscription_receipt(
        &self,
        id: Uuid,
        owner_id: Uuid,
        receipt_url: &str,
    ) -> Result<Option<SubscriptionPayment>, AppError> {
        let updated = sqlx::query_as::<_, SubscriptionPayment>(&format!(
            r#"
            UPDATE subscription_payments SET status = 'paid', receipt_url = $3
            WHERE id = $1 AND owner_id = $2 AND status = 'pending'
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(receipt_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    /// Transição de status da assinatura com a pré-condição no UPDATE.
    pub async fn transition_subscription<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        from: SubscriptionStatus,
        to: SubscriptionStatus,
    ) -> Result<Option<SubscriptionPayment>, AppError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        // Transição fora da máquina de estados nem chega ao banco
        if !from.transition_allowed(to) {
            return Ok(None);
        }

        let updated = sqlx::query_as::<_, SubscriptionPayment>(&format!(
            r#"
            UPDATE subscription_payments SET status = $3
            WHERE id = $1 AND status = $2
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(executor)
        .await?;
        Ok(updated)
    }
}
