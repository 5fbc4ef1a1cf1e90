use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::booking::{Booking, BookingFilters, BookingRow, PaymentStatus},
};

const BOOKING_COLUMNS: &str = "id, venue_id, user_id, booking_date, number_of_seats, status, \
                               payment_status, receipt_url, created_at";

const BOOKING_ROW_SELECT: &str = "SELECT b.id, b.venue_id, b.user_id, b.booking_date, \
    b.number_of_seats, b.status, b.payment_status, b.receipt_url, b.created_at, \
    v.name AS venue_name, v.district_id, v.price_per_seat, \
    u.first_name, u.last_name, u.phone_number \
    FROM bookings b \
    JOIN venues v ON v.id = b.venue_id \
    JOIN users u ON u.id = b.user_id";

// Escopo de quem está consultando a listagem de reservas.
pub enum BookingScope {
    All,
    Owner(Uuid),
    Customer(Uuid),
}

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Datas ocupadas do salão: reservas ativas e não rejeitadas. É este
    /// retrato que alimenta o motor de disponibilidade.
    pub async fn active_dates(&self, venue_id: Uuid) -> Result<Vec<NaiveDate>, AppError> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            "SELECT booking_date FROM bookings \
             WHERE venue_id = $1 AND status = 'active' AND payment_status <> 'rejected'",
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(dates)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let maybe_booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_booking)
    }

    // Insere a reserva mapeando a violação do índice único parcial para o
    // erro de disponibilidade: é o banco quem decide corridas entre clientes.
    pub async fn insert(
        &self,
        venue_id: Uuid,
        user_id: Uuid,
        booking_date: NaiveDate,
        number_of_seats: i32,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (venue_id, user_id, booking_date, number_of_seats)
            VALUES ($1, $2, $3, $4)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(venue_id)
        .bind(user_id)
        .bind(booking_date)
        .bind(number_of_seats)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("idx_bookings_venue_date_active")
                {
                    return AppError::DateAlreadyBooked(booking_date);
                }
            }
            e.into()
        })?;

        Ok(booking)
    }

    /// Anexa o comprovante e avança pending -> paid. O WHERE carrega a
    /// pré-condição: zero linhas afetadas significa estado inválido.
    pub async fn attach_receipt(
        &self,
        id: Uuid,
        user_id: Uuid,
        receipt_url: &str,
    ) -> Result<Option<Booking>, AppError> {
        let updated = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings SET payment_status = 'paid', receipt_url = $3
            WHERE id = $1 AND user_id = $2 AND payment_status = 'pending' AND status = 'active'
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(receipt_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    /// Transição de pagamento com a pré-condição no próprio UPDATE.
    pub async fn transition_payment<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> Result<Option<Booking>, AppError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        // Transição fora da máquina de estados nem chega ao banco
        if !from.transition_allowed(to) {
            return Ok(None);
        }

        let updated = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings SET payment_status = $3
            WHERE id = $1 AND payment_status = $2 AND status = 'active'
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(executor)
        .await?;
        Ok(updated)
    }

    pub async fn cancel(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE bookings SET status = 'cancelled' WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BookingNotFound);
        }
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BookingNotFound);
        }
        Ok(())
    }

    pub async fn list(
        &self,
        scope: BookingScope,
        filters: &BookingFilters,
    ) -> Result<Vec<BookingRow>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("{BOOKING_ROW_SELECT} WHERE 1=1"));

        match scope {
            BookingScope::All => {}
            BookingScope::Owner(owner_id) => {
                qb.push(" AND v.owner_id = ").push_bind(owner_id);
            }
            BookingScope::Customer(user_id) => {
                qb.push(" AND b.user_id = ").push_bind(user_id);
            }
        }

        if let Some(date) = filters.date {
            qb.push(" AND b.booking_date = ").push_bind(date);
        }
        if let Some(venue_id) = filters.venue_id {
            qb.push(" AND b.venue_id = ").push_bind(venue_id);
        }
        if let Some(district_id) = filters.district_id {
            qb.push(" AND v.district_id = ").push_bind(district_id);
        }
        if let Some(status) = filters.status {
            qb.push(" AND b.status = ").push_bind(status);
        }
        if let Some(payment_status) = filters.payment_status {
            qb.push(" AND b.payment_status = ").push_bind(payment_status);
        }

        // Lista branca de ordenação; o padrão é a data da festa
        let order = match filters.sort_by.as_deref() {
            Some("created_at") => "b.created_at DESC",
            _ => "b.booking_date ASC",
        };
        qb.push(format!(" ORDER BY {order}"));

        let rows = qb.build_query_as::<BookingRow>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Reservas de um salão (embutidas no detalhe, para o calendário).
    pub async fn list_for_venue(&self, venue_id: Uuid) -> Result<Vec<BookingRow>, AppError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{BOOKING_ROW_SELECT} WHERE b.venue_id = $1 ORDER BY b.booking_date ASC"
        ))
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Agregado mensal das reservas ativas de um dono (assinatura).
    pub async fn monthly_aggregate(
        &self,
        owner_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<MonthlyAggregate, AppError> {
        let aggregate = sqlx::query_as::<_, MonthlyAggregate>(
            r#"
            SELECT COUNT(*) AS booking_count,
                   COALESCE(SUM(b.number_of_seats), 0)::BIGINT AS total_capacity,
                   COALESCE(SUM(b.number_of_seats::BIGINT * v.price_per_seat), 0)::BIGINT AS revenue
            FROM bookings b
            JOIN venues v ON v.id = b.venue_id
            WHERE v.owner_id = $1
              AND b.status = 'active' AND b.payment_status <> 'rejected'
              AND b.booking_date >= $2 AND b.booking_date < $3
            "#,
        )
        .bind(owner_id)
        .bind(period_start)
        .bind(period_end)
        .fetch_one(&self.pool)
        .await?;
        Ok(aggregate)
    }
}

#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct MonthlyAggregate {
    pub booking_count: i64,
    pub total_capacity: i64,
    pub revenue: i64,
}
