use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::venue::{CreateVenuePayload, Venue, VenueFilters},
};

const VENUE_COLUMNS: &str = "id, name, district_id, address, capacity, price_per_seat, \
                             phone_number, status, owner_id, created_at";

// Linha da projeção do cliente: o salão mais o contexto necessário para
// calcular o venue_status (assinatura do dono e reserva do próprio usuário).
#[derive(Debug, sqlx::FromRow)]
pub struct CustomerVenueRow {
    #[sqlx(flatten)]
    pub venue: Venue,
    pub owner_subscription_expires_at: Option<NaiveDate>,
    pub user_booked: bool,
}

#[derive(Clone)]
pub struct VenueRepository {
    pool: PgPool,
}

impl VenueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Venue>, AppError> {
        let maybe_venue =
            sqlx::query_as::<_, Venue>(&format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_venue)
    }

    pub async fn create(
        &self,
        payload: &CreateVenuePayload,
        owner_id: Uuid,
    ) -> Result<Venue, AppError> {
        let venue = sqlx::query_as::<_, Venue>(&format!(
            r#"
            INSERT INTO venues (name, district_id, address, capacity, price_per_seat, phone_number, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {VENUE_COLUMNS}
            "#
        ))
        .bind(&payload.name)
        .bind(payload.district_id)
        .bind(&payload.address)
        .bind(payload.capacity)
        .bind(payload.price_per_seat)
        .bind(&payload.phone_number)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(venue)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &CreateVenuePayload,
    ) -> Result<Venue, AppError> {
        let venue = sqlx::query_as::<_, Venue>(&format!(
            r#"
            UPDATE venues
            SET name = $2, district_id = $3, address = $4, capacity = $5,
                price_per_seat = $6, phone_number = $7
            WHERE id = $1
            RETURNING {VENUE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&payload.name)
        .bind(payload.district_id)
        .bind(&payload.address)
        .bind(payload.capacity)
        .bind(payload.price_per_seat)
        .bind(&payload.phone_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::VenueNotFound)?;
        Ok(venue)
    }

    pub async fn confirm(&self, id: Uuid) -> Result<Venue, AppError> {
        let venue = sqlx::query_as::<_, Venue>(&format!(
            "UPDATE venues SET status = 'confirmed' WHERE id = $1 RETURNING {VENUE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::VenueNotFound)?;
        Ok(venue)
    }

    pub async fn assign_owner(&self, id: Uuid, owner_id: Uuid) -> Result<Venue, AppError> {
        let venue = sqlx::query_as::<_, Venue>(&format!(
            "UPDATE venues SET owner_id = $2 WHERE id = $1 RETURNING {VENUE_COLUMNS}"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::VenueNotFound)?;
        Ok(venue)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::VenueNotFound);
        }
        Ok(())
    }

    // Listagem com os filtros das telas de admin/dono. O escopo é sempre
    // aplicado pelo chamador: admin vê tudo, dono só os próprios salões.
    pub async fn list(
        &self,
        filters: &VenueFilters,
        owner_id: Option<Uuid>,
    ) -> Result<Vec<Venue>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {VENUE_COLUMNS} FROM venues WHERE 1=1"));

        if let Some(owner_id) = owner_id {
            qb.push(" AND owner_id = ").push_bind(owner_id);
        }
        if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND name ILIKE ").push_bind(format!("%{}%", search));
        }
        if let Some(district_id) = filters.district_id {
            qb.push(" AND district_id = ").push_bind(district_id);
        }
        if let Some(status) = filters.status {
            qb.push(" AND status = ").push_bind(status);
        }

        push_order_clause(&mut qb, filters);

        let venues = qb.build_query_as::<Venue>().fetch_all(&self.pool).await?;
        Ok(venues)
    }

    // Projeção do cliente: apenas salões confirmados, com o contexto da
    // assinatura do dono e se o próprio usuário já tem reserva ativa lá.
    pub async fn list_for_customer(
        &self,
        user_id: Uuid,
        filters: &VenueFilters,
    ) -> Result<Vec<CustomerVenueRow>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT v.id, v.name, v.district_id, v.address, v.capacity, v.price_per_seat, \
             v.phone_number, v.status, v.owner_id, v.created_at, \
             u.subscription_expires_at AS owner_subscription_expires_at, \
             EXISTS(SELECT 1 FROM bookings b WHERE b.venue_id = v.id AND b.user_id = ",
        );
        qb.push_bind(user_id);
        qb.push(
            " AND b.status = 'active' AND b.payment_status <> 'rejected') AS user_booked \
             FROM venues v LEFT JOIN users u ON u.id = v.owner_id \
             WHERE v.status = 'confirmed'",
        );

        if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND v.name ILIKE ").push_bind(format!("%{}%", search));
        }
        if let Some(district_id) = filters.district_id {
            qb.push(" AND v.district_id = ").push_bind(district_id);
        }

        push_order_clause_prefixed(&mut qb, filters, "v.");

        let rows = qb.build_query_as::<CustomerVenueRow>().fetch_all(&self.pool).await?;
        Ok(rows)
    }
}

// Ordenação com lista branca de colunas: o sort_by vem da URL e jamais é
// interpolado diretamente no SQL.
fn sort_column(filters: &VenueFilters) -> &'static str {
    match filters.sort_by.as_deref() {
        Some("price_per_seat") => "price_per_seat",
        Some("capacity") => "capacity",
        _ => "created_at",
    }
}

fn sort_direction(filters: &VenueFilters) -> &'static str {
    match filters.order.as_deref() {
        Some("desc") => "DESC",
        _ => "ASC",
    }
}

fn push_order_clause(qb: &mut QueryBuilder<'_, Postgres>, filters: &VenueFilters) {
    push_order_clause_prefixed(qb, filters, "");
}

fn push_order_clause_prefixed(
    qb: &mut QueryBuilder<'_, Postgres>,
    filters: &VenueFilters,
    prefix: &str,
) {
    qb.push(format!(" ORDER BY {}{} {}", prefix, sort_column(filters), sort_direction(filters)));
}
