use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::district::district_name;

// Estados de pagamento de uma reserva. As transições são monotônicas e em
// sentido único: pending -> paid -> {confirmed | rejected}. Uma reserva
// rejeitada não ressuscita; o cliente cria uma nova.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Confirmed,
    Rejected,
}

impl PaymentStatus {
    pub fn transition_allowed(self, to: PaymentStatus) -> bool {
        matches!(
            (self, to),
            (PaymentStatus::Pending, PaymentStatus::Paid)
                | (PaymentStatus::Paid, PaymentStatus::Confirmed)
                | (PaymentStatus::Paid, PaymentStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub user_id: Uuid,
    pub booking_date: NaiveDate,
    pub number_of_seats: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    // Uma reserva "ativa" é a que ocupa a sua data no calendário.
    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active && self.payment_status != PaymentStatus::Rejected
    }

    // Cancelável apenas no futuro e antes da confirmação do pagamento.
    pub fn can_cancel(&self, today: NaiveDate) -> bool {
        self.booking_date > today
            && matches!(self.payment_status, PaymentStatus::Pending | PaymentStatus::Paid)
            && self.status == BookingStatus::Active
    }
}

pub fn total_amount(number_of_seats: i32, price_per_seat: i64) -> i64 {
    i64::from(number_of_seats) * price_per_seat
}

// O pedido nunca pode exceder a capacidade do salão.
pub fn seats_within_capacity(number_of_seats: i32, capacity: i32) -> bool {
    number_of_seats <= capacity
}

// Linha de reserva com os dados de salão e cliente já juntados (JOIN).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub user_id: Uuid,
    pub booking_date: NaiveDate,
    pub number_of_seats: i32,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub venue_name: String,
    pub district_id: i32,
    pub price_per_seat: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

// Projeção devolvida nas listagens: distrito resolvido e valor total derivado.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingView {
    pub booking_id: Uuid,
    pub venue_id: Uuid,
    pub venue_name: String,
    pub district_name: Option<&'static str>,
    pub booking_date: NaiveDate,
    pub number_of_seats: i32,
    pub price_per_seat: i64,
    pub total_amount: i64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_receipt_url: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookingRow> for BookingView {
    fn from(row: BookingRow) -> Self {
        Self {
            booking_id: row.id,
            venue_id: row.venue_id,
            venue_name: row.venue_name,
            district_name: district_name(row.district_id),
            booking_date: row.booking_date,
            number_of_seats: row.number_of_seats,
            price_per_seat: row.price_per_seat,
            total_amount: total_amount(row.number_of_seats, row.price_per_seat),
            status: row.status,
            payment_status: row.payment_status,
            payment_receipt_url: row.receipt_url,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingPayload {
    pub venue_id: Uuid,
    pub booking_date: NaiveDate,
    #[validate(range(min = 1, message = "O número de lugares deve ser positivo."))]
    pub number_of_seats: i32,
}

// Resposta da criação: inclui o cartão do dono e o valor total para que o
// cliente faça o pagamento manual e depois envie o comprovante.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingCreated {
    pub booking_id: Uuid,
    pub venue_id: Uuid,
    pub booking_date: NaiveDate,
    pub number_of_seats: i32,
    pub total_amount: i64,
    pub payment_status: PaymentStatus,
    pub owner_card_number: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookingFilters {
    pub date: Option<NaiveDate>,
    pub venue_id: Option<Uuid>,
    pub district_id: Option<i32>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub sort_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::TypeInfo;

    fn booking(date: NaiveDate, payment_status: PaymentStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            venue_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            booking_date: date,
            number_of_seats: 10,
            status: BookingStatus::Active,
            payment_status,
            receipt_url: None,
            created_at: Utc::now(),
        }
    }

    fn d(y: i32, m: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, dia).unwrap()
    }

    #[test]
    fn transicoes_validas_de_pagamento() {
        assert!(PaymentStatus::Pending.transition_allowed(PaymentStatus::Paid));
        assert!(PaymentStatus::Paid.transition_allowed(PaymentStatus::Confirmed));
        assert!(PaymentStatus::Paid.transition_allowed(PaymentStatus::Rejected));
    }

    #[test]
    fn nao_pula_nem_volta_estado() {
        // Confirmar/rejeitar direto de pending (pulando paid) é inválido
        assert!(!PaymentStatus::Pending.transition_allowed(PaymentStatus::Confirmed));
        assert!(!PaymentStatus::Pending.transition_allowed(PaymentStatus::Rejected));
        // Estados terminais não transicionam
        assert!(!PaymentStatus::Confirmed.transition_allowed(PaymentStatus::Paid));
        assert!(!PaymentStatus::Rejected.transition_allowed(PaymentStatus::Paid));
        assert!(!PaymentStatus::Paid.transition_allowed(PaymentStatus::Pending));
    }

    #[test]
    fn cancelamento_somente_futuro_e_nao_confirmado() {
        let hoje = d(2025, 6, 10);

        assert!(booking(d(2025, 6, 15), PaymentStatus::Pending).can_cancel(hoje));
        assert!(booking(d(2025, 6, 15), PaymentStatus::Paid).can_cancel(hoje));

        // Já confirmada ou rejeitada: não cancela
        assert!(!booking(d(2025, 6, 15), PaymentStatus::Confirmed).can_cancel(hoje));
        assert!(!booking(d(2025, 6, 15), PaymentStatus::Rejected).can_cancel(hoje));

        // Data de hoje ou passada: não cancela
        assert!(!booking(d(2025, 6, 10), PaymentStatus::Pending).can_cancel(hoje));
        assert!(!booking(d(2025, 6, 9), PaymentStatus::Paid).can_cancel(hoje));
    }

    #[test]
    fn reserva_rejeitada_nao_ocupa_data() {
        let b = booking(d(2025, 6, 15), PaymentStatus::Rejected);
        assert!(!b.is_active());

        let mut cancelada = booking(d(2025, 6, 15), PaymentStatus::Pending);
        cancelada.status = BookingStatus::Cancelled;
        assert!(!cancelada.is_active());
    }

    #[test]
    fn valor_total_derivado() {
        // 10 lugares a 50000 so'm
        assert_eq!(total_amount(10, 50_000), 500_000);
        assert_eq!(total_amount(1, 1), 1);
    }

    #[test]
    fn pedido_limitado_pela_capacidade() {
        assert!(seats_within_capacity(99, 100));
        assert!(seats_within_capacity(100, 100));
        assert!(!seats_within_capacity(101, 100));
    }

    #[test]
    fn enums_de_status_mapeiam_para_text() {
        use sqlx::{Postgres, Type};

        // As colunas de status são TEXT no banco; o tipo declarado no bind
        // precisa resolver para TEXT, não para um tipo com o nome do enum.
        assert_eq!(<PaymentStatus as Type<Postgres>>::type_info().name(), "TEXT");
        assert_eq!(<BookingStatus as Type<Postgres>>::type_info().name(), "TEXT");
        assert_eq!(<crate::models::auth::Role as Type<Postgres>>::type_info().name(), "TEXT");
        assert_eq!(
            <crate::models::venue::VenueStatus as Type<Postgres>>::type_info().name(),
            "TEXT"
        );
        assert_eq!(
            <crate::models::payment::CommissionStatus as Type<Postgres>>::type_info().name(),
            "TEXT"
        );
        assert_eq!(
            <crate::models::payment::SubscriptionStatus as Type<Postgres>>::type_info().name(),
            "TEXT"
        );
    }
}
