use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::district::district_name;

// Comissão devida pelo dono ao admin após a confirmação de uma reserva.
// Não há etapa "paid" aqui: o dono anexa o comprovante e o registro segue
// pendente até a conferência fora do sistema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    Pending,
    Confirmed,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Pending,
    Paid,
    Confirmed,
    Rejected,
}

impl SubscriptionStatus {
    // Mesma máquina de estados monotônica das reservas.
    pub fn transition_allowed(self, to: SubscriptionStatus) -> bool {
        matches!(
            (self, to),
            (SubscriptionStatus::Pending, SubscriptionStatus::Paid)
                | (SubscriptionStatus::Paid, SubscriptionStatus::Confirmed)
                | (SubscriptionStatus::Paid, SubscriptionStatus::Rejected)
        )
    }
}

// Linha de comissão com os dados da reserva de origem (JOIN para a listagem
// do dono).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommissionRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: i64,
    pub admin_card_number: String,
    pub status: CommissionStatus,
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub venue_name: String,
    pub district_id: i32,
    pub booking_date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommissionView {
    pub payment_id: Uuid,
    pub booking_id: Uuid,
    pub amount: i64,
    pub admin_card_number: String,
    pub status: CommissionStatus,
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub venue_name: String,
    pub district_name: Option<&'static str>,
    pub booking_date: NaiveDate,
    pub first_name: String,
    pub last_name: String,
}

impl From<CommissionRow> for CommissionView {
    fn from(row: CommissionRow) -> Self {
        Self {
            payment_id: row.id,
            booking_id: row.booking_id,
            amount: row.amount,
            admin_card_number: row.admin_card_number,
            status: row.status,
            receipt_url: row.receipt_url,
            created_at: row.created_at,
            venue_name: row.venue_name,
            district_name: district_name(row.district_id),
            booking_date: row.booking_date,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct SubscriptionPayment {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub total_bookings: i32,
    pub total_capacity: i32,
    pub subscription_amount: i64,
    pub admin_card_number: String,
    pub status: SubscriptionStatus,
    pub receipt_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Resumo exibido na tela "Oylik Obuna" do dono.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriptionInfo {
    pub current_month: u32,
    pub current_year: i32,
    pub booking_count: i64,
    pub total_capacity: i64,
    pub admin_rate: i64,
    pub subscription_amount: i64,
    pub subscription_expires_at: Option<NaiveDate>,
    pub is_expired: bool,
    pub current_subscription: Option<SubscriptionPayment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentAction {
    Confirm,
    Reject,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentActionPayload {
    pub action: PaymentAction,
}

// Resposta da confirmação de pagamento de reserva: instruções para o dono
// pagar a comissão ao admin.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommissionDue {
    pub commission_amount: i64,
    pub admin_card_number: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SubscriptionFilters {
    pub status: Option<SubscriptionStatus>,
}

/// Comissão derivada uma única vez, na confirmação da reserva.
pub fn commission_amount(booking_total: i64, commission_percent: i64) -> i64 {
    booking_total * commission_percent / 100
}

/// Valor da assinatura mensal: percentual sobre a receita agregada das
/// reservas ativas do dono no período.
pub fn subscription_amount(monthly_revenue: i64, subscription_percent: i64) -> i64 {
    monthly_revenue * subscription_percent / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comissao_de_dez_por_cento_sobre_o_total() {
        // 10 lugares a 50000 -> total 500000; 10% -> 50000
        let total = crate::models::booking::total_amount(10, 50_000);
        assert_eq!(total, 500_000);
        assert_eq!(commission_amount(total, 10), 50_000);
    }

    #[test]
    fn comissao_trunca_para_baixo() {
        assert_eq!(commission_amount(999, 10), 99);
        assert_eq!(commission_amount(0, 10), 0);
    }

    #[test]
    fn assinatura_percentual_da_receita() {
        assert_eq!(subscription_amount(2_000_000, 5), 100_000);
        assert_eq!(subscription_amount(0, 5), 0);
    }

    #[test]
    fn transicoes_de_assinatura() {
        assert!(SubscriptionStatus::Pending.transition_allowed(SubscriptionStatus::Paid));
        assert!(SubscriptionStatus::Paid.transition_allowed(SubscriptionStatus::Confirmed));
        assert!(SubscriptionStatus::Paid.transition_allowed(SubscriptionStatus::Rejected));
        assert!(!SubscriptionStatus::Pending.transition_allowed(SubscriptionStatus::Confirmed));
        assert!(!SubscriptionStatus::Confirmed.transition_allowed(SubscriptionStatus::Paid));
    }
}
