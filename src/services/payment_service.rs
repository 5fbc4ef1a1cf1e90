use chrono::{Datelike, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BookingRepository, PaymentRepository, UserRepository, VenueRepository},
    models::{
        auth::User,
        booking::{total_amount, PaymentStatus},
        payment::{
            commission_amount, subscription_amount, CommissionDue, CommissionView,
            PaymentAction, SubscriptionFilters, SubscriptionInfo, SubscriptionPayment,
            SubscriptionStatus,
        },
    },
};

// Taxas e cartão do admin: configuração injetada, lida uma vez no boot.
// Os valores derivados são gravados na criação e nunca recalculados.
#[derive(Clone)]
pub struct PaymentSettings {
    pub admin_card_number: String,
    pub commission_percent: i64,
    pub subscription_percent: i64,
}

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    booking_repo: BookingRepository,
    venue_repo: VenueRepository,
    user_repo: UserRepository,
    settings: PaymentSettings,
    pool: PgPool,
}

/// Resultado da criação da assinatura mensal: ou há um pagamento a fazer,
/// ou o mês não teve reservas e nada é cobrado.
pub enum SubscriptionCreation {
    Created(SubscriptionPayment),
    NothingToCharge,
}

impl PaymentService {
    pub fn new(
        payment_repo: PaymentRepository,
        booking_repo: BookingRepository,
        venue_repo: VenueRepository,
        user_repo: UserRepository,
        settings: PaymentSettings,
        pool: PgPool,
    ) -> Self {
        Self { payment_repo, booking_repo, venue_repo, user_repo, settings, pool }
    }

    /// Dono confirma ou rejeita o pagamento de uma reserva em estado `paid`.
    /// Confirmar cria EXATAMENTE uma comissão, na mesma transação, e devolve
    /// as instruções de pagamento para o dono.
    pub async fn review_booking_payment(
        &self,
        owner: &User,
        booking_id: Uuid,
        action: PaymentAction,
    ) -> Result<Option<CommissionDue>, AppError> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or(AppError::BookingNotFound)?;

        let venue = self
            .venue_repo
            .find_by_id(booking.venue_id)
            .await?
            .ok_or(AppError::VenueNotFound)?;

        // A reserva precisa ser de um salão deste dono
        if venue.owner_id != Some(owner.id) {
            return Err(AppError::Forbidden);
        }

        match action {
            PaymentAction::Confirm => {
                // --- INÍCIO DA TRANSAÇÃO ---
                let mut tx = self.pool.begin().await?;

                let confirmed = self
                    .booking_repo
                    .transition_payment(&mut *tx, booking_id, PaymentStatus::Paid, PaymentStatus::Confirmed)
                    .await?
                    .ok_or_else(|| {
                        AppError::InvalidState(
                            "Só é possível confirmar pagamentos com comprovante enviado.".into(),
                        )
                    })?;

                let amount = commission_amount(
                    total_amount(confirmed.number_of_seats, venue.price_per_seat),
                    self.settings.commission_percent,
                );

                self.payment_repo
                    .insert_commission(
                        &mut *tx,
                        booking_id,
                        owner.id,
                        amount,
                        &self.settings.admin_card_number,
                    )
                    .await?;

                // Se falhar aqui, a confirmação da reserva é desfeita junto
                tx.commit().await?;
                // --- FIM DA TRANSAÇÃO ---

                Ok(Some(CommissionDue {
                    commission_amount: amount,
                    admin_card_number: self.settings.admin_card_number.clone(),
                }))
            }
            PaymentAction::Reject => {
                self.booking_repo
                    .transition_payment(&self.pool, booking_id, PaymentStatus::Paid, PaymentStatus::Rejected)
                    .await?
                    .ok_or_else(|| {
                        AppError::InvalidState(
                            "Só é possível rejeitar pagamentos com comprovante enviado.".into(),
                        )
                    })?;
                Ok(None)
            }
        }
    }

    pub async fn list_commissions(&self, owner_id: Uuid) -> Result<Vec<CommissionView>, AppError> {
        let rows = self.payment_repo.list_commissions_for_owner(owner_id).await?;
        Ok(rows.into_iter().map(CommissionView::from).collect())
    }

    pub async fn attach_commission_receipt(
        &self,
        owner_id: Uuid,
        payment_id: Uuid,
        receipt_url: &str,
    ) -> Result<(), AppError> {
        let updated = self
            .payment_repo
            .attach_commission_receipt(payment_id, owner_id, receipt_url)
            .await?;
        if !updated {
            return Err(AppError::InvalidState(
                "Esta comissão não está pendente ou já tem comprovante.".into(),
            ));
        }
        Ok(())
    }

    /// Resumo da assinatura do mês corrente para a tela do dono.
    pub async fn subscription_info(&self, owner: &User) -> Result<SubscriptionInfo, AppError> {
        let today = Utc::now().date_naive();
        let (month, year) = (today.month(), today.year());
        let (period_start, period_end) = period_bounds(year, month);

        let aggregate =
            self.booking_repo.monthly_aggregate(owner.id, period_start, period_end).await?;
        let amount = subscription_amount(aggregate.revenue, self.settings.subscription_percent);

        let current_subscription =
            self.payment_repo.find_subscription(owner.id, month as i32, year).await?;

        Ok(SubscriptionInfo {
            current_month: month,
            current_year: year,
            booking_count: aggregate.booking_count,
            total_capacity: aggregate.total_capacity,
            admin_rate: self.settings.subscription_percent,
            subscription_amount: amount,
            subscription_expires_at: owner.subscription_expires_at,
            is_expired: owner.subscription_expires_at.is_none_or(|d| d < today),
            current_subscription,
        })
    }

    /// Cria a assinatura do mês corrente. Idempotente no sentido de recusar
    /// duplicatas para o mesmo (dono, mês, ano); mês sem reservas não gera
    /// cobrança nenhuma.
    pub async fn create_monthly_subscription(
        &self,
        owner: &User,
    ) -> Result<SubscriptionCreation, AppError> {
        let today = Utc::now().date_naive();
        let (month, year) = (today.month(), today.year());

        if self.payment_repo.find_subscription(owner.id, month as i32, year).await?.is_some() {
            return Err(AppError::SubscriptionAlreadyExists);
        }

        let (period_start, period_end) = period_bounds(year, month);
        let aggregate =
            self.booking_repo.monthly_aggregate(owner.id, period_start, period_end).await?;
        let amount = subscription_amount(aggregate.revenue, self.settings.subscription_percent);

        if aggregate.booking_count == 0 || amount == 0 {
            return Ok(SubscriptionCreation::NothingToCharge);
        }

        let subscription = self
            .payment_repo
            .insert_subscription(
                owner.id,
                month as i32,
                year,
                aggregate.booking_count as i32,
                aggregate.total_capacity as i32,
                amount,
                &self.settings.admin_card_number,
            )
            .await?;

        Ok(SubscriptionCreation::Created(subscription))
    }

    pub async fn list_owner_subscriptions(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<SubscriptionPayment>, AppError> {
        self.payment_repo.list_subscriptions_for_owner(owner_id).await
    }

    pub async fn list_subscriptions(
        &self,
        filters: &SubscriptionFilters,
    ) -> Result<Vec<SubscriptionPayment>, AppError> {
        self.payment_repo.list_subscriptions(filters).await
    }

    pub async fn attach_subscription_receipt(
        &self,
        owner_id: Uuid,
        subscription_id: Uuid,
        receipt_url: &str,
    ) -> Result<SubscriptionPayment, AppError> {
        self.payment_repo
            .attach_subscription_receipt(subscription_id, owner_id, receipt_url)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(
                    "O comprovante só pode ser anexado com a assinatura pendente.".into(),
                )
            })
    }

    /// Admin confirma ou rejeita o pagamento de assinatura em estado `paid`.
    /// Confirmar estende a validade da assinatura do dono até o fim do mês
    /// pago, na mesma transação.
    pub async fn review_subscription_payment(
        &self,
        subscription_id: Uuid,
        action: PaymentAction,
    ) -> Result<SubscriptionPayment, AppError> {
        self.payment_repo
            .find_subscription_by_id(subscription_id)
            .await?
            .ok_or(AppError::PaymentNotFound)?;

        match action {
            PaymentAction::Confirm => {
                let mut tx = self.pool.begin().await?;

                let subscription = self
                    .payment_repo
                    .transition_subscription(
                        &mut *tx,
                        subscription_id,
                        SubscriptionStatus::Paid,
                        SubscriptionStatus::Confirmed,
                    )
                    .await?
                    .ok_or_else(|| {
                        AppError::InvalidState(
                            "Só é possível confirmar assinaturas com comprovante enviado.".into(),
                        )
                    })?;

                let expires_at =
                    subscription_expiry(subscription.year, subscription.month as u32);
                self.user_repo
                    .set_subscription_expiry(&mut *tx, subscription.owner_id, expires_at)
                    .await?;

                tx.commit().await?;
                Ok(subscription)
            }
            PaymentAction::Reject => self
                .payment_repo
                .transition_subscription(
                    &self.pool,
                    subscription_id,
                    SubscriptionStatus::Paid,
                    SubscriptionStatus::Rejected,
                )
                .await?
                .ok_or_else(|| {
                    AppError::InvalidState(
                        "Só é possível rejeitar assinaturas com comprovante enviado.".into(),
                    )
                }),
        }
    }
}

/// Limites [início, fim) do mês no calendário.
fn period_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let start = first_of_month(year, month);
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    (start, first_of_month(next_year, next_month))
}

/// Assinatura do mês (m, a) confirmada cobre o mês inteiro: vale até o
/// primeiro dia do mês seguinte.
fn subscription_expiry(year: i32, month: u32) -> NaiveDate {
    period_bounds(year, month).1
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // month está sempre em 1..=12 aqui
    NaiveDate::from_ymd_opt(year, month, 1).expect("mês válido")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limites_do_periodo_mensal() {
        let (inicio, fim) = period_bounds(2025, 6);
        assert_eq!(inicio, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(fim, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    }

    #[test]
    fn periodo_vira_o_ano_em_dezembro() {
        let (inicio, fim) = period_bounds(2025, 12);
        assert_eq!(inicio, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(fim, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn validade_cobre_o_mes_pago() {
        assert_eq!(
            subscription_expiry(2025, 6),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
        );
    }

    #[test]
    fn confirmar_mes_antigo_nao_encurta_a_validade() {
        // Julho foi confirmado primeiro; a confirmação tardia de junho gera
        // uma validade anterior, que o GREATEST do UPDATE descarta
        let validade_julho = subscription_expiry(2025, 7);
        let validade_junho = subscription_expiry(2025, 6);

        assert!(validade_junho < validade_julho);
        assert_eq!(validade_junho.max(validade_julho), validade_julho);
    }
}
