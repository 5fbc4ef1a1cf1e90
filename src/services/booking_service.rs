use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{booking_repo::BookingScope, BookingRepository, UserRepository, VenueRepository},
    models::{
        booking::{
            seats_within_capacity, total_amount, Booking, BookingCreated, BookingFilters,
            BookingView, CreateBookingPayload,
        },
        venue::VenueStatus,
    },
    services::availability::{check_bookable, DateConflict},
};

#[derive(Clone)]
pub struct BookingService {
    booking_repo: BookingRepository,
    venue_repo: VenueRepository,
    user_repo: UserRepository,
}

impl BookingService {
    pub fn new(
        booking_repo: BookingRepository,
        venue_repo: VenueRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self { booking_repo, venue_repo, user_repo }
    }

    /// Cria a reserva do cliente. Valida capacidade e disponibilidade ANTES
    /// de escrever; a corrida entre dois clientes na mesma data é decidida
    /// pelo índice único do banco, não por esta checagem.
    pub async fn create(
        &self,
        user_id: Uuid,
        payload: &CreateBookingPayload,
    ) -> Result<BookingCreated, AppError> {
        let venue = self
            .venue_repo
            .find_by_id(payload.venue_id)
            .await?
            .ok_or(AppError::VenueNotFound)?;

        // Cliente só enxerga (e reserva) salão confirmado
        if venue.status != VenueStatus::Confirmed {
            return Err(AppError::VenueNotFound);
        }

        if !seats_within_capacity(payload.number_of_seats, venue.capacity) {
            return Err(AppError::SeatsExceedCapacity(venue.capacity));
        }

        // O pagamento é manual: sem dono com cartão não há como pagar
        let owner_id = venue.owner_id.ok_or_else(|| {
            AppError::InvalidState("Este salão ainda não tem dono atribuído.".into())
        })?;
        let owner = self.user_repo.find_by_id(owner_id).await?.ok_or(AppError::UserNotFound)?;
        let owner_card_number = owner.card_number.ok_or_else(|| {
            AppError::InvalidState("O dono deste salão ainda não cadastrou um cartão.".into())
        })?;

        // Retrato atual da ocupação, normalizado para dias
        let today = Utc::now().date_naive();
        let booked: HashSet<_> = self.booking_repo.active_dates(venue.id).await?.into_iter().collect();

        check_bookable(payload.booking_date, today, &booked).map_err(|conflict| match conflict {
            DateConflict::Past => AppError::DateInPast(payload.booking_date),
            DateConflict::Booked => AppError::DateAlreadyBooked(payload.booking_date),
        })?;

        let booking = self
            .booking_repo
            .insert(venue.id, user_id, payload.booking_date, payload.number_of_seats)
            .await?;

        Ok(BookingCreated {
            booking_id: booking.id,
            venue_id: venue.id,
            booking_date: booking.booking_date,
            number_of_seats: booking.number_of_seats,
            total_amount: total_amount(booking.number_of_seats, venue.price_per_seat),
            payment_status: booking.payment_status,
            owner_card_number,
        })
    }

    /// Anexa o comprovante do cliente: pending -> paid. A pré-condição fica
    /// no UPDATE; se nada foi alterado o estado atual não permitia o anexo.
    pub async fn attach_receipt(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        receipt_url: &str,
    ) -> Result<Booking, AppError> {
        self.booking_repo
            .attach_receipt(booking_id, user_id, receipt_url)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState(
                    "O comprovante só pode ser anexado com o pagamento pendente.".into(),
                )
            })
    }

    /// Cancelamento pelo cliente: só reserva futura e ainda não confirmada.
    pub async fn cancel(&self, user_id: Uuid, booking_id: Uuid) -> Result<(), AppError> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or(AppError::BookingNotFound)?;

        let today = Utc::now().date_naive();
        cancellation_check(&booking, user_id, today)?;

        self.booking_repo.cancel(booking_id).await
    }

    pub async fn list(
        &self,
        scope: BookingScope,
        filters: &BookingFilters,
    ) -> Result<Vec<BookingView>, AppError> {
        let rows = self.booking_repo.list(scope, filters).await?;
        Ok(rows.into_iter().map(BookingView::from).collect())
    }

    /// Remoção administrativa (hard delete), sem as regras de cancelamento.
    pub async fn delete(&self, booking_id: Uuid) -> Result<(), AppError> {
        self.booking_repo.delete(booking_id).await
    }
}

// Regras de cancelamento, separadas para serem testáveis sem banco.
fn cancellation_check(booking: &Booking, user_id: Uuid, today: NaiveDate) -> Result<(), AppError> {
    if booking.user_id != user_id {
        return Err(AppError::Forbidden);
    }

    // Cancelada ou rejeitada já não ocupa a data; cancelar de novo é um
    // conflito de estado, não uma reserva inexistente
    if !booking.is_active() {
        return Err(AppError::InvalidState("Esta reserva já foi cancelada ou rejeitada.".into()));
    }

    if !booking.can_cancel(today) {
        return Err(AppError::InvalidState(
            "Só é possível cancelar reservas futuras com pagamento pendente ou enviado.".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{BookingStatus, PaymentStatus};

    fn booking(user_id: Uuid, payment_status: PaymentStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            venue_id: Uuid::new_v4(),
            user_id,
            booking_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            number_of_seats: 10,
            status: BookingStatus::Active,
            payment_status,
            receipt_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn cancela_reserva_futura_do_proprio_cliente() {
        let cliente = Uuid::new_v4();
        let hoje = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        let b = booking(cliente, PaymentStatus::Pending);
        assert!(cancellation_check(&b, cliente, hoje).is_ok());
    }

    #[test]
    fn reserva_de_outro_cliente_e_proibida() {
        let hoje = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        let b = booking(Uuid::new_v4(), PaymentStatus::Pending);
        let outro = Uuid::new_v4();
        assert!(matches!(cancellation_check(&b, outro, hoje), Err(AppError::Forbidden)));
    }

    #[test]
    fn reserva_inativa_da_conflito_de_estado() {
        let cliente = Uuid::new_v4();
        let hoje = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        // Rejeitada: o estado impede o cancelamento, mas a reserva existe
        let rejeitada = booking(cliente, PaymentStatus::Rejected);
        assert!(matches!(
            cancellation_check(&rejeitada, cliente, hoje),
            Err(AppError::InvalidState(_))
        ));

        // Já cancelada antes
        let mut cancelada = booking(cliente, PaymentStatus::Pending);
        cancelada.status = BookingStatus::Cancelled;
        assert!(matches!(
            cancellation_check(&cancelada, cliente, hoje),
            Err(AppError::InvalidState(_))
        ));
    }

    #[test]
    fn reserva_confirmada_ou_passada_nao_cancela() {
        let cliente = Uuid::new_v4();
        let hoje = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        let confirmada = booking(cliente, PaymentStatus::Confirmed);
        assert!(matches!(
            cancellation_check(&confirmada, cliente, hoje),
            Err(AppError::InvalidState(_))
        ));

        let mut passada = booking(cliente, PaymentStatus::Pending);
        passada.booking_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(matches!(
            cancellation_check(&passada, cliente, hoje),
            Err(AppError::InvalidState(_))
        ));
    }
}
