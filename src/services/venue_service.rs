use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BookingRepository, UserRepository, VenueRepository},
    models::{
        auth::Role,
        booking::BookingView,
        district::district_name,
        venue::{
            AssignOwnerPayload, CreateVenuePayload, CustomerVenueStatus, CustomerVenueView,
            Venue, VenueDetails, VenueFilters, VenueStatus, VenueView,
        },
    },
    services::availability::{self, MonthAvailability},
};

#[derive(Clone)]
pub struct VenueService {
    venue_repo: VenueRepository,
    booking_repo: BookingRepository,
    user_repo: UserRepository,
}

impl VenueService {
    pub fn new(
        venue_repo: VenueRepository,
        booking_repo: BookingRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self { venue_repo, booking_repo, user_repo }
    }

    /// Dono cadastra um salão novo; nasce sempre não-confirmado e invisível
    /// para clientes até o admin aprovar.
    pub async fn create_for_owner(
        &self,
        owner_id: Uuid,
        payload: &CreateVenuePayload,
    ) -> Result<VenueView, AppError> {
        let venue = self.venue_repo.create(payload, owner_id).await?;
        Ok(venue.into())
    }

    pub async fn list_all(&self, filters: &VenueFilters) -> Result<Vec<VenueView>, AppError> {
        let venues = self.venue_repo.list(filters, None).await?;
        Ok(venues.into_iter().map(VenueView::from).collect())
    }

    pub async fn list_for_owner(
        &self,
        owner_id: Uuid,
        filters: &VenueFilters,
    ) -> Result<Vec<VenueView>, AppError> {
        let venues = self.venue_repo.list(filters, Some(owner_id)).await?;
        Ok(venues.into_iter().map(VenueView::from).collect())
    }

    /// Projeção do cliente: apenas confirmados, com o venue_status calculado.
    pub async fn list_for_customer(
        &self,
        user_id: Uuid,
        filters: &VenueFilters,
    ) -> Result<Vec<CustomerVenueView>, AppError> {
        let today = Utc::now().date_naive();
        let rows = self.venue_repo.list_for_customer(user_id, filters).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                // user_booked informa mais que inactive; inactive mais que active
                let venue_status = if row.user_booked {
                    CustomerVenueStatus::UserBooked
                } else if row.venue.owner_id.is_none()
                    || row.owner_subscription_expires_at.is_none_or(|d| d < today)
                {
                    CustomerVenueStatus::Inactive
                } else {
                    CustomerVenueStatus::Active
                };
                let district_name = district_name(row.venue.district_id);
                CustomerVenueView { venue: row.venue, district_name, venue_status }
            })
            .collect())
    }

    pub async fn details(&self, id: Uuid) -> Result<VenueDetails, AppError> {
        let venue = self.venue_repo.find_by_id(id).await?.ok_or(AppError::VenueNotFound)?;
        self.details_of(venue).await
    }

    /// Detalhe visto pelo cliente: salão não confirmado não existe.
    pub async fn details_for_customer(&self, id: Uuid) -> Result<VenueDetails, AppError> {
        let venue = self.venue_repo.find_by_id(id).await?.ok_or(AppError::VenueNotFound)?;
        if venue.status != VenueStatus::Confirmed {
            return Err(AppError::VenueNotFound);
        }
        self.details_of(venue).await
    }

    async fn details_of(&self, venue: Venue) -> Result<VenueDetails, AppError> {
        let bookings = self
            .booking_repo
            .list_for_venue(venue.id)
            .await?
            .into_iter()
            .map(BookingView::from)
            .collect();
        let district_name = district_name(venue.district_id);
        Ok(VenueDetails { venue, district_name, bookings })
    }

    /// Janela de 3 meses do motor de disponibilidade para um salão.
    pub async fn availability(&self, id: Uuid) -> Result<Vec<MonthAvailability>, AppError> {
        let venue = self.venue_repo.find_by_id(id).await?.ok_or(AppError::VenueNotFound)?;
        if venue.status != VenueStatus::Confirmed {
            return Err(AppError::VenueNotFound);
        }

        let active_dates = self.booking_repo.active_dates(venue.id).await?;
        let today = Utc::now().date_naive();
        Ok(availability::availability_window(&active_dates, today))
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &CreateVenuePayload,
    ) -> Result<VenueView, AppError> {
        let venue = self.venue_repo.update(id, payload).await?;
        Ok(venue.into())
    }

    pub async fn confirm(&self, id: Uuid) -> Result<VenueView, AppError> {
        let venue = self.venue_repo.confirm(id).await?;
        Ok(venue.into())
    }

    pub async fn assign_owner(
        &self,
        id: Uuid,
        payload: &AssignOwnerPayload,
    ) -> Result<VenueView, AppError> {
        // O alvo precisa existir e ser de fato um dono
        let owner = self
            .user_repo
            .find_by_id(payload.owner_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        if owner.role != Role::Owner {
            return Err(AppError::InvalidState(
                "O usuário selecionado não é dono de salão.".into(),
            ));
        }

        let venue = self.venue_repo.assign_owner(id, owner.id).await?;
        Ok(venue.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.venue_repo.delete(id).await
    }
}
