use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::BookingView;
use crate::models::district::district_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VenueStatus {
    Unconfirmed,
    Confirmed,
}

// Situação do salão do ponto de vista do CLIENTE logado. Campo calculado
// explicitamente na projeção (nunca inferido ad hoc nas views).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CustomerVenueStatus {
    /// Disponível para reserva
    Active,
    /// O cliente logado já tem uma reserva ativa neste salão
    UserBooked,
    /// Temporariamente indisponível (dono sem assinatura em dia)
    Inactive,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub district_id: i32,
    pub address: String,
    pub capacity: i32,
    pub price_per_seat: i64,
    pub phone_number: String,
    pub status: VenueStatus,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Projeção de salão com o nome do distrito resolvido a partir dos dados
// estáticos de referência.
#[derive(Debug, Serialize, ToSchema)]
pub struct VenueView {
    #[serde(flatten)]
    pub venue: Venue,
    pub district_name: Option<&'static str>,
}

impl From<Venue> for VenueView {
    fn from(venue: Venue) -> Self {
        let district_name = district_name(venue.district_id);
        Self { venue, district_name }
    }
}

// Projeção para o cliente: só salões confirmados, com o venue_status
// calculado para o usuário que fez a requisição.
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerVenueView {
    #[serde(flatten)]
    pub venue: Venue,
    pub district_name: Option<&'static str>,
    pub venue_status: CustomerVenueStatus,
}

// Detalhe de salão com as reservas embutidas (usado pelo calendário).
#[derive(Debug, Serialize, ToSchema)]
pub struct VenueDetails {
    #[serde(flatten)]
    pub venue: Venue,
    pub district_name: Option<&'static str>,
    pub bookings: Vec<BookingView>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVenuePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: String,
    #[validate(range(min = 1, max = 11, message = "Distrito inválido."))]
    pub district_id: i32,
    #[validate(length(min = 3, message = "O endereço deve ter no mínimo 3 caracteres."))]
    pub address: String,
    #[validate(range(min = 1, message = "A capacidade deve ser positiva."))]
    pub capacity: i32,
    #[validate(range(min = 1, message = "O preço por lugar deve ser positivo."))]
    pub price_per_seat: i64,
    #[validate(length(min = 5, message = "Telefone inválido."))]
    pub phone_number: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignOwnerPayload {
    pub owner_id: Uuid,
}

// Filtros de listagem usados pelas três telas (admin/dono/cliente).
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct VenueFilters {
    pub search: Option<String>,
    pub district_id: Option<i32>,
    pub status: Option<VenueStatus>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}
