// src/handlers.rs

pub mod auth;
pub mod bookings;
pub mod districts;
pub mod payments;
pub mod subscriptions;
pub mod uploads;
pub mod venues;
