// src/services.rs

pub mod auth;
pub mod availability;
pub mod booking_service;
pub mod payment_service;
pub mod venue_service;
