pub mod auth;
pub mod booking;
pub mod district;
pub mod payment;
pub mod venue;
