pub mod booking_repo;
pub use booking_repo::BookingRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod venue_repo;
pub use venue_repo::VenueRepository;
