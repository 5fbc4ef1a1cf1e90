// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register_user,
        handlers::auth::register_owner,
        handlers::auth::login_admin,
        handlers::auth::login_owner,
        handlers::auth::login_user,

        // --- Users ---
        handlers::auth::list_users,
        handlers::auth::list_owners,
        handlers::auth::create_owner,

        // --- Districts ---
        handlers::districts::list_districts,

        // --- Venues ---
        handlers::venues::admin_list_venues,
        handlers::venues::admin_get_venue,
        handlers::venues::admin_update_venue,
        handlers::venues::admin_confirm_venue,
        handlers::venues::admin_assign_owner,
        handlers::venues::admin_delete_venue,
        handlers::venues::owner_list_venues,
        handlers::venues::owner_create_venue,
        handlers::venues::customer_list_venues,
        handlers::venues::customer_get_venue,
        handlers::venues::customer_venue_availability,

        // --- Bookings ---
        handlers::bookings::admin_list_bookings,
        handlers::bookings::admin_delete_booking,
        handlers::bookings::owner_list_bookings,
        handlers::bookings::owner_review_payment,
        handlers::bookings::user_list_bookings,
        handlers::bookings::user_create_booking,
        handlers::bookings::user_upload_receipt,
        handlers::bookings::user_cancel_booking,

        // --- Payments ---
        handlers::payments::owner_list_commissions,
        handlers::payments::owner_upload_commission_receipt,

        // --- Subscriptions ---
        handlers::subscriptions::owner_subscription_info,
        handlers::subscriptions::owner_list_subscriptions,
        handlers::subscriptions::owner_create_subscription,
        handlers::subscriptions::owner_upload_subscription_receipt,
        handlers::subscriptions::admin_list_subscriptions,
        handlers::subscriptions::admin_confirm_subscription,
        handlers::subscriptions::admin_reject_subscription,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterPayload,
            models::auth::LoginPayload,

            // --- Districts ---
            models::district::District,

            // --- Venues ---
            models::venue::VenueStatus,
            models::venue::CustomerVenueStatus,
            models::venue::Venue,
            models::venue::VenueView,
            models::venue::CustomerVenueView,
            models::venue::VenueDetails,
            models::venue::CreateVenuePayload,
            models::venue::AssignOwnerPayload,

            // --- Bookings ---
            models::booking::BookingStatus,
            models::booking::PaymentStatus,
            models::booking::Booking,
            models::booking::BookingView,
            models::booking::BookingCreated,
            models::booking::CreateBookingPayload,

            // --- Payments ---
            models::payment::CommissionStatus,
            models::payment::SubscriptionStatus,
            models::payment::CommissionView,
            models::payment::SubscriptionPayment,
            models::payment::SubscriptionInfo,
            models::payment::PaymentAction,
            models::payment::PaymentActionPayload,
            models::payment::CommissionDue,

            // --- Availability ---
            services::availability::DayStatus,
            services::availability::DayAvailability,
            services::availability::MonthAvailability,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Contas de Clientes e Donos"),
        (name = "Districts", description = "Distritos de Tashkent"),
        (name = "Venues", description = "Gestão dos Salões de Festa"),
        (name = "Bookings", description = "Reservas e Calendário"),
        (name = "Payments", description = "Comissões dos Donos"),
        (name = "Subscriptions", description = "Assinaturas Mensais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
