// src/config.rs

use crate::{
    db::{BookingRepository, PaymentRepository, UserRepository, VenueRepository},
    services::{
        auth::AuthService,
        booking_service::BookingService,
        payment_service::{PaymentService, PaymentSettings},
        venue_service::VenueService,
    },
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, path::PathBuf, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub upload_dir: PathBuf,
    pub auth_service: AuthService,
    pub venue_service: VenueService,
    pub booking_service: BookingService,
    pub payment_service: PaymentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let admin_card_number =
            env::var("ADMIN_CARD_NUMBER").unwrap_or_else(|_| "8600 0000 0000 0000".to_string());
        let commission_percent = env_i64("ADMIN_COMMISSION_PERCENT", 10)?;
        let subscription_percent = env_i64("ADMIN_SUBSCRIPTION_PERCENT", 5)?;
        let upload_dir =
            PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()));

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let venue_repo = VenueRepository::new(db_pool.clone());
        let booking_repo = BookingRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let venue_service =
            VenueService::new(venue_repo.clone(), booking_repo.clone(), user_repo.clone());
        let booking_service =
            BookingService::new(booking_repo.clone(), venue_repo.clone(), user_repo.clone());
        let payment_service = PaymentService::new(
            payment_repo,
            booking_repo,
            venue_repo,
            user_repo,
            PaymentSettings { admin_card_number, commission_percent, subscription_percent },
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            upload_dir,
            auth_service,
            venue_service,
            booking_service,
            payment_service,
        })
    }
}

fn env_i64(name: &str, default: i64) -> anyhow::Result<i64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("{} deve ser um número inteiro (recebido: {})", name, raw)),
        Err(_) => Ok(default),
    }
}
