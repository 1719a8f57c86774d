mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, SmsProviderConfig};
pub use repos::{IReminderRepo, InMemoryReminderRepo, Repos};
pub use services::{
    create_notification_channel, EmailGatewayChannel, InMemoryNotificationChannel,
    NotificationChannel, NotificationError, SmsRestChannel,
};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::WallClockSys;

#[derive(Clone)]
pub struct WayfourthContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    /// The delivery provider that reminders are sent through. Constructed
    /// once at startup and injected everywhere so that tests can swap in
    /// an `InMemoryNotificationChannel`.
    pub channel: Arc<dyn NotificationChannel>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl WayfourthContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let channel = create_notification_channel(&config);
        Self {
            repos,
            config,
            sys: Arc::new(WallClockSys {}),
            channel,
        }
    }

    /// Context backed by in-memory repos and a recording notification
    /// channel, used by tests
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(WallClockSys {}),
            channel: Arc::new(InMemoryNotificationChannel::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> WayfourthContext {
    WayfourthContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
