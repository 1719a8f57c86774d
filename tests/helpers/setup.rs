use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use wayfourth_reminders_api::Application;
use wayfourth_reminders_domain::ID;
use wayfourth_reminders_infra::{InMemoryNotificationChannel, WayfourthContext};

pub struct TestApp {
    pub ctx: WayfourthContext,
    pub channel: Arc<InMemoryNotificationChannel>,
    pub address: String,
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    let mut ctx = WayfourthContext::create_inmemory();
    ctx.config.port = 0; // Random port
    let channel = Arc::new(InMemoryNotificationChannel::new());
    ctx.channel = channel.clone();

    let app_ctx = ctx.clone();
    let application = Application::new(app_ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://127.0.0.1:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    TestApp {
        ctx,
        channel,
        address,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    exp: usize,
    iat: usize,
    user_id: String,
}

/// Issues an auth token the way the identity provider in front of this
/// service would
pub fn auth_token_for(user_id: &ID, auth_secret: &str) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        exp: now + 3600,
        iat: now,
        user_id: user_id.as_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth_secret.as_bytes()),
    )
    .expect("To encode auth token")
}
