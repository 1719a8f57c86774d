mod telemetry;

use telemetry::{get_subscriber, init_subscriber};
use wayfourth_reminders_api::Application;
use wayfourth_reminders_infra::setup_context;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("wayfourth_reminders_server".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await;

    let app = Application::new(context).await?;
    app.start().await
}
