mod email_gateway;
mod inmemory;
mod sms_rest;

pub use email_gateway::EmailGatewayChannel;
pub use inmemory::InMemoryNotificationChannel;
pub use sms_rest::SmsRestChannel;

use crate::config::{Config, SmsProviderConfig};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Outcome of a failed delivery attempt. The sweep does not branch on
/// the variant, every failure finalizes the reminder as `failed`, but the
/// reason is kept for the sweep response and the logs.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid destination: `{0}`")]
    InvalidDestination(String),
    #[error("Delivery rejected by provider: `{0}`")]
    Rejected(String),
    #[error("Delivery attempt timed out")]
    Timeout,
    #[error("Network error during delivery: `{0}`")]
    Network(String),
}

/// External delivery provider that a `Reminder`s message is sent through
#[async_trait::async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotificationError>;
}

/// Constructs the delivery provider selected by the configuration.
/// A deployment without provider credentials cannot deliver anything,
/// so it refuses to start.
pub fn create_notification_channel(config: &Config) -> Arc<dyn NotificationChannel> {
    let send_timeout = Duration::from_millis(config.send_timeout_millis);
    match &config.sms_provider {
        Some(SmsProviderConfig::Rest {
            api_base_url,
            account_sid,
            auth_token,
            from_number,
        }) => Arc::new(SmsRestChannel::new(
            api_base_url.clone(),
            account_sid.clone(),
            auth_token.clone(),
            from_number.clone(),
            send_timeout,
        )),
        Some(SmsProviderConfig::EmailGateway {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_address,
            gateway_domain,
        }) => Arc::new(EmailGatewayChannel::new(
            smtp_host,
            *smtp_port,
            smtp_username.clone(),
            smtp_password.clone(),
            from_address.clone(),
            gateway_domain.clone(),
            send_timeout,
        )),
        None => panic!("SMS_PROVIDER env var to be present."),
    }
}
