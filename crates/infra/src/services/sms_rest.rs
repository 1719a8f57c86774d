use super::{NotificationChannel, NotificationError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Channel that delivers through a Twilio-compatible REST API
pub struct SmsRestChannel {
    client: Client,
    api_base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    message: Option<String>,
}

impl SmsRestChannel {
    pub fn new(
        api_base_url: String,
        account_sid: String,
        auth_token: String,
        from_number: String,
        send_timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(send_timeout)
            .build()
            .expect("To create http client for the sms provider");

        Self {
            client,
            api_base_url,
            account_sid,
            auth_token,
            from_number,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.api_base_url, self.account_sid
        )
    }
}

#[async_trait::async_trait]
impl NotificationChannel for SmsRestChannel {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotificationError> {
        let params = [
            ("To", destination),
            ("From", &self.from_number),
            ("Body", message),
        ];

        let res = self
            .client
            .post(&self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotificationError::Timeout
                } else {
                    NotificationError::Network(e.to_string())
                }
            })?;

        if res.status().is_success() {
            return Ok(());
        }

        let status = res.status();
        let reason = res
            .json::<ProviderErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("Provider responded with status code: {}", status));
        warn!("SMS provider rejected message. Reason: {}", reason);

        if status == reqwest::StatusCode::BAD_REQUEST {
            Err(NotificationError::InvalidDestination(destination.into()))
        } else {
            Err(NotificationError::Rejected(reason))
        }
    }
}
