use super::{NotificationChannel, NotificationError};
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use tracing::warn;

/// Channel that delivers through a carrier email-to-SMS gateway. The
/// message is emailed to `<digits of destination>@<gateway domain>` and
/// the carrier forwards it as a text message.
pub struct EmailGatewayChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    gateway_domain: String,
}

impl EmailGatewayChannel {
    pub fn new(
        smtp_host: &str,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
        from_address: String,
        gateway_domain: String,
        send_timeout: Duration,
    ) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)
            .expect("To create smtp transport for the email gateway")
            .port(smtp_port)
            .credentials(Credentials::new(smtp_username, smtp_password))
            .timeout(Some(send_timeout))
            .build();

        Self {
            transport,
            from_address,
            gateway_domain,
        }
    }

    fn gateway_address(&self, destination: &str) -> Result<Mailbox, NotificationError> {
        let digits = destination
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect::<String>();
        if digits.is_empty() {
            return Err(NotificationError::InvalidDestination(destination.into()));
        }
        format!("{}@{}", digits, self.gateway_domain)
            .parse::<Mailbox>()
            .map_err(|_| NotificationError::InvalidDestination(destination.into()))
    }
}

#[async_trait::async_trait]
impl NotificationChannel for EmailGatewayChannel {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotificationError> {
        let from = self
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::Network(e.to_string()))?;
        let to = self.gateway_address(destination)?;

        let email = Message::builder()
            .from(from)
            .to(to)
            // Most SMS gateways ignore the subject
            .subject("Wayfourth Reminder")
            .body(message.to_string())
            .map_err(|e| NotificationError::Rejected(e.to_string()))?;

        self.transport.send(email).await.map_err(|e| {
            warn!("Email gateway delivery error: {:?}", e);
            if e.is_timeout() {
                NotificationError::Timeout
            } else if e.is_permanent() {
                NotificationError::Rejected(e.to_string())
            } else {
                NotificationError::Network(e.to_string())
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> EmailGatewayChannel {
        EmailGatewayChannel::new(
            "smtp.example.com",
            587,
            "user".into(),
            "pass".into(),
            "reminders@example.com".into(),
            "vtext.com".into(),
            Duration::from_secs(15),
        )
    }

    // The pooled transport spawns a tokio task when dropped, so these
    // tests need a runtime even though they never send anything.
    #[tokio::test]
    async fn formats_gateway_address_from_digits() {
        let channel = channel();
        let mailbox = channel.gateway_address("+1 (555) 123-4567").unwrap();
        assert_eq!(mailbox.email.to_string(), "15551234567@vtext.com");
    }

    #[tokio::test]
    async fn rejects_destination_without_digits() {
        let channel = channel();
        assert!(channel.gateway_address("not a number").is_err());
    }
}
