use tracing::{info, warn};
use wayfourth_reminders_utils::create_random_secret;

#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret that the external cron scheduler has to present
    /// when invoking the reminder sweep endpoint
    pub sweep_secret: String,
    /// Secret used to verify the signature of user auth tokens
    pub auth_secret: String,
    /// Port for the application to run on
    pub port: usize,
    /// Upper bound in millis for a single delivery attempt. One
    /// unresponsive destination must not stall the whole sweep.
    pub send_timeout_millis: u64,
    /// Credentials for the selected delivery provider. `None` when no
    /// provider is configured, in which case the server refuses to start.
    pub sms_provider: Option<SmsProviderConfig>,
}

/// The two supported delivery backends. Exactly one is selected
/// per deployment with the `SMS_PROVIDER` environment variable.
#[derive(Debug, Clone)]
pub enum SmsProviderConfig {
    /// Twilio-compatible REST API
    Rest {
        api_base_url: String,
        account_sid: String,
        auth_token: String,
        from_number: String,
    },
    /// SMTP relay towards a carrier email-to-SMS gateway,
    /// e.g. `5551234567@vtext.com`
    EmailGateway {
        smtp_host: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
        from_address: String,
        gateway_domain: String,
    },
}

fn require_env(var: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| panic!("{} env var to be present.", var))
}

impl SmsProviderConfig {
    fn from_env() -> Option<Self> {
        let provider = match std::env::var("SMS_PROVIDER") {
            Ok(provider) => provider,
            Err(_) => return None,
        };
        match provider.as_str() {
            "rest" => Some(Self::Rest {
                api_base_url: std::env::var("SMS_API_BASE_URL")
                    .unwrap_or_else(|_| "https://api.twilio.com/2010-04-01".into()),
                account_sid: require_env("SMS_ACCOUNT_SID"),
                auth_token: require_env("SMS_AUTH_TOKEN"),
                from_number: require_env("SMS_FROM_NUMBER"),
            }),
            "email_gateway" => Some(Self::EmailGateway {
                smtp_host: require_env("SMTP_HOST"),
                smtp_port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse::<u16>().ok())
                    .unwrap_or(587),
                smtp_username: require_env("SMTP_USERNAME"),
                smtp_password: require_env("SMTP_PASSWORD"),
                from_address: require_env("SMTP_FROM_ADDRESS"),
                gateway_domain: require_env("SMS_GATEWAY_DOMAIN"),
            }),
            _ => panic!(
                "SMS_PROVIDER: {} is not valid, expected `rest` or `email_gateway`.",
                provider
            ),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let sweep_secret = match std::env::var("SWEEP_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find SWEEP_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(32);
                info!(
                    "Secret for invoking the reminder sweep was generated and set to: {}",
                    secret
                );
                secret
            }
        };
        let auth_secret = match std::env::var("AUTH_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find AUTH_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(32);
                info!(
                    "Secret for signing user auth tokens was generated and set to: {}",
                    secret
                );
                secret
            }
        };
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };
        let default_send_timeout = 1000 * 15;
        let send_timeout_millis = match std::env::var("SEND_TIMEOUT_MILLIS") {
            Ok(timeout) => match timeout.parse::<u64>() {
                Ok(timeout) => timeout,
                Err(_) => {
                    warn!(
                        "The given SEND_TIMEOUT_MILLIS: {} is not valid, falling back to the default: {}.",
                        timeout, default_send_timeout
                    );
                    default_send_timeout
                }
            },
            Err(_) => default_send_timeout,
        };
        Self {
            sweep_secret,
            auth_secret,
            port,
            send_timeout_millis,
            sms_provider: SmsProviderConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
