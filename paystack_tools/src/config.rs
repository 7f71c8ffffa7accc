use bpg_common::Secret;
use log::*;

pub const DEFAULT_PAYSTACK_URL: &str = "https://api.paystack.co";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct PaystackConfig {
    /// Base URL of the Paystack API, without a trailing slash. Only changed when pointing tests at a stub server.
    pub base_url: String,
    /// The merchant secret key. Used as the bearer token on outbound calls and as the HMAC key for inbound
    /// webhook signatures.
    pub secret_key: Secret<String>,
    /// Deadline for a single API call. No retries are performed on top of it.
    pub timeout_ms: u64,
}

impl Default for PaystackConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PAYSTACK_URL.to_string(),
            secret_key: Secret::new(String::default()),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl PaystackConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("BPG_PAYSTACK_API_URL").unwrap_or_else(|_| {
            info!("BPG_PAYSTACK_API_URL not set, using {DEFAULT_PAYSTACK_URL}");
            DEFAULT_PAYSTACK_URL.to_string()
        });
        let base_url = base_url.trim_end_matches('/').to_string();
        let secret_key = Secret::new(std::env::var("BPG_PAYSTACK_SECRET_KEY").unwrap_or_else(|_| {
            error!(
                "BPG_PAYSTACK_SECRET_KEY is not set. Every call to the payment provider will be rejected until it \
                 is configured."
            );
            String::default()
        }));
        let timeout_ms = std::env::var("BPG_PAYSTACK_TIMEOUT_MS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid value for BPG_PAYSTACK_TIMEOUT_MS. {e}"))
                    .ok()
            })
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Self { base_url, secret_key, timeout_ms }
    }
}
