use log::*;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("branch-payment-gateway/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL of the geocoding service, without a trailing slash.
    pub base_url: String,
    /// Identifying client tag sent as the `User-Agent` header. The public Nominatim instance rejects anonymous
    /// clients, so deployments should set this to something that identifies them.
    pub user_agent: String,
    /// Deadline for a single search call. There are no retries, so this is also the worst-case latency a caller
    /// will see from the geocoder.
    pub timeout_ms: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl NominatimConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("BPG_NOMINATIM_URL").unwrap_or_else(|_| {
            info!("BPG_NOMINATIM_URL not set, using {DEFAULT_NOMINATIM_URL}");
            DEFAULT_NOMINATIM_URL.to_string()
        });
        let base_url = base_url.trim_end_matches('/').to_string();
        let user_agent = std::env::var("BPG_NOMINATIM_USER_AGENT").unwrap_or_else(|_| {
            warn!(
                "BPG_NOMINATIM_USER_AGENT not set, using '{DEFAULT_USER_AGENT}'. Set it to a value that identifies \
                 your deployment, as the Nominatim usage policy requires."
            );
            DEFAULT_USER_AGENT.to_string()
        });
        let timeout_ms = std::env::var("BPG_NOMINATIM_TIMEOUT_MS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid value for BPG_NOMINATIM_TIMEOUT_MS. {e}"))
                    .ok()
            })
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Self { base_url, user_agent, timeout_ms }
    }
}
