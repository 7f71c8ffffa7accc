use std::env;

use bpg_common::helpers::parse_boolean_flag;
use log::*;
use nominatim_tools::NominatimConfig;
use paystack_tools::PaystackConfig;

const DEFAULT_BPG_HOST: &str = "127.0.0.1";
const DEFAULT_BPG_PORT: u16 = 8480;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// If false, incoming webhook calls are NOT checked against the provider signature. Only ever disable this
    /// for local testing. **DANGER**
    pub webhook_signature_checks: bool,
    /// Geocoding provider configuration.
    pub nominatim: NominatimConfig,
    /// Payment provider configuration.
    pub paystack: PaystackConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BPG_HOST.to_string(),
            port: DEFAULT_BPG_PORT,
            webhook_signature_checks: true,
            nominatim: NominatimConfig::default(),
            paystack: PaystackConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BPG_HOST").ok().unwrap_or_else(|| DEFAULT_BPG_HOST.into());
        let port = env::var("BPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for BPG_PORT. {e} Using the default, {DEFAULT_BPG_PORT}, instead."
                    );
                    DEFAULT_BPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BPG_PORT);
        let webhook_signature_checks = parse_boolean_flag(env::var("BPG_WEBHOOK_SIGNATURE_CHECKS").ok(), true);
        if !webhook_signature_checks {
            warn!(
                "🚨️ Webhook signature checks are DISABLED. Anyone who can reach this server can post forged \
                 payment notifications. Do not run production like this."
            );
        }
        let nominatim = NominatimConfig::new_from_env_or_default();
        let paystack = PaystackConfig::new_from_env_or_default();
        Self { host, port, webhook_signature_checks, nominatim, paystack }
    }
}
