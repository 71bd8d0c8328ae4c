use std::env;

use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct CarrierConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub carrier: CarrierConfig,
    pub locations_base_url: String,
    pub rate_debounce_ms: u64,
    pub session_idle_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_or("APP_PORT", 3000);
        let carrier = CarrierConfig {
            base_url: env::var("CARRIER_BASE_URL")?,
            api_key: SecretString::from(env::var("CARRIER_API_KEY")?),
            timeout_secs: parse_or("CARRIER_TIMEOUT_SECS", 10),
        };
        let locations_base_url = env::var("LOCATIONS_BASE_URL")?;
        Ok(Self {
            database_url,
            host,
            port,
            carrier,
            locations_base_url,
            rate_debounce_ms: parse_or("RATE_DEBOUNCE_MS", 600),
            session_idle_secs: parse_or("SESSION_IDLE_SECS", 3600),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
