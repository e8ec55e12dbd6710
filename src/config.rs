use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::fetcher::DEFAULT_USER_AGENT;

pub const ENV_PREFIX: &str = "PRICE_TRACKER_";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_products_file")]
    pub products_file: PathBuf,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Used when a page shows a price without any currency symbol.
    #[serde(default)]
    pub default_currency: String,
    #[serde(flatten)]
    pub twilio: TwilioConfig,
}

/// Messaging credentials. Only checked when a text is actually sent.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct TwilioConfig {
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_from: Option<String>,
    pub twilio_to: Option<String>,
    #[serde(default = "default_twilio_api_base")]
    pub twilio_api_base: String,
}

fn default_products_file() -> PathBuf {
    PathBuf::from("products.json")
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

fn default_twilio_api_base() -> String {
    "https://api.twilio.com".into()
}

impl Config {
    /// Reads `PRICE_TRACKER_*` variables, after pulling in a `.env` file if present.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter(vars)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
