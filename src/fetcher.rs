use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect;
use tracing::info;

use crate::error::{Result, TrackerError};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:74.0) Gecko/20100101 Firefox/74.0";

const MAX_REDIRECTS: usize = 10;

/// Anything that can turn a product URL into page markup.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(TrackerError::HttpClient)?;
        Ok(Self { client })
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        info!(url, "getting HTML");
        let fetch_err = |source: reqwest::Error| TrackerError::Fetch { url: url.to_string(), source };
        self.client
            .get(url)
            .send()
            .and_then(|res| res.error_for_status())
            .and_then(|res| res.text())
            .map_err(fetch_err)
    }
}
