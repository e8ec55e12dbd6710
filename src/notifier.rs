use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::info;

use crate::config::TwilioConfig;
use crate::error::{Result, TrackerError};

/// Delivers the run summary as one text message.
pub trait Notifier {
    /// Returns an identifier for the queued message.
    fn send(&self, body: &str) -> Result<String>;
}

pub struct TwilioNotifier {
    client: Client,
    config: TwilioConfig,
}

#[derive(Deserialize, Debug)]
struct MessageResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

struct Credentials<'a> {
    account_sid: &'a str,
    auth_token: &'a str,
    from: &'a str,
    to: &'a str,
}

impl TwilioNotifier {
    pub fn new(config: TwilioConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TrackerError::HttpClient)?;
        Ok(Self { client, config })
    }

    fn credentials(&self) -> Result<Credentials<'_>> {
        fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .ok_or(TrackerError::MissingCredential(name))
        }
        Ok(Credentials {
            account_sid: required(&self.config.twilio_account_sid, "PRICE_TRACKER_TWILIO_ACCOUNT_SID")?,
            auth_token: required(&self.config.twilio_auth_token, "PRICE_TRACKER_TWILIO_AUTH_TOKEN")?,
            from: required(&self.config.twilio_from, "PRICE_TRACKER_TWILIO_FROM")?,
            to: required(&self.config.twilio_to, "PRICE_TRACKER_TWILIO_TO")?,
        })
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{account_sid}/Messages.json",
            self.config.twilio_api_base.trim_end_matches('/')
        )
    }
}

impl Notifier for TwilioNotifier {
    fn send(&self, body: &str) -> Result<String> {
        let creds = self.credentials()?;
        info!(to = creds.to, "sending text message");

        let message: MessageResource = self
            .client
            .post(self.messages_url(creds.account_sid))
            .basic_auth(creds.account_sid, Some(creds.auth_token))
            .form(&[("Body", body), ("From", creds.from), ("To", creds.to)])
            .send()
            .and_then(|res| res.error_for_status())
            .and_then(|res| res.json())
            .map_err(TrackerError::Notify)?;

        info!(sid = %message.sid, status = ?message.status, "message accepted");
        Ok(message.sid)
    }
}
