use async_trait::async_trait;
use reqwest;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SmsProvider;
use crate::errors::CheckError;

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, destination: &str, body: &str) -> Result<(), CheckError>;
}

#[derive(Debug, Serialize)]
struct D7Request<'a> {
    messages: Vec<D7Message<'a>>,
    message_globals: D7Globals<'a>,
}

#[derive(Debug, Serialize)]
struct D7Message<'a> {
    channel: &'a str,
    recipients: Vec<&'a str>,
    content: &'a str,
    msg_type: &'a str,
    data_coding: &'a str,
}

#[derive(Debug, Serialize)]
struct D7Globals<'a> {
    originator: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    report_url: Option<&'a str>,
}

pub struct D7Sender {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
    originator: String,
    report_url: Option<String>,
}

impl D7Sender {
    pub fn new(
        api_url: String,
        api_token: String,
        originator: String,
        report_url: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_token,
            originator,
            report_url,
        }
    }
}

#[async_trait]
impl SmsSender for D7Sender {
    async fn send(&self, destination: &str, body: &str) -> Result<(), CheckError> {
        let request = D7Request {
            messages: vec![D7Message {
                channel: "sms",
                recipients: vec![destination],
                content: body,
                msg_type: "text",
                data_coding: "text",
            }],
            message_globals: D7Globals {
                originator: &self.originator,
                report_url: self.report_url.as_deref(),
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| CheckError::Send(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            warn!(%status, body = %text, "D7 rejected message");
            return Err(CheckError::Send(format!(
                "D7 request failed with status {}: {}",
                status, text
            )));
        }
        info!(destination, "sent SMS via D7");
        Ok(())
    }
}

pub struct TwilioSender {
    client: reqwest::Client,
    api_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSender {
    pub fn new(api_url: String, account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            account_sid,
            auth_token,
            from_number,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_url.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioSender {
    async fn send(&self, destination: &str, body: &str) -> Result<(), CheckError> {
        let form = [
            ("To", destination),
            ("From", self.from_number.as_str()),
            ("Body", body),
        ];
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| CheckError::Send(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            warn!(%status, body = %text, "Twilio rejected message");
            return Err(CheckError::Send(format!(
                "Twilio request failed with status {}: {}",
                status, text
            )));
        }
        info!(destination, "sent SMS via Twilio");
        Ok(())
    }
}

/// Prints the message instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunSender;

#[async_trait]
impl SmsSender for DryRunSender {
    async fn send(&self, destination: &str, body: &str) -> Result<(), CheckError> {
        println!("[DRY RUN] Would send SMS to {}: {}", destination, body);
        Ok(())
    }
}

/// Builds the configured provider, failing fast on missing credentials.
pub fn build_sender(provider: &SmsProvider) -> Result<Box<dyn SmsSender>, CheckError> {
    let missing = |key: &str| CheckError::Configuration(format!("{} must be set", key));
    match provider {
        SmsProvider::D7 {
            api_url,
            api_token,
            originator,
            report_url,
        } => {
            let token = api_token.clone().ok_or_else(|| missing("D7_API_TOKEN"))?;
            Ok(Box::new(D7Sender::new(
                api_url.clone(),
                token,
                originator.clone(),
                report_url.clone(),
            )))
        }
        SmsProvider::Twilio {
            api_url,
            account_sid,
            auth_token,
            from_number,
        } => {
            let sid = account_sid.clone().ok_or_else(|| missing("TWILIO_ACCOUNT_SID"))?;
            let token = auth_token.clone().ok_or_else(|| missing("TWILIO_AUTH_TOKEN"))?;
            let from = from_number.clone().ok_or_else(|| missing("TWILIO_PHONE_NUMBER"))?;
            Ok(Box::new(TwilioSender::new(api_url.clone(), sid, token, from)))
        }
    }
}
