use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;

use crate::errors::CheckError;

pub const DEFAULT_CONFIG_FILE: &str = "checkout.env";
pub const DEFAULT_PROPERTY_LABEL: &str = "the rental";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_D7_API_URL: &str = "https://api.d7networks.com/messages/v1/send";
pub const DEFAULT_D7_ORIGINATOR: &str = "AirbnbClean";
pub const DEFAULT_TWILIO_API_URL: &str = "https://api.twilio.com";
pub const DEFAULT_RELAY_BIND: &str = "0.0.0.0:5000";

/// Raw `KEY=VALUE` pairs read from the config file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: BTreeMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let mut values = BTreeMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// Returns the previous value, if any.
    pub fn set(&mut self, key: &str, value: &str) -> Option<String> {
        self.values.insert(key.to_string(), value.to_string())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let mut out = String::new();
        for (key, value) in &self.values {
            if value.contains(char::is_whitespace) || value.contains('#') {
                out.push_str(&format!("{}=\"{}\"\n", key, value));
            } else {
                out.push_str(&format!("{}={}\n", key, value));
            }
        }
        fs::write(path.as_ref(), out).map_err(|e| e.to_string())
    }
}

/// Where a key is looked up: the config file first, then the environment.
pub trait ConfigSource {
    fn lookup(&self, key: &str) -> Option<String>;
}

impl ConfigSource for AppConfig {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).or_else(|| env::var(key).ok())
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmsProvider {
    D7 {
        api_url: String,
        api_token: Option<String>,
        originator: String,
        report_url: Option<String>,
    },
    Twilio {
        api_url: String,
        account_sid: Option<String>,
        auth_token: Option<String>,
        from_number: Option<String>,
    },
}

fn lookup_first<S: ConfigSource + ?Sized>(source: &S, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| source.lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

impl SmsProvider {
    /// Credentials stay optional here; `build_sender` rejects missing ones.
    pub fn from_source<S: ConfigSource + ?Sized>(source: &S) -> Result<Self, CheckError> {
        let get = |keys: &[&str]| lookup_first(source, keys);

        let provider_name = get(&["SMS_PROVIDER"]).unwrap_or_else(|| "d7".to_string());
        match provider_name.to_lowercase().as_str() {
            "d7" => Ok(SmsProvider::D7 {
                api_url: get(&["D7_API_URL"]).unwrap_or_else(|| DEFAULT_D7_API_URL.to_string()),
                api_token: get(&["D7_API_TOKEN"]),
                originator: get(&["D7_ORIGINATOR"])
                    .unwrap_or_else(|| DEFAULT_D7_ORIGINATOR.to_string()),
                report_url: get(&["D7_REPORT_URL"]),
            }),
            "twilio" => Ok(SmsProvider::Twilio {
                api_url: get(&["TWILIO_API_URL"])
                    .unwrap_or_else(|| DEFAULT_TWILIO_API_URL.to_string()),
                account_sid: get(&["TWILIO_ACCOUNT_SID"]),
                auth_token: get(&["TWILIO_AUTH_TOKEN"]),
                from_number: get(&["TWILIO_PHONE_NUMBER"]),
            }),
            other => Err(CheckError::Configuration(format!(
                "SMS_PROVIDER must be d7 or twilio, got {}",
                other
            ))),
        }
    }
}

/// Validated configuration for a checkout run, built once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub feed_url: String,
    pub cleaner_destination: String,
    pub property_label: String,
    pub timezone: Option<Tz>,
    pub fetch_timeout: Duration,
    pub provider: SmsProvider,
}

impl Settings {
    pub fn from_source<S: ConfigSource + ?Sized>(source: &S) -> Result<Self, CheckError> {
        let get = |keys: &[&str]| lookup_first(source, keys);

        let feed_url = get(&["FEED_URL", "ICAL_URL"]).ok_or_else(|| {
            CheckError::Configuration("FEED_URL must be set to the calendar feed URL".to_string())
        })?;
        validate_feed_url(&feed_url)?;

        let cleaner_destination = get(&["CLEANER_DESTINATION", "CLEANER_PHONE"]).ok_or_else(|| {
            CheckError::Configuration("CLEANER_DESTINATION must be set".to_string())
        })?;

        let property_label = get(&["PROPERTY_LABEL", "PROPERTY_LOCATION"])
            .unwrap_or_else(|| DEFAULT_PROPERTY_LABEL.to_string());

        let timezone = match get(&["TIMEZONE"]) {
            Some(name) => Some(name.parse::<Tz>().map_err(|_| {
                CheckError::Configuration(format!("unknown TIMEZONE {}", name))
            })?),
            None => None,
        };

        let fetch_timeout = match get(&["FETCH_TIMEOUT_SECS"]) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(CheckError::Configuration(format!(
                        "FETCH_TIMEOUT_SECS must be a positive integer, got {}",
                        raw
                    )));
                }
            },
            None => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        Ok(Self {
            feed_url,
            cleaner_destination,
            property_label,
            timezone,
            fetch_timeout,
            provider: SmsProvider::from_source(source)?,
        })
    }
}

/// What the inbound relay needs: a provider and where to forward to.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub destination: String,
    pub bind: String,
    pub provider: SmsProvider,
}

impl RelaySettings {
    pub fn from_source<S: ConfigSource + ?Sized>(source: &S) -> Result<Self, CheckError> {
        let destination = lookup_first(source, &["RELAY_DESTINATION", "PERSONAL_PHONE"])
            .ok_or_else(|| {
                CheckError::Configuration(
                    "RELAY_DESTINATION must be set to run the relay".to_string(),
                )
            })?;
        Ok(Self {
            destination,
            bind: lookup_first(source, &["RELAY_BIND"])
                .unwrap_or_else(|| DEFAULT_RELAY_BIND.to_string()),
            provider: SmsProvider::from_source(source)?,
        })
    }
}

pub fn validate_feed_url(url: &str) -> Result<(), CheckError> {
    let lower = url.trim().to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(())
    } else {
        Err(CheckError::Configuration(format!(
            "feed URL must use http or https: {}",
            url
        )))
    }
}
