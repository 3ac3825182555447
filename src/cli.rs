use std::path::Path;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use tracing::{error, info};

use crate::clients::feed_client::{FeedFetcher, HttpFeedFetcher};
use crate::clients::sms_client::{DryRunSender, SmsSender, build_sender};
use crate::config::{AppConfig, DEFAULT_PROPERTY_LABEL, RelaySettings, Settings};
use crate::errors::CheckError;
use crate::runtime;
use crate::service::feed_parser::parse_events;
use crate::tasks::checkout_check::{CheckOutcome, resolve_today, run_checkout_check};

const TEST_MESSAGE: &str = "This is a test message from your cleaning reminder system.";

/// Texts the cleaner when a rental checkout is scheduled for tomorrow.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Check the feed and notify the cleaner if a checkout is tomorrow
    Check {
        /// Print the message instead of sending it
        #[arg(long)]
        dry_run: bool,
        /// Reference date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Print the raw feed and the events read from it
    PrintFeed,
    /// Send a test message through the configured provider
    TestSms {
        #[arg(long)]
        message: Option<String>,
        /// Destination number, defaults to the cleaner
        #[arg(long)]
        to: Option<String>,
    },
    /// Serve the inbound SMS relay webhook
    Relay,
    /// Edit the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigAction {
    /// Prompt for the main settings and write them
    Init,
    /// Set a single key
    Set { key: String, value: String },
}

pub async fn cli(cli: Cli, config_path: &str, config: AppConfig) -> Result<(), CheckError> {
    let command = cli.command.unwrap_or(Commands::Check {
        dry_run: false,
        today: None,
    });

    match command {
        Commands::Check { dry_run, today } => {
            let settings = Settings::from_source(&config)?;
            let sender: Box<dyn SmsSender> = if dry_run {
                Box::new(DryRunSender)
            } else {
                build_sender(&settings.provider)?
            };
            let fetcher = HttpFeedFetcher::new(settings.fetch_timeout)?;
            let today = today.unwrap_or_else(|| resolve_today(settings.timezone));

            match run_checkout_check(&settings, &fetcher, sender.as_ref(), today).await? {
                CheckOutcome::NoCheckout { tomorrow } => {
                    println!(
                        "No checkouts tomorrow ({}) at {}",
                        tomorrow, settings.property_label
                    );
                }
                CheckOutcome::Sent { message } => {
                    if !dry_run {
                        println!("Sent cleaning notification: {}", message);
                    }
                }
                CheckOutcome::SendFailed { error, .. } => {
                    println!("Failed to send cleaning notification: {}", error);
                }
            }
            Ok(())
        }
        Commands::PrintFeed => {
            let settings = Settings::from_source(&config)?;
            let fetcher = HttpFeedFetcher::new(settings.fetch_timeout)?;
            let raw = fetcher.fetch(&settings.feed_url).await?;
            println!("RAW ICAL DATA:\n==============\n{}\n==============", raw.trim_end());
            for event in parse_events(&raw)? {
                println!(
                    "{} -> {}  {}{}",
                    event.start_date,
                    event.end_date,
                    event.title,
                    if event.is_confirmed() { "" } else { "  (ignored)" }
                );
            }
            Ok(())
        }
        Commands::TestSms { message, to } => {
            let settings = Settings::from_source(&config)?;
            let sender = build_sender(&settings.provider)?;
            let destination = to.unwrap_or_else(|| settings.cleaner_destination.clone());
            let body = message.unwrap_or_else(|| TEST_MESSAGE.to_string());
            sender.send(&destination, &body).await?;
            println!("Sent test message to {}", destination);
            Ok(())
        }
        Commands::Relay => {
            let settings = RelaySettings::from_source(&config)?;
            let sender = build_sender(&settings.provider)?;
            runtime::run_relay(&settings, sender).await
        }
        Commands::Config { action } => {
            let mut config = config;
            match action {
                ConfigAction::Init => prompt_config(&mut config)?,
                ConfigAction::Set { key, value } => {
                    let old = set_config_value(&mut config, &key, &value);
                    println!("Updated {} from '{}' to '{}'", key, old.unwrap_or_default(), value);
                }
            }
            config.save(config_path).map_err(|e| {
                CheckError::Configuration(format!("cannot write {}: {}", config_path, e))
            })?;
            info!(path = config_path, "config saved");
            Ok(())
        }
    }
}

/// A failed send only ends a scheduled check quietly; a manual test must report it.
pub fn send_failure_is_fatal(command: Option<&Commands>) -> bool {
    matches!(command, Some(Commands::TestSms { .. }))
}

pub fn set_config_value(config: &mut AppConfig, key: &str, value: &str) -> Option<String> {
    config.set(&key.trim().to_uppercase(), value.trim())
}

/// Reads the config file if it exists; a missing file is an empty config.
pub fn load_config(path: &str) -> Result<AppConfig, CheckError> {
    if !Path::new(path).exists() {
        return Ok(AppConfig::default());
    }
    AppConfig::from_file(path)
        .map_err(|e| CheckError::Configuration(format!("cannot read {}: {}", path, e)))
}

fn prompt_config(config: &mut AppConfig) -> Result<(), CheckError> {
    let ask = |label: &str, key: &str, fallback: &str| -> Result<String, CheckError> {
        let current = config.get(key).unwrap_or_else(|| fallback.to_string());
        Text::new(label)
            .with_default(&current)
            .prompt()
            .map_err(|e| {
                error!(error = %e, "prompt aborted");
                CheckError::Configuration(format!("prompt aborted: {}", e))
            })
    };

    let feed_url = ask("Calendar feed URL (iCal export):", "FEED_URL", "")?;
    let cleaner = ask("Cleaner phone number:", "CLEANER_DESTINATION", "")?;
    let label = ask("Property label:", "PROPERTY_LABEL", DEFAULT_PROPERTY_LABEL)?;
    let provider = Select::new("SMS provider:", vec!["d7", "twilio"])
        .prompt()
        .map_err(|e| CheckError::Configuration(format!("prompt aborted: {}", e)))?;

    let mut answers = vec![
        ("FEED_URL", feed_url),
        ("CLEANER_DESTINATION", cleaner),
        ("PROPERTY_LABEL", label),
        ("SMS_PROVIDER", provider.to_string()),
    ];
    if provider == "d7" {
        answers.push(("D7_API_TOKEN", ask("D7 API token:", "D7_API_TOKEN", "")?));
    } else {
        answers.push(("TWILIO_ACCOUNT_SID", ask("Twilio account SID:", "TWILIO_ACCOUNT_SID", "")?));
        answers.push(("TWILIO_AUTH_TOKEN", ask("Twilio auth token:", "TWILIO_AUTH_TOKEN", "")?));
        answers.push(("TWILIO_PHONE_NUMBER", ask("Twilio phone number:", "TWILIO_PHONE_NUMBER", "")?));
    }

    for (key, value) in answers {
        config.set(key, &value);
    }
    Ok(())
}
