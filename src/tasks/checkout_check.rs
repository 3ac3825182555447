use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{error, info};

use crate::clients::feed_client::FeedFetcher;
use crate::clients::sms_client::SmsSender;
use crate::config::{Settings, validate_feed_url};
use crate::errors::CheckError;
use crate::service::checkout_service::{decide, tomorrow_of};
use crate::service::feed_parser::parse_events;
use crate::service::message_composer::MessageComposer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    NoCheckout { tomorrow: NaiveDate },
    Sent { message: String },
    SendFailed { message: String, error: CheckError },
}

/// "Today" in the property's zone, or the host's zone when none is configured.
pub fn resolve_today(timezone: Option<Tz>) -> NaiveDate {
    match timezone {
        Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
        None => Local::now().date_naive(),
    }
}

pub async fn run_checkout_check<F: FeedFetcher + ?Sized, S: SmsSender + ?Sized>(
    settings: &Settings,
    fetcher: &F,
    sender: &S,
    today: NaiveDate,
) -> Result<CheckOutcome, CheckError> {
    validate_feed_url(&settings.feed_url)?;
    let tomorrow = tomorrow_of(today);
    info!(%today, %tomorrow, "checking for checkouts tomorrow");

    let raw = fetcher.fetch(&settings.feed_url).await?;
    let events = parse_events(&raw)?;
    info!(count = events.len(), "parsed calendar events");

    let result = decide(&events, today);
    if !result.checkout_tomorrow {
        info!(%tomorrow, property = %settings.property_label, "no checkout tomorrow");
        return Ok(CheckOutcome::NoCheckout { tomorrow });
    }

    let message = MessageComposer::compose(&result, tomorrow, &settings.property_label);
    info!(%tomorrow, next_checkin = ?result.next_checkin_date, "checkout found, notifying cleaner");

    match sender.send(&settings.cleaner_destination, &message).await {
        Ok(()) => Ok(CheckOutcome::Sent { message }),
        Err(err) => {
            error!(error = %err, "failed to send cleaning notification");
            Ok(CheckOutcome::SendFailed {
                message,
                error: err,
            })
        }
    }
}
