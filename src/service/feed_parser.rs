use chrono::{NaiveDate, NaiveDateTime};
use icalendar::{Calendar, CalendarComponent, Component};
use tracing::{debug, warn};

use crate::errors::CheckError;
use crate::models::reservation::{DEFAULT_TITLE, ReservationEvent};

/// Reads every VEVENT of an iCalendar document, in feed order.
///
/// Events whose DTSTART or DTEND is missing or unreadable are skipped with a
/// warning. Only a document that cannot be read as iCalendar at all is an error.
pub fn parse_events(raw: &str) -> Result<Vec<ReservationEvent>, CheckError> {
    let has_calendar = raw
        .lines()
        .any(|line| line.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR"));
    if !has_calendar {
        return Err(CheckError::Feed("missing BEGIN:VCALENDAR".to_string()));
    }

    // A line the iCalendar grammar rejects fails the whole document, not one event.
    let calendar: Calendar = raw
        .parse()
        .map_err(|e| CheckError::Feed(format!("{}", e)))?;

    let mut events = Vec::new();
    for component in &calendar.components {
        let CalendarComponent::Event(event) = component else {
            continue;
        };
        let title = event.get_summary().unwrap_or(DEFAULT_TITLE).to_string();
        let uid = event.get_uid().unwrap_or_default();
        let start = event
            .properties()
            .get("DTSTART")
            .and_then(|p| parse_calendar_date(p.value()));
        let end = event
            .properties()
            .get("DTEND")
            .and_then(|p| parse_calendar_date(p.value()));

        match (start, end) {
            (Some(start_date), Some(end_date)) => {
                debug!(%title, %start_date, %end_date, "parsed event");
                events.push(ReservationEvent::new(title, start_date, end_date));
            }
            (start, end) => {
                warn!(
                    %title,
                    uid,
                    has_start = start.is_some(),
                    has_end = end.is_some(),
                    "skipping event with missing or malformed dates"
                );
            }
        }
    }
    Ok(events)
}

/// Accepts `YYYYMMDD` or a floating/UTC `YYYYMMDDTHHMMSS[Z]`; the time of day is dropped.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() == 8 {
        return NaiveDate::parse_from_str(value, "%Y%m%d").ok();
    }
    let format = if value.ends_with('Z') {
        "%Y%m%dT%H%M%SZ"
    } else {
        "%Y%m%dT%H%M%S"
    };
    NaiveDateTime::parse_from_str(value, format)
        .ok()
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_date_and_datetime_values() {
        assert_eq!(parse_calendar_date("20250311"), Some(date(2025, 3, 11)));
        assert_eq!(parse_calendar_date("20250311T230000"), Some(date(2025, 3, 11)));
        assert_eq!(parse_calendar_date("20250311T050000Z"), Some(date(2025, 3, 11)));
        assert_eq!(parse_calendar_date("2025031"), None);
        assert_eq!(parse_calendar_date("20251311"), None);
        assert_eq!(parse_calendar_date("tomorrow"), None);
    }

    #[test]
    fn keeps_feed_order_and_defaults_title() {
        let raw = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Airbnb Inc//Hosting Calendar 1.0//EN\r\n\
BEGIN:VEVENT\r\n\
UID:b@airbnb.com\r\n\
DTSTART;VALUE=DATE:20250313\r\n\
DTEND;VALUE=DATE:20250315\r\n\
SUMMARY:Reserved\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:a@airbnb.com\r\n\
DTSTART:20250304T160000\r\n\
DTEND:20250309T110000\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let events = parse_events(raw).unwrap();
        assert_eq!(
            events,
            vec![
                ReservationEvent::new("Reserved", date(2025, 3, 13), date(2025, 3, 15)),
                ReservationEvent::new(DEFAULT_TITLE, date(2025, 3, 4), date(2025, 3, 9)),
            ]
        );
    }

    #[test]
    fn stray_line_inside_event_rejects_document() {
        let raw = "BEGIN:VCALENDAR\n\
VERSION:2.0\n\
BEGIN:VEVENT\n\
UID:odd\n\
garbage line\n\
DTSTART;VALUE=DATE:20250313\n\
DTEND;VALUE=DATE:20250315\n\
SUMMARY:Reserved\n\
END:VEVENT\n\
END:VCALENDAR\n";

        assert!(matches!(parse_events(raw), Err(CheckError::Feed(_))));
    }

    #[test]
    fn document_without_calendar_is_rejected() {
        let err = parse_events("<html>Not found</html>").unwrap_err();
        assert_eq!(err, CheckError::Feed("missing BEGIN:VCALENDAR".to_string()));
    }

    #[test]
    fn skips_event_with_bad_date() {
        let raw = "BEGIN:VCALENDAR\n\
VERSION:2.0\n\
BEGIN:VEVENT\n\
UID:bad\n\
DTSTART;VALUE=DATE:2025-03-13\n\
DTEND;VALUE=DATE:20250315\n\
SUMMARY:Reserved\n\
END:VEVENT\n\
BEGIN:VEVENT\n\
UID:good\n\
DTSTART;VALUE=DATE:20250316\n\
DTEND;VALUE=DATE:20250318\n\
SUMMARY:Reserved\n\
END:VEVENT\n\
END:VCALENDAR\n";

        let events = parse_events(raw).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start_date, date(2025, 3, 16));
    }
}
