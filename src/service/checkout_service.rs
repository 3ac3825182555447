use chrono::{Duration, NaiveDate};

use crate::models::decision::DecisionResult;
use crate::models::reservation::ReservationEvent;

/// How far past tomorrow a check-in is still worth mentioning.
pub const CHECKIN_LOOKAHEAD_DAYS: i64 = 3;

pub fn tomorrow_of(today: NaiveDate) -> NaiveDate {
    today + Duration::days(1)
}

/// Decides whether a confirmed stay ends tomorrow and which confirmed stay
/// starts next within `[tomorrow, tomorrow + 3 days]`.
///
/// The two answers are computed independently over the whole confirmed set.
pub fn decide(events: &[ReservationEvent], today: NaiveDate) -> DecisionResult {
    let tomorrow = tomorrow_of(today);

    let checkout_tomorrow = events
        .iter()
        .any(|event| event.is_confirmed() && event.end_date == tomorrow);

    let next_checkin_date = next_checkin(events, tomorrow).map(|event| event.start_date);

    DecisionResult {
        checkout_tomorrow,
        next_checkin_date,
    }
}

/// The confirmed stay with the earliest start in `[tomorrow, tomorrow + 3 days]`;
/// on equal starts the one listed first wins.
pub fn next_checkin(events: &[ReservationEvent], tomorrow: NaiveDate) -> Option<&ReservationEvent> {
    let window_end = tomorrow + Duration::days(CHECKIN_LOOKAHEAD_DAYS);
    // min_by_key would return the last of equal minimums.
    events
        .iter()
        .filter(|event| event.is_confirmed())
        .filter(|event| event.start_date >= tomorrow && event.start_date <= window_end)
        .fold(None, |best: Option<&ReservationEvent>, event| match best {
            Some(current) if current.start_date <= event.start_date => Some(current),
            _ => Some(event),
        })
}
