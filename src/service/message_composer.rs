use chrono::NaiveDate;

use crate::models::decision::DecisionResult;
use crate::service::checkout_service::CHECKIN_LOOKAHEAD_DAYS;

const LONG_DATE: &str = "%A, %B %d, %Y";
const SHORT_DATE: &str = "%A, %B %d";

pub struct MessageComposer;

impl MessageComposer {
    pub fn compose(result: &DecisionResult, tomorrow: NaiveDate, property_label: &str) -> String {
        let mut message = format!(
            "Cleaning needed tomorrow ({}) at {}.",
            tomorrow.format(LONG_DATE),
            property_label
        );

        match result.next_checkin_date {
            Some(checkin) => {
                let days_after = (checkin - tomorrow).num_days();
                if days_after == 1 {
                    message.push_str(&format!(
                        " Next check-in is the day after tomorrow ({}).",
                        checkin.format(SHORT_DATE)
                    ));
                } else {
                    message.push_str(&format!(
                        " Next check-in is on {} ({}).",
                        checkin.format(SHORT_DATE),
                        days_after_phrase(days_after)
                    ));
                }
            }
            None => message.push_str(&format!(
                " No upcoming check-ins in the next {} days.",
                CHECKIN_LOOKAHEAD_DAYS
            )),
        }
        message
    }
}

fn days_after_phrase(days: i64) -> String {
    match days {
        0 => "the same day as the cleaning".to_string(),
        n => format!("{} days after tomorrow", n),
    }
}
