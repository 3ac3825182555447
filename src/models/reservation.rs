use chrono::NaiveDate;

pub const DEFAULT_TITLE: &str = "No Title";
const CONFIRMED_MARKER: &str = "reserved";

/// One calendar entry, reduced to its title and plain dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationEvent {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ReservationEvent {
    pub fn new(title: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            start_date,
            end_date,
        }
    }

    /// A guest stay, as opposed to a host-side block.
    pub fn is_confirmed(&self) -> bool {
        self.title.to_lowercase().contains(CONFIRMED_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn confirmed_matches_case_insensitively() {
        assert!(ReservationEvent::new("Reserved", day(1), day(2)).is_confirmed());
        assert!(ReservationEvent::new("RESERVED - John", day(1), day(2)).is_confirmed());
        assert!(ReservationEvent::new("Not reserved?", day(1), day(2)).is_confirmed());
    }

    #[test]
    fn blocks_are_not_confirmed() {
        assert!(!ReservationEvent::new("Airbnb (Not available)", day(1), day(2)).is_confirmed());
        assert!(!ReservationEvent::new("Blocked", day(1), day(2)).is_confirmed());
        assert!(!ReservationEvent::new(DEFAULT_TITLE, day(1), day(2)).is_confirmed());
    }
}
