// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use barberbook_core::{BarberError, WorkingHours};
use chrono::NaiveTime;

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Every open day needs valid `HH:MM` times with opening before closing.
/// Closed days are not checked.
pub fn validate_working_hours(hours: &WorkingHours) -> Result<(), BarberError> {
    for (day, entry) in hours {
        if entry.closed {
            continue;
        }
        let (Some(open), Some(close)) = (parse_time(&entry.open), parse_time(&entry.close)) else {
            return Err(BarberError::Validation(format!(
                "Invalid time for {day}, use HH:MM"
            )));
        };
        if open >= close {
            return Err(BarberError::Validation(format!(
                "Opening time must be before closing time on {day}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use barberbook_core::{DayHours, Weekday};

    fn day(open: &str, close: &str, closed: bool) -> DayHours {
        DayHours {
            open: open.into(),
            close: close.into(),
            closed,
        }
    }

    #[test]
    fn accepts_regular_week() {
        let mut hours = WorkingHours::new();
        hours.insert(Weekday::Monday, day("09:00", "17:00", false));
        hours.insert(Weekday::Sunday, day("", "", true));
        assert!(validate_working_hours(&hours).is_ok());
    }

    #[test]
    fn rejects_inverted_and_malformed_times() {
        let mut inverted = WorkingHours::new();
        inverted.insert(Weekday::Friday, day("18:00", "09:00", false));
        let err = validate_working_hours(&inverted).unwrap_err();
        assert!(err.user_message().contains("friday"));

        let mut malformed = WorkingHours::new();
        malformed.insert(Weekday::Tuesday, day("9am", "17:00", false));
        assert!(validate_working_hours(&malformed).is_err());
    }
}
