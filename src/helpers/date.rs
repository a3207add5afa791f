//! Date helper functions

use chrono::{NaiveDateTime, TimeZone, Utc};

/// Human-readable date, e.g. "Jul 08, 2022"
pub fn display_date(date: &NaiveDateTime) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Machine-readable date for `<time datetime>`
pub fn date_iso(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// RFC 2822 date for RSS, treating the naive date as UTC
pub fn date_rfc2822(date: &NaiveDateTime) -> String {
    Utc.from_utc_datetime(date).to_rfc2822()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 7, 8)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(&date()), "Jul 08, 2022");
        assert_eq!(date_iso(&date()), "2022-07-08");
    }

    #[test]
    fn test_date_rfc2822() {
        assert_eq!(date_rfc2822(&date()), "Fri, 8 Jul 2022 00:00:00 +0000");
    }
}
