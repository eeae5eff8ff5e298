use chrono::prelude::*;

// Record store dates are plain `YYYY-MM-DD` strings
const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_record_date(datestr: &str) -> Option<NaiveDate> {
    let datestr = datestr.trim();
    // Some records carry a full timestamp, only the date part is relevant
    let datestr = datestr.split('T').next().unwrap_or(datestr);
    NaiveDate::parse_from_str(datestr, RECORD_DATE_FORMAT).ok()
}

pub fn format_record_date(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Formats a time the way it is shown to customers, e.g. `3:05 PM`
pub fn format_time_12h(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

pub fn timestamp_to_datetime(timestamp_millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(timestamp_millis)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_parses_record_dates() {
        assert_eq!(
            parse_record_date("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            parse_record_date("2024-03-15T10:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_record_date(" 2024-02-29 "), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn it_rejects_invalid_record_dates() {
        let invalid_dates = vec!["", "2023-02-29", "15/03/2024", "2024-13-01", "tomorrow"];
        for date in &invalid_dates {
            assert!(parse_record_date(date).is_none(), "{} should be invalid", date);
        }
    }

    #[test]
    fn it_formats_weekdays() {
        assert_eq!(weekday_name(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()), "Friday");
        assert_eq!(weekday_name(NaiveDate::from_ymd_opt(2024, 3, 17).unwrap()), "Sunday");
    }

    #[test]
    fn it_formats_times() {
        assert_eq!(format_time_12h(NaiveTime::from_hms_opt(15, 5, 0).unwrap()), "3:05 PM");
        assert_eq!(format_time_12h(NaiveTime::from_hms_opt(0, 30, 0).unwrap()), "12:30 AM");
        assert_eq!(format_time_12h(NaiveTime::from_hms_opt(9, 0, 0).unwrap()), "9:00 AM");
    }

    #[test]
    fn it_round_trips_record_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_record_date(date), "2024-01-05");
        assert_eq!(parse_record_date(&format_record_date(date)), Some(date));
    }
}
