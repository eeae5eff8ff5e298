use crate::{date::weekday_name, Appointment};
use chrono::{prelude::*, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// A `ReminderWindow` is a fixed amount of hours before an `Appointment` at
/// which the customer gets a text. Every window has its own sent flag on the
/// `Appointment` so that a reminder for a window is delivered once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum ReminderWindow {
    #[serde(rename = "48h")]
    FortyEightHours,
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "1h")]
    OneHour,
}

impl ReminderWindow {
    pub fn all() -> [ReminderWindow; 4] {
        [
            Self::FortyEightHours,
            Self::TwentyFourHours,
            Self::TwoHours,
            Self::OneHour,
        ]
    }

    pub fn hours_ahead(&self) -> i64 {
        match self {
            Self::FortyEightHours => 48,
            Self::TwentyFourHours => 24,
            Self::TwoHours => 2,
            Self::OneHour => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FortyEightHours => "48h",
            Self::TwentyFourHours => "24h",
            Self::TwoHours => "2h",
            Self::OneHour => "1h",
        }
    }

    /// The reminder text for this window
    pub fn render(&self, appointment: &Appointment) -> String {
        let name = non_empty_or(&appointment.customer_name, "there");
        let service = non_empty_or(&appointment.service, "appointment");
        let time = &appointment.time;
        let weekday = weekday_name(appointment.date);

        match self {
            Self::FortyEightHours => format!(
                "Hi {}! Excited to see you {} at {} for your {}! \u{1F60A}",
                name, weekday, time, service
            ),
            Self::TwentyFourHours => format!(
                "Hi {}! Reminder: Your {} is tomorrow, {}, at {}. Reply CONFIRM or text if you need to reschedule.",
                name, service, weekday, time
            ),
            Self::TwoHours => format!(
                "See you in 2 hours at {} for your {}! Reply if you have any questions.",
                time, service
            ),
            Self::OneHour => format!(
                "Hi {}! See you in 1 hour at {} for your {}. Reply CANCEL if you can't make it.",
                name, time, service
            ),
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

impl Display for ReminderWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidReminderWindowError {
    #[error("Unknown reminder window: `{0}`. Supported windows are 48h, 24h, 2h and 1h")]
    Unknown(String),
}

impl FromStr for ReminderWindow {
    type Err = InvalidReminderWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|w| w.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidReminderWindowError::Unknown(s.to_string()))
    }
}

/// Parses a comma separated list of window labels, e.g. `24h,1h`
pub fn parse_reminder_windows(
    windows: &str,
) -> Result<Vec<ReminderWindow>, InvalidReminderWindowError> {
    let mut parsed = Vec::new();
    for label in windows.split(',').filter(|l| !l.trim().is_empty()) {
        let window = label.parse::<ReminderWindow>()?;
        if !parsed.contains(&window) {
            parsed.push(window);
        }
    }
    Ok(parsed)
}

/// How the target instant of a `ReminderWindow` is turned into the
/// appointment dates that are due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMatchStrategy {
    /// Match the calendar date of the target instant
    SingleDay,
    /// Match the dates at the start and the end of the (UTC) hour containing
    /// the target instant. Can span two dates when the reminder timezone is
    /// not a whole hour away from UTC.
    HourBand,
}

impl DateMatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleDay => "single-day",
            Self::HourBand => "hour-band",
        }
    }
}

impl Display for DateMatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for DateMatchStrategy {
    fn default() -> Self {
        Self::SingleDay
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown date match strategy: `{0}`. Use `single-day` or `hour-band`")]
pub struct InvalidDateMatchStrategy(String);

impl FromStr for DateMatchStrategy {
    type Err = InvalidDateMatchStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single-day" => Ok(Self::SingleDay),
            "hour-band" => Ok(Self::HourBand),
            other => Err(InvalidDateMatchStrategy(other.to_string())),
        }
    }
}

/// The appointment dates that are due for `window` when sweeping at `now`
pub fn reminder_target_dates(
    now: DateTime<Utc>,
    window: ReminderWindow,
    timezone: Tz,
    strategy: DateMatchStrategy,
) -> Vec<NaiveDate> {
    let target = now + Duration::hours(window.hours_ahead());
    match strategy {
        DateMatchStrategy::SingleDay => vec![target.with_timezone(&timezone).date_naive()],
        DateMatchStrategy::HourBand => {
            let start_of_hour = target - Duration::seconds(target.timestamp() % 3600);
            let end_of_hour = start_of_hour + Duration::minutes(59) + Duration::seconds(59);
            let mut dates = vec![
                start_of_hour.with_timezone(&timezone).date_naive(),
                end_of_hour.with_timezone(&timezone).date_naive(),
            ];
            dates.dedup();
            dates
        }
    }
}
