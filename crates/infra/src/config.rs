use frontdesk_domain::{parse_reminder_windows, DateMatchStrategy, ReminderWindow, Tz};
use tracing::{info, warn};

const DEFAULT_PORT: usize = 5000;
const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";
const DEFAULT_BUSINESSES_TABLE: &str = "Businesses";
const DEFAULT_APPOINTMENTS_TABLE: &str = "Appointments";
const DEFAULT_TWILIO_API_URL: &str = "https://api.twilio.com/2010-04-01";
const DEFAULT_REMINDER_WINDOWS: &str = "24h,1h";
const DEFAULT_CALENDAR_SYNC_DAYS: i64 = 14;
/// Furthest ahead calendar events are synced
pub const MAX_CALENDAR_SYNC_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub api_url: String,
    /// Table holding the `Business` records
    pub businesses_table: String,
    /// Table holding the `Appointment` records
    pub appointments_table: String,
}

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub api_url: String,
}

/// Credentials of the oauth client registered at a calendar provider
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Record store credentials. In-memory repositories are used when missing.
    pub airtable: Option<AirtableConfig>,
    /// Telephony credentials. Messages are only recorded in memory when missing.
    pub twilio: Option<TwilioConfig>,
    /// Sender used when a message is not sent on behalf of a specific business
    pub default_from_number: Option<String>,
    pub google: Option<OAuthClientConfig>,
    pub outlook: Option<OAuthClientConfig>,
    /// The `ReminderWindow`s checked by every reminder sweep
    pub reminder_windows: Vec<ReminderWindow>,
    pub reminder_match_strategy: DateMatchStrategy,
    /// Timezone the appointment dates and times in the record store are expressed in
    pub timezone: Tz,
    /// How many days ahead calendar events are synced
    pub calendar_sync_days: i64,
    /// When set, the server runs the reminder sweep and the calendar sync
    /// itself with this interval instead of relying on an external cron.
    pub job_scheduler_interval_minutes: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from a key lookup, e.g. the process environment
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(port) => match port.parse::<usize>() {
                Ok(port) => port,
                Err(_) => {
                    warn!(
                        "The given PORT: {} is not valid, falling back to the default port: {}.",
                        port, DEFAULT_PORT
                    );
                    DEFAULT_PORT
                }
            },
            None => DEFAULT_PORT,
        };

        let airtable = match (var("AIRTABLE_API_KEY"), var("AIRTABLE_BASE_ID")) {
            (Some(api_key), Some(base_id)) => Some(AirtableConfig {
                api_key,
                base_id,
                api_url: var("AIRTABLE_API_URL").unwrap_or_else(|| DEFAULT_AIRTABLE_API_URL.into()),
                businesses_table: var("AIRTABLE_TABLE_NAME")
                    .unwrap_or_else(|| DEFAULT_BUSINESSES_TABLE.into()),
                appointments_table: var("AIRTABLE_APPOINTMENTS_TABLE")
                    .unwrap_or_else(|| DEFAULT_APPOINTMENTS_TABLE.into()),
            }),
            _ => {
                warn!("AIRTABLE_API_KEY or AIRTABLE_BASE_ID is missing. Records will only be kept in memory.");
                None
            }
        };

        let twilio = match (var("TWILIO_ACCOUNT_SID"), var("TWILIO_AUTH_TOKEN")) {
            (Some(account_sid), Some(auth_token)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                api_url: var("TWILIO_API_URL").unwrap_or_else(|| DEFAULT_TWILIO_API_URL.into()),
            }),
            _ => {
                warn!("TWILIO_ACCOUNT_SID or TWILIO_AUTH_TOKEN is missing. Text messages will not be delivered.");
                None
            }
        };

        let oauth_client = |prefix: &str| {
            match (
                var(&format!("{}_CLIENT_ID", prefix)),
                var(&format!("{}_CLIENT_SECRET", prefix)),
                var(&format!("{}_REDIRECT_URI", prefix)),
            ) {
                (Some(client_id), Some(client_secret), Some(redirect_uri)) => {
                    Some(OAuthClientConfig {
                        client_id,
                        client_secret,
                        redirect_uri,
                    })
                }
                _ => {
                    info!("{} oauth client is not configured.", prefix);
                    None
                }
            }
        };

        let reminder_windows = var("REMINDER_WINDOWS")
            .and_then(|windows| match parse_reminder_windows(&windows) {
                Ok(windows) if !windows.is_empty() => Some(windows),
                Ok(_) => None,
                Err(e) => {
                    warn!("{}. Falling back to: {}", e, DEFAULT_REMINDER_WINDOWS);
                    None
                }
            })
            .unwrap_or_else(|| {
                parse_reminder_windows(DEFAULT_REMINDER_WINDOWS).unwrap_or_default()
            });

        let reminder_match_strategy = var("REMINDER_MATCH_STRATEGY")
            .and_then(|strategy| match strategy.parse::<DateMatchStrategy>() {
                Ok(strategy) => Some(strategy),
                Err(e) => {
                    warn!("{}. Falling back to single-day.", e);
                    None
                }
            })
            .unwrap_or_default();

        let timezone = var("REMINDER_TIMEZONE")
            .and_then(|tz| match tz.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    warn!("The given REMINDER_TIMEZONE: {} is not valid, falling back to UTC.", tz);
                    None
                }
            })
            .unwrap_or(Tz::UTC);

        let calendar_sync_days = var("CALENDAR_SYNC_DAYS")
            .and_then(|days| days.parse::<i64>().ok())
            .filter(|days| *days > 0)
            .map(|days| {
                if days > MAX_CALENDAR_SYNC_DAYS {
                    warn!(
                        "CALENDAR_SYNC_DAYS: {} is too far ahead, syncing {} days",
                        days, MAX_CALENDAR_SYNC_DAYS
                    );
                }
                days.min(MAX_CALENDAR_SYNC_DAYS)
            })
            .unwrap_or(DEFAULT_CALENDAR_SYNC_DAYS);

        let job_scheduler_interval_minutes = var("JOB_SCHEDULER_INTERVAL_MINUTES")
            .and_then(|minutes| minutes.parse::<u64>().ok())
            .filter(|minutes| *minutes > 0);

        Self {
            port,
            airtable,
            twilio,
            default_from_number: var("TWILIO_FROM_NUMBER"),
            google: oauth_client("GOOGLE"),
            outlook: oauth_client("MICROSOFT"),
            reminder_windows,
            reminder_match_strategy,
            timezone,
            calendar_sync_days,
            job_scheduler_interval_minutes,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn uses_defaults_for_empty_environment() {
        let config = config_from(&[]);
        assert_eq!(config.port, 5000);
        assert!(config.airtable.is_none());
        assert!(config.twilio.is_none());
        assert!(config.google.is_none());
        assert_eq!(
            config.reminder_windows,
            vec![ReminderWindow::TwentyFourHours, ReminderWindow::OneHour]
        );
        assert_eq!(config.reminder_match_strategy, DateMatchStrategy::SingleDay);
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.calendar_sync_days, 14);
        assert_eq!(config.job_scheduler_interval_minutes, None);
    }

    #[test]
    fn clamps_calendar_sync_days() {
        assert_eq!(
            config_from(&[("CALENDAR_SYNC_DAYS", "30")]).calendar_sync_days,
            30
        );
        assert_eq!(
            config_from(&[("CALENDAR_SYNC_DAYS", "9223372036854775807")]).calendar_sync_days,
            MAX_CALENDAR_SYNC_DAYS
        );
        assert_eq!(
            config_from(&[("CALENDAR_SYNC_DAYS", "-3")]).calendar_sync_days,
            14
        );
    }

    #[test]
    fn falls_back_to_default_port_when_invalid() {
        assert_eq!(config_from(&[("PORT", "http")]).port, 5000);
        assert_eq!(config_from(&[("PORT", "8080")]).port, 8080);
    }

    #[test]
    fn reads_airtable_config_with_default_tables() {
        let config = config_from(&[("AIRTABLE_API_KEY", "key"), ("AIRTABLE_BASE_ID", "app1")]);
        let airtable = config.airtable.unwrap();
        assert_eq!(airtable.api_url, "https://api.airtable.com/v0");
        assert_eq!(airtable.businesses_table, "Businesses");
        assert_eq!(airtable.appointments_table, "Appointments");

        let config = config_from(&[
            ("AIRTABLE_API_KEY", "key"),
            ("AIRTABLE_BASE_ID", "app1"),
            ("AIRTABLE_TABLE_NAME", "Business directory"),
        ]);
        assert_eq!(config.airtable.unwrap().businesses_table, "Business directory");
    }

    #[test]
    fn requires_all_oauth_client_values() {
        let config = config_from(&[("GOOGLE_CLIENT_ID", "id"), ("GOOGLE_CLIENT_SECRET", "s")]);
        assert!(config.google.is_none());

        let config = config_from(&[
            ("MICROSOFT_CLIENT_ID", "id"),
            ("MICROSOFT_CLIENT_SECRET", "s"),
            ("MICROSOFT_REDIRECT_URI", "https://example.com/cb"),
        ]);
        assert_eq!(config.outlook.unwrap().client_id, "id");
    }

    #[test]
    fn reads_reminder_settings() {
        let config = config_from(&[
            ("REMINDER_WINDOWS", "48h,24h,2h"),
            ("REMINDER_MATCH_STRATEGY", "hour-band"),
            ("REMINDER_TIMEZONE", "Australia/Sydney"),
            ("JOB_SCHEDULER_INTERVAL_MINUTES", "15"),
        ]);
        assert_eq!(
            config.reminder_windows,
            vec![
                ReminderWindow::FortyEightHours,
                ReminderWindow::TwentyFourHours,
                ReminderWindow::TwoHours
            ]
        );
        assert_eq!(config.reminder_match_strategy, DateMatchStrategy::HourBand);
        assert_eq!(config.timezone, frontdesk_domain::Tz::Australia__Sydney);
        assert_eq!(config.job_scheduler_interval_minutes, Some(15));
    }

    #[test]
    fn ignores_invalid_reminder_settings() {
        let config = config_from(&[
            ("REMINDER_WINDOWS", "5h"),
            ("REMINDER_MATCH_STRATEGY", "weekly"),
            ("REMINDER_TIMEZONE", "Mars/Olympus"),
            ("CALENDAR_SYNC_DAYS", "-3"),
        ]);
        assert_eq!(
            config.reminder_windows,
            vec![ReminderWindow::TwentyFourHours, ReminderWindow::OneHour]
        );
        assert_eq!(config.reminder_match_strategy, DateMatchStrategy::SingleDay);
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.calendar_sync_days, 14);
    }
}
