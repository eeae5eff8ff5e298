use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};
use frontdesk_domain::{EventStart, ProviderCalendarEvent, Tz};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, warn};

// https://docs.microsoft.com/en-us/graph/api/resources/datetimetimezone?view=graph-rest-1.0
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookCalendarEventTime {
    /// A single point of time in a combined date and time representation ({date}T{time}; for example, 2017-08-29T04:00:00.0000000).
    date_time: String,
    #[serde(default)]
    time_zone: Option<String>,
}

impl OutlookCalendarEventTime {
    fn naive(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date_time, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }

    /// Events are requested in UTC, so the naive date time is a UTC one
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        Some(Utc.from_utc_datetime(&self.naive()?))
    }

    /// All-day events start at midnight of the zone they were created in.
    /// When the start was shifted to UTC the date is taken in that zone, or
    /// from the nearest midnight when the zone is not an IANA name.
    fn to_all_day_date(&self, original_zone: Option<&str>) -> Option<NaiveDate> {
        let naive = self.naive()?;
        if naive.time().num_seconds_from_midnight() == 0 {
            return Some(naive.date());
        }
        match original_zone.and_then(|zone| zone.trim().parse::<Tz>().ok()) {
            Some(tz) => Some(Utc.from_utc_datetime(&naive).with_timezone(&tz).date_naive()),
            None => Some((naive + Duration::hours(12)).date()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookEmailAddress {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookAttendee {
    email_address: OutlookEmailAddress,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookCalendarEventBody {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookCalendarEvent {
    pub id: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    body_preview: Option<String>,
    #[serde(default)]
    body: Option<OutlookCalendarEventBody>,
    start: OutlookCalendarEventTime,
    #[serde(default)]
    original_start_time_zone: Option<String>,
    #[serde(default)]
    is_all_day: bool,
    #[serde(default)]
    attendees: Vec<OutlookAttendee>,
}

impl OutlookCalendarEvent {
    pub fn into_provider_event(self) -> Option<ProviderCalendarEvent> {
        let Self {
            id,
            subject,
            body_preview,
            body,
            start,
            original_start_time_zone,
            is_all_day,
            attendees,
        } = self;
        let parsed = if is_all_day {
            start
                .to_all_day_date(original_start_time_zone.as_deref())
                .map(EventStart::AllDay)
        } else {
            start.to_utc().map(EventStart::DateTime)
        };
        let start = match parsed {
            Some(start) => start,
            None => {
                warn!(
                    "Ignoring outlook event: {} with unreadable start: {:?} ({:?})",
                    id, start.date_time, start.time_zone
                );
                return None;
            }
        };
        let attendee = attendees.into_iter().next().map(|a| a.email_address);
        let description = body_preview
            .filter(|p| !p.trim().is_empty())
            .or_else(|| body.and_then(|b| b.content));
        Some(ProviderCalendarEvent {
            id,
            title: subject,
            start,
            attendee_name: attendee.as_ref().and_then(|a| a.name.clone()),
            attendee_email: attendee.and_then(|a| a.address),
            description,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListEventsResponse {
    #[serde(default)]
    value: Vec<OutlookCalendarEvent>,
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphUser {
    #[serde(default)]
    mail: Option<String>,
    #[serde(default)]
    user_principal_name: Option<String>,
}

impl GraphUser {
    /// Personal accounts have no `mail`, only the principal name
    pub fn email(self) -> Option<String> {
        self.mail
            .filter(|m| !m.is_empty())
            .or(self.user_principal_name)
    }
}

pub struct OutlookCalendarRestApi<'a> {
    client: &'a Client,
    access_token: &'a str,
}

impl<'a> OutlookCalendarRestApi<'a> {
    pub fn new(client: &'a Client, access_token: &'a str) -> Self {
        Self {
            client,
            access_token,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let res = self
            .client
            .get(url)
            .bearer_auth(self.access_token)
            .header("Prefer", "outlook.timezone=\"UTC\"")
            .query(query)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| {
                error!(
                    "[Network Error] Outlook API GET {} error. Error message: {:?}",
                    url, e
                );
                anyhow::Error::new(e)
            })?;
        res.json::<T>().await.map_err(|e| {
            error!(
                "[Unexpected Response] Outlook API GET {} error. Error message: {:?}",
                url, e
            );
            anyhow::Error::new(e)
        })
    }

    pub async fn me(&self, graph_api_url: &str) -> anyhow::Result<GraphUser> {
        self.get(&format!("{}/me", graph_api_url), &[]).await
    }

    pub async fn list_events(
        &self,
        graph_api_url: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<OutlookCalendarEvent>> {
        let filter = format!(
            "start/dateTime ge '{}' and start/dateTime le '{}'",
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        let mut page: ListEventsResponse = self
            .get(
                &format!("{}/me/calendar/events", graph_api_url),
                &[
                    ("$filter", filter),
                    ("$orderby", "start/dateTime".to_string()),
                ],
            )
            .await?;
        let mut events = std::mem::take(&mut page.value);
        // The next link already carries the query
        while let Some(next_link) = page.next_link.take() {
            page = self.get(&next_link, &[]).await?;
            events.append(&mut page.value);
        }
        Ok(events)
    }
}
