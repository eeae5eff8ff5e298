use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use frontdesk_domain::{EventStart, ProviderCalendarEvent};
use reqwest::Client;
use serde::Deserialize;
use tracing::error;

// https://developers.google.com/calendar/v3/reference/events/list

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventDateTime {
    #[serde(default)]
    date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventAttendee {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    organizer: bool,
    #[serde(rename = "self", default)]
    is_self: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCalendarEvent {
    pub id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    start: GoogleEventDateTime,
    #[serde(default)]
    attendees: Vec<GoogleEventAttendee>,
}

impl GoogleCalendarEvent {
    pub fn into_provider_event(self) -> Option<ProviderCalendarEvent> {
        let start = match (self.start.date_time, self.start.date) {
            (Some(date_time), _) => EventStart::DateTime(date_time),
            (None, Some(date)) => EventStart::AllDay(date),
            (None, None) => return None,
        };
        // The calendar owner shows up as an attendee too, the customer is someone else
        let attendee = self
            .attendees
            .into_iter()
            .find(|a| !a.is_self && !a.organizer);
        let description = match (self.description, self.location) {
            (Some(d), Some(l)) => Some(format!("{}\n{}", d, l)),
            (d, l) => d.or(l),
        };
        Some(ProviderCalendarEvent {
            id: self.id,
            title: self.summary,
            start,
            attendee_name: attendee.as_ref().and_then(|a| a.display_name.clone()),
            attendee_email: attendee.and_then(|a| a.email),
            description,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListEventsResponse {
    #[serde(default)]
    items: Vec<GoogleCalendarEvent>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub email: String,
}

pub struct GoogleCalendarRestApi<'a> {
    client: &'a Client,
    access_token: &'a str,
}

impl<'a> GoogleCalendarRestApi<'a> {
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
            .query(query)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| {
                error!(
                    "[Network Error] Google API GET {} error. Error message: {:?}",
                    url, e
                );
                anyhow::Error::new(e)
            })?;
        res.json::<T>().await.map_err(|e| {
            error!(
                "[Unexpected Response] Google API GET {} error. Error message: {:?}",
                url, e
            );
            anyhow::Error::new(e)
        })
    }

    pub async fn user_info(&self, userinfo_url: &str) -> anyhow::Result<UserInfo> {
        self.get(userinfo_url, &[]).await
    }

    /// Expanded single events of the primary calendar in the time range
    pub async fn list_events(
        &self,
        calendar_api_url: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<GoogleCalendarEvent>> {
        let url = format!("{}/calendars/primary/events", calendar_api_url);
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![
                (
                    "timeMin",
                    start.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                ("timeMax", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }
            let page: ListEventsResponse = self.get(&url, &query).await?;
            events.extend(page.items);
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn maps_timed_event_with_customer_attendee() {
        let event: GoogleCalendarEvent = serde_json::from_value(serde_json::json!({
            "id": "evt1",
            "summary": "Color consultation",
            "description": "Customer phone 555-123-4567",
            "start": { "dateTime": "2024-03-15T15:30:00Z" },
            "attendees": [
                { "email": "owner@bloom.example", "self": true, "organizer": true },
                { "email": "grace@example.com", "displayName": "Grace Hopper" }
            ]
        }))
        .unwrap();
        let event = event.into_provider_event().unwrap();
        assert_eq!(
            event.start,
            EventStart::DateTime(Utc.with_ymd_and_hms(2024, 3, 15, 15, 30, 0).unwrap())
        );
        assert_eq!(event.attendee_name.as_deref(), Some("Grace Hopper"));
        assert_eq!(event.attendee_email.as_deref(), Some("grace@example.com"));
        assert_eq!(
            event.description.as_deref(),
            Some("Customer phone 555-123-4567")
        );
    }

    #[test]
    fn maps_all_day_event() {
        let event: GoogleCalendarEvent = serde_json::from_value(serde_json::json!({
            "id": "evt2",
            "start": { "date": "2024-03-18" }
        }))
        .unwrap();
        let event = event.into_provider_event().unwrap();
        assert_eq!(
            event.start,
            EventStart::AllDay(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap())
        );
        assert_eq!(event.title, None);
        assert_eq!(event.attendee_name, None);
    }
}
