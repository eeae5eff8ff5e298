use super::IBusinessRepo;
use crate::repos::shared::{
    airtable::{formula, AirtableClient, AirtableRecord, ListQuery},
    fields::{self, business as field},
};
use chrono::{DateTime, SecondsFormat};
use frontdesk_domain::{
    date::timestamp_to_datetime, Business, BusinessCalendarSettings, IntegrationProvider,
    OAuthTokens, ID,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Default, Deserialize, Serialize)]
struct BusinessRecordFields {
    #[serde(rename = "Business Name", default)]
    name: String,
    #[serde(rename = "Owner Phone Number", default, skip_serializing_if = "Option::is_none")]
    owner_phone: Option<String>,
    #[serde(rename = "Twilio Phone Number", default, skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(rename = "Booking Link", default, skip_serializing_if = "Option::is_none")]
    booking_link: Option<String>,
    #[serde(rename = "SMS Template", default, skip_serializing_if = "Option::is_none")]
    sms_template: Option<String>,
    #[serde(rename = "Calendar Type", default, skip_serializing_if = "Option::is_none")]
    calendar_type: Option<String>,
    #[serde(rename = "Calendar Email", default, skip_serializing_if = "Option::is_none")]
    calendar_email: Option<String>,
    #[serde(rename = "Calendar Sync Enabled", default)]
    calendar_sync_enabled: bool,
    #[serde(rename = "Google Access Token", default, skip_serializing_if = "Option::is_none")]
    google_access_token: Option<String>,
    #[serde(rename = "Google Refresh Token", default, skip_serializing_if = "Option::is_none")]
    google_refresh_token: Option<String>,
    #[serde(rename = "Google Token Expiry", default, skip_serializing_if = "Option::is_none")]
    google_token_expiry: Option<String>,
    #[serde(rename = "Microsoft Access Token", default, skip_serializing_if = "Option::is_none")]
    microsoft_access_token: Option<String>,
    #[serde(rename = "Microsoft Refresh Token", default, skip_serializing_if = "Option::is_none")]
    microsoft_refresh_token: Option<String>,
    #[serde(rename = "Microsoft Token Expiry", default, skip_serializing_if = "Option::is_none")]
    microsoft_token_expiry: Option<String>,
}

fn format_expiry(timestamp_millis: i64) -> String {
    timestamp_to_datetime(timestamp_millis).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Tokens without a readable expiry are treated as expired so they get refreshed
fn parse_tokens(
    access_token: Option<String>,
    refresh_token: Option<String>,
    expiry: Option<String>,
) -> Option<OAuthTokens> {
    let access_token = access_token.filter(|t| !t.is_empty())?;
    let access_token_expires_ts = expiry
        .as_deref()
        .and_then(|expiry| DateTime::parse_from_rfc3339(expiry).ok())
        .map(|expiry| expiry.timestamp_millis())
        .unwrap_or(0);
    Some(OAuthTokens {
        access_token,
        refresh_token: refresh_token.unwrap_or_default(),
        access_token_expires_ts,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn to_business(record: AirtableRecord<BusinessRecordFields>) -> Option<Business> {
    let AirtableRecord { id, fields: f } = record;
    let id = match id.parse::<ID>() {
        Ok(id) => id,
        Err(e) => {
            warn!("Skipping business record: {}. {}", id, e);
            return None;
        }
    };
    let provider = f
        .calendar_type
        .as_deref()
        .and_then(IntegrationProvider::from_calendar_type);

    Some(Business {
        id,
        name: f.name,
        owner_phone: non_empty(f.owner_phone),
        phone_number: non_empty(f.phone_number),
        booking_link: non_empty(f.booking_link),
        sms_template: non_empty(f.sms_template),
        calendar: BusinessCalendarSettings {
            provider,
            email: non_empty(f.calendar_email),
            sync_enabled: f.calendar_sync_enabled,
            google: parse_tokens(
                f.google_access_token,
                f.google_refresh_token,
                f.google_token_expiry,
            ),
            outlook: parse_tokens(
                f.microsoft_access_token,
                f.microsoft_refresh_token,
                f.microsoft_token_expiry,
            ),
        },
    })
}

fn tokens_patch(provider: IntegrationProvider, tokens: &OAuthTokens, patch: &mut Map<String, Value>) {
    let (access, refresh, expiry) = fields::token_fields(provider);
    patch.insert(access.into(), json!(tokens.access_token));
    patch.insert(refresh.into(), json!(tokens.refresh_token));
    patch.insert(
        expiry.into(),
        json!(format_expiry(tokens.access_token_expires_ts)),
    );
}

pub struct AirtableBusinessRepo {
    client: Arc<AirtableClient>,
    table: String,
}

impl AirtableBusinessRepo {
    pub fn new(client: Arc<AirtableClient>, table: String) -> Self {
        Self { client, table }
    }

    async fn list(&self, query: ListQuery) -> anyhow::Result<Vec<Business>> {
        let records = self
            .client
            .list::<BusinessRecordFields>(&self.table, &query)
            .await?;
        Ok(records.into_iter().filter_map(to_business).collect())
    }
}

#[async_trait::async_trait]
impl IBusinessRepo for AirtableBusinessRepo {
    async fn insert(&self, business: &Business) -> anyhow::Result<ID> {
        let mut patch = Map::new();
        patch.insert(field::NAME.into(), json!(business.name));
        let optional = [
            (field::OWNER_PHONE, &business.owner_phone),
            (field::PHONE_NUMBER, &business.phone_number),
            (field::BOOKING_LINK, &business.booking_link),
            (field::SMS_TEMPLATE, &business.sms_template),
        ];
        for (name, value) in optional.iter() {
            if let Some(value) = value {
                patch.insert(name.to_string(), json!(value));
            }
        }
        let record_id = self.client.create(&self.table, &Value::Object(patch)).await?;
        let id = record_id.parse::<ID>()?;
        if business.calendar.provider.is_some() {
            let mut stored = business.clone();
            stored.id = id.clone();
            self.save_calendar_connection(&stored).await?;
        }
        Ok(id)
    }

    async fn find(&self, business_id: &ID) -> anyhow::Result<Option<Business>> {
        let record = self
            .client
            .find::<BusinessRecordFields>(&self.table, business_id.as_str())
            .await?;
        Ok(record.and_then(to_business))
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> anyhow::Result<Option<Business>> {
        let query = ListQuery::filter(formula::eq(field::PHONE_NUMBER, phone_number));
        Ok(self.list(query).await?.into_iter().next())
    }

    async fn find_calendar_synced(
        &self,
        provider: IntegrationProvider,
    ) -> anyhow::Result<Vec<Business>> {
        let query = ListQuery::filter(formula::and(&[
            formula::eq(field::CALENDAR_TYPE, provider.calendar_type()),
            formula::is_true(field::CALENDAR_SYNC_ENABLED),
        ]));
        let businesses = self.list(query).await?;
        Ok(businesses
            .into_iter()
            .filter(|b| b.calendar.syncs_with(provider))
            .collect())
    }

    async fn save_calendar_connection(&self, business: &Business) -> anyhow::Result<()> {
        let calendar = &business.calendar;
        let mut patch = Map::new();
        patch.insert(
            field::CALENDAR_TYPE.into(),
            json!(calendar.provider.map(|p| p.calendar_type())),
        );
        patch.insert(field::CALENDAR_EMAIL.into(), json!(calendar.email));
        patch.insert(
            field::CALENDAR_SYNC_ENABLED.into(),
            json!(calendar.sync_enabled),
        );
        for provider in IntegrationProvider::all().iter() {
            if let Some(tokens) = calendar.tokens(*provider) {
                tokens_patch(*provider, tokens, &mut patch);
            }
        }
        self.client
            .update(&self.table, business.id.as_str(), &Value::Object(patch))
            .await
    }

    async fn save_tokens(
        &self,
        business_id: &ID,
        provider: IntegrationProvider,
        tokens: &OAuthTokens,
    ) -> anyhow::Result<()> {
        let mut patch = Map::new();
        tokens_patch(provider, tokens, &mut patch);
        self.client
            .update(&self.table, business_id.as_str(), &Value::Object(patch))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AirtableConfig;
    use wiremock::{
        matchers::{body_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn repo(server: &MockServer) -> AirtableBusinessRepo {
        let client = AirtableClient::new(&AirtableConfig {
            api_key: "key".into(),
            base_id: "app1".into(),
            api_url: server.uri(),
            businesses_table: "Businesses".into(),
            appointments_table: "Appointments".into(),
        });
        AirtableBusinessRepo::new(Arc::new(client), "Businesses".into())
    }

    #[tokio::test]
    async fn finds_business_by_dialed_number() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app1/Businesses"))
            .and(query_param(
                "filterByFormula",
                "{Twilio Phone Number} = '+15550009999'",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [{
                    "id": "recBiz1",
                    "fields": {
                        "Business Name": "Bloom Salon",
                        "Owner Phone Number": "+15550001234",
                        "Twilio Phone Number": "+15550009999",
                        "Booking Link": "https://book.example/bloom",
                        "SMS Template": "",
                        "Calendar Type": "Microsoft 365",
                        "Calendar Sync Enabled": true,
                        "Microsoft Access Token": "access",
                        "Microsoft Refresh Token": "refresh",
                        "Microsoft Token Expiry": "2024-03-15T10:00:00.000Z"
                    }
                }]
            })))
            .mount(&server)
            .await;

        let business = repo(&server)
            .find_by_phone_number("+15550009999")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(business.name, "Bloom Salon");
        assert_eq!(business.owner_phone.as_deref(), Some("+15550001234"));
        assert_eq!(business.sms_template, None);
        assert!(business.calendar.syncs_with(IntegrationProvider::Outlook));
        let tokens = business
            .calendar
            .tokens(IntegrationProvider::Outlook)
            .unwrap();
        assert_eq!(tokens.refresh_token, "refresh");
        assert_eq!(tokens.access_token_expires_ts, 1710496800000);
        assert!(business.calendar.tokens(IntegrationProvider::Google).is_none());
    }

    #[tokio::test]
    async fn saves_refreshed_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/app1/Businesses/recBiz1"))
            .and(body_json(json!({
                "fields": {
                    "Google Access Token": "new-access",
                    "Google Refresh Token": "refresh",
                    "Google Token Expiry": "2024-03-15T10:00:00.000Z"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "recBiz1", "fields": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = OAuthTokens {
            access_token: "new-access".into(),
            refresh_token: "refresh".into(),
            access_token_expires_ts: 1710496800000,
        };
        repo(&server)
            .save_tokens(&"recBiz1".parse().unwrap(), IntegrationProvider::Google, &tokens)
            .await
            .unwrap();
    }
}
