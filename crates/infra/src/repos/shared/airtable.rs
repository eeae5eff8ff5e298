use crate::config::AirtableConfig;
use anyhow::anyhow;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::error;
use url::Url;

// https://airtable.com/developers/web/api/list-records

/// A row of an Airtable table
#[derive(Debug, Deserialize)]
pub struct AirtableRecord<T> {
    pub id: String,
    pub fields: T,
}

#[derive(Debug, Deserialize)]
struct ListRecordsResponse<T> {
    records: Vec<AirtableRecord<T>>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Serialize)]
struct FieldsBody<'a, F> {
    fields: &'a F,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter_by_formula: Option<String>,
    pub sort: Option<(String, SortDirection)>,
}

impl ListQuery {
    pub fn filter(formula: impl Into<String>) -> Self {
        Self {
            filter_by_formula: Some(formula.into()),
            sort: None,
        }
    }

    pub fn sorted_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Some((field.to_string(), direction));
        self
    }

    fn params(&self, offset: Option<&str>) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(formula) = &self.filter_by_formula {
            params.push(("filterByFormula".to_string(), formula.clone()));
        }
        if let Some((field, direction)) = &self.sort {
            params.push(("sort[0][field]".to_string(), field.clone()));
            params.push((
                "sort[0][direction]".to_string(),
                direction.as_str().to_string(),
            ));
        }
        if let Some(offset) = offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        params
    }
}

/// Minimal Airtable REST client scoped to a single base
pub struct AirtableClient {
    client: Client,
    api_url: String,
    api_key: String,
    base_id: String,
}

impl AirtableClient {
    pub fn new(config: &AirtableConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            base_id: config.base_id.clone(),
        }
    }

    fn table_url(&self, table: &str, record_id: Option<&str>) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.api_url)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("Airtable api url: {} can not be a base", self.api_url))?;
            segments.pop_if_empty().push(&self.base_id).push(table);
            if let Some(record_id) = record_id {
                segments.push(record_id);
            }
        }
        Ok(url)
    }

    /// Lists every record matching the query, following the pagination offsets
    pub async fn list<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &ListQuery,
    ) -> anyhow::Result<Vec<AirtableRecord<T>>> {
        let url = self.table_url(table, None)?;
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let res = self
                .client
                .get(url.clone())
                .bearer_auth(&self.api_key)
                .query(&query.params(offset.as_deref()))
                .send()
                .await
                .and_then(|res| res.error_for_status())
                .map_err(|e| {
                    error!(
                        "[Network Error] Airtable list records in table: {} with query: {:?} failed. Error message: {:?}",
                        table, query, e
                    );
                    anyhow::Error::new(e)
                })?;
            let page = res
                .json::<ListRecordsResponse<T>>()
                .await
                .map_err(|e| {
                    error!(
                        "[Unexpected Response] Airtable list records in table: {}. Error message: {:?}",
                        table, e
                    );
                    anyhow::Error::new(e)
                })?;
            records.extend(page.records);
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }
        Ok(records)
    }

    pub async fn find<T: DeserializeOwned>(
        &self,
        table: &str,
        record_id: &str,
    ) -> anyhow::Result<Option<AirtableRecord<T>>> {
        let url = self.table_url(table, Some(record_id))?;
        let res = self.client.get(url).bearer_auth(&self.api_key).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record = res.error_for_status()?.json::<AirtableRecord<T>>().await?;
        Ok(Some(record))
    }

    /// Patches only the given fields of the record
    pub async fn update<F: Serialize>(
        &self,
        table: &str,
        record_id: &str,
        fields: &F,
    ) -> anyhow::Result<()> {
        let url = self.table_url(table, Some(record_id))?;
        self.client
            .patch(url)
            .bearer_auth(&self.api_key)
            .json(&FieldsBody { fields })
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| {
                error!(
                    "Airtable update of record: {} in table: {} failed. Error message: {:?}",
                    record_id, table, e
                );
                anyhow::Error::new(e)
            })?;
        Ok(())
    }

    /// Creates a record and returns the id Airtable assigned to it
    pub async fn create<F: Serialize>(&self, table: &str, fields: &F) -> anyhow::Result<String> {
        #[derive(Deserialize)]
        struct CreatedRecord {
            id: String,
        }

        let url = self.table_url(table, None)?;
        let created = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&FieldsBody { fields })
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| {
                error!(
                    "Airtable create record in table: {} failed. Error message: {:?}",
                    table, e
                );
                anyhow::Error::new(e)
            })?
            .json::<CreatedRecord>()
            .await?;
        Ok(created.id)
    }
}

/// Helpers for building `filterByFormula` expressions
pub mod formula {
    /// Quotes a value as a formula string literal
    pub fn quote(value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
    }

    pub fn eq(field: &str, value: &str) -> String {
        format!("{{{}}} = {}", field, quote(value))
    }

    pub fn is_true(field: &str) -> String {
        format!("{{{}}} = TRUE()", field)
    }

    pub fn is_false(field: &str) -> String {
        format!("{{{}}} = FALSE()", field)
    }

    pub fn not_empty(field: &str) -> String {
        format!("NOT({{{}}} = '')", field)
    }

    pub fn and(clauses: &[String]) -> String {
        format!("AND({})", clauses.join(", "))
    }

    pub fn or(clauses: &[String]) -> String {
        format!("OR({})", clauses.join(", "))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn builds_formulas() {
            assert_eq!(eq("Status", "Scheduled"), "{Status} = 'Scheduled'");
            assert_eq!(eq("Customer Name", "O'Brien"), "{Customer Name} = 'O\\'Brien'");
            assert_eq!(
                and(&[is_true("Calendar Sync Enabled"), not_empty("Customer Phone")]),
                "AND({Calendar Sync Enabled} = TRUE(), NOT({Customer Phone} = ''))"
            );
            assert_eq!(
                or(&[eq("Status", "Scheduled"), eq("Status", "Confirmed")]),
                "OR({Status} = 'Scheduled', {Status} = 'Confirmed')"
            );
            assert_eq!(is_false("Reminder 1h Sent"), "{Reminder 1h Sent} = FALSE()");
        }
    }
}
