mod airtable;
mod inmemory;

pub use airtable::AirtableBusinessRepo;
use frontdesk_domain::{Business, IntegrationProvider, OAuthTokens, ID};
pub use inmemory::InMemoryBusinessRepo;

#[async_trait::async_trait]
pub trait IBusinessRepo: Send + Sync {
    async fn insert(&self, business: &Business) -> anyhow::Result<ID>;
    async fn find(&self, business_id: &ID) -> anyhow::Result<Option<Business>>;
    /// The business that owns the given telephony number
    async fn find_by_phone_number(&self, phone_number: &str) -> anyhow::Result<Option<Business>>;
    /// Businesses that have connected the given provider and enabled syncing
    async fn find_calendar_synced(
        &self,
        provider: IntegrationProvider,
    ) -> anyhow::Result<Vec<Business>>;
    /// Persists the calendar provider, email, sync flag and tokens of the business
    async fn save_calendar_connection(&self, business: &Business) -> anyhow::Result<()>;
    async fn save_tokens(
        &self,
        business_id: &ID,
        provider: IntegrationProvider,
        tokens: &OAuthTokens,
    ) -> anyhow::Result<()>;
}
