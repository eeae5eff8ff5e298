use super::IBusinessRepo;
use crate::repos::shared::inmemory_repo::*;
use anyhow::anyhow;
use frontdesk_domain::{Business, IntegrationProvider, OAuthTokens, ID};

pub struct InMemoryBusinessRepo {
    businesses: std::sync::Mutex<Vec<Business>>,
    failing: FailureToggle,
}

impl InMemoryBusinessRepo {
    pub fn new() -> Self {
        Self {
            businesses: std::sync::Mutex::new(vec![]),
            failing: FailureToggle::default(),
        }
    }

    /// Makes all following calls fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Makes all following inserts and updates fail
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing.set_writes(failing);
    }
}

#[async_trait::async_trait]
impl IBusinessRepo for InMemoryBusinessRepo {
    async fn insert(&self, business: &Business) -> anyhow::Result<ID> {
        self.failing.check_write("businesses")?;
        insert(business, &self.businesses);
        Ok(business.id.clone())
    }

    async fn find(&self, business_id: &ID) -> anyhow::Result<Option<Business>> {
        self.failing.check_read("businesses")?;
        Ok(find(business_id, &self.businesses))
    }

    async fn find_by_phone_number(&self, phone_number: &str) -> anyhow::Result<Option<Business>> {
        self.failing.check_read("businesses")?;
        Ok(find_by(&self.businesses, |b| {
            b.phone_number.as_deref() == Some(phone_number)
        })
        .into_iter()
        .next())
    }

    async fn find_calendar_synced(
        &self,
        provider: IntegrationProvider,
    ) -> anyhow::Result<Vec<Business>> {
        self.failing.check_read("businesses")?;
        Ok(find_by(&self.businesses, |b| b.calendar.syncs_with(provider)))
    }

    async fn save_calendar_connection(&self, business: &Business) -> anyhow::Result<()> {
        self.failing.check_write("businesses")?;
        let calendar = business.calendar.clone();
        if update(&business.id, &self.businesses, |b| b.calendar = calendar) {
            Ok(())
        } else {
            Err(anyhow!("Business: {} not found", business.id))
        }
    }

    async fn save_tokens(
        &self,
        business_id: &ID,
        provider: IntegrationProvider,
        tokens: &OAuthTokens,
    ) -> anyhow::Result<()> {
        self.failing.check_write("businesses")?;
        let tokens = tokens.clone();
        if update(business_id, &self.businesses, |b| {
            b.calendar.set_tokens(provider, tokens)
        }) {
            Ok(())
        } else {
            Err(anyhow!("Business: {} not found", business_id))
        }
    }
}
