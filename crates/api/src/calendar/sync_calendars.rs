use crate::{
    error::FrontdeskError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use anyhow::anyhow;
use chrono::Duration;
use frontdesk_api_structs::sync_calendars::APIResponse;
use frontdesk_domain::{date::timestamp_to_datetime, Business, IntegrationProvider, ID};
use frontdesk_infra::{
    get_access_token, FrontdeskContext, ICalendarProvider, MAX_CALENDAR_SYNC_DAYS,
};
use tracing::{error, info, warn};

pub async fn sync_calendars_controller(
    ctx: web::Data<FrontdeskContext>,
) -> Result<HttpResponse, FrontdeskError> {
    let usecase = SyncCalendarsUseCase {
        days_ahead: ctx.config.calendar_sync_days,
    };

    execute(usecase, &ctx)
        .await
        .map(|summary| {
            HttpResponse::Ok().json(APIResponse {
                success: true,
                message: format!("Synced {} calendars", summary.businesses),
                businesses: summary.businesses,
                created: summary.created,
                updated: summary.updated,
                failed: summary.failed,
            })
        })
        .map_err(FrontdeskError::from)
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError(anyhow::Error),
}

impl From<UseCaseError> for FrontdeskError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError(e) => Self::trigger_failed("Sync failed", e),
        }
    }
}

/// Mirrors the upcoming events of every connected calendar into appointments
#[derive(Debug)]
pub struct SyncCalendarsUseCase {
    pub days_ahead: i64,
}

#[derive(Debug, Default, PartialEq)]
pub struct SyncSummary {
    pub businesses: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SyncCalendarsUseCase {
    type Response = SyncSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncCalendars";

    async fn execute(&mut self, ctx: &FrontdeskContext) -> Result<Self::Response, Self::Error> {
        let mut summary = SyncSummary::default();

        for kind in IntegrationProvider::all().iter().copied() {
            let provider = match ctx.calendar_providers.get(kind) {
                Some(provider) => provider,
                None => {
                    warn!("The {} calendar provider is not configured, skipping sync", kind);
                    continue;
                }
            };
            let businesses = ctx
                .repos
                .businesses
                .find_calendar_synced(kind)
                .await
                .map_err(UseCaseError::StorageError)?;
            info!("Syncing {} {} calendars", businesses.len(), kind);

            for mut business in businesses {
                summary.businesses += 1;
                match self.sync_business(&mut business, provider.as_ref(), ctx).await {
                    Ok((created, updated)) => {
                        summary.created += created;
                        summary.updated += updated;
                    }
                    Err(e) => {
                        error!(
                            "Unable to sync the {} calendar of business: {}. Error: {:?}",
                            kind, business.id, e
                        );
                        summary.failed += 1;
                    }
                }
            }
        }

        Ok(summary)
    }
}

impl SyncCalendarsUseCase {
    /// Returns the number of created and updated appointments
    async fn sync_business(
        &self,
        business: &mut Business,
        provider: &dyn ICalendarProvider,
        ctx: &FrontdeskContext,
    ) -> anyhow::Result<(usize, usize)> {
        let kind = provider.provider();
        let access_token = get_access_token(business, provider, ctx)
            .await
            .ok_or_else(|| anyhow!("No valid {} access token", kind))?;

        let start = timestamp_to_datetime(ctx.sys.get_timestamp_millis());
        let end = start + Duration::days(self.days_ahead.clamp(0, MAX_CALENDAR_SYNC_DAYS));
        let events = provider
            .list_upcoming_events(&access_token, start, end)
            .await?;

        let (mut created, mut updated) = (0, 0);
        for event in events {
            let fields = event.appointment_fields(kind, &business.id, ctx.config.timezone);
            let existing = ctx
                .repos
                .appointments
                .find_id_by_external_event(kind, &event.id)
                .await?;
            match existing {
                Some(appointment_id) => {
                    ctx.repos
                        .appointments
                        .save_synced_fields(&appointment_id, &fields)
                        .await?;
                    updated += 1;
                }
                None => {
                    ctx.repos
                        .appointments
                        .insert(&fields.into_appointment(ID::new()))
                        .await?;
                    created += 1;
                }
            }
        }
        Ok((created, updated))
    }
}
