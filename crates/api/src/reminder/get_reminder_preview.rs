use crate::{
    error::FrontdeskError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use frontdesk_api_structs::get_reminder_preview::{APIResponse, WindowPreviewDTO};
use frontdesk_domain::{
    date::{format_record_date, timestamp_to_datetime},
    reminder_target_dates, DateMatchStrategy, ReminderWindow, Tz,
};
use frontdesk_infra::FrontdeskContext;

pub async fn get_reminder_preview_controller(
    ctx: web::Data<FrontdeskContext>,
) -> Result<HttpResponse, FrontdeskError> {
    let usecase = GetReminderPreviewUseCase {
        windows: ctx.config.reminder_windows.clone(),
        timezone: ctx.config.timezone,
        strategy: ctx.config.reminder_match_strategy,
    };

    execute(usecase, &ctx)
        .await
        .map(|preview| HttpResponse::Ok().json(preview.into_api_response()))
        .map_err(FrontdeskError::from)
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for FrontdeskError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

/// Shows which appointment dates the next reminder sweep would look for.
/// Reads nothing from the record store.
#[derive(Debug)]
pub struct GetReminderPreviewUseCase {
    pub windows: Vec<ReminderWindow>,
    pub timezone: Tz,
    pub strategy: DateMatchStrategy,
}

#[derive(Debug)]
pub struct WindowPreview {
    pub window: ReminderWindow,
    pub target: DateTime<Utc>,
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug)]
pub struct ReminderPreview {
    pub now: DateTime<Utc>,
    pub timezone: Tz,
    pub strategy: DateMatchStrategy,
    pub windows: Vec<WindowPreview>,
}

fn utc_string(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl ReminderPreview {
    fn local_string(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.timezone)
            .to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    fn into_api_response(self) -> APIResponse {
        let looking_for = self
            .windows
            .iter()
            .map(|preview| {
                let date_strings: Vec<String> =
                    preview.dates.iter().copied().map(format_record_date).collect();
                let dto = WindowPreviewDTO {
                    target_date_time: utc_string(preview.target),
                    date_string: date_strings.first().cloned().unwrap_or_default(),
                    date_strings,
                    local_time: self.local_string(preview.target),
                };
                (preview.window.label().to_string(), dto)
            })
            .collect();

        APIResponse {
            current_time: utc_string(self.now),
            timezone: self.timezone.name().to_string(),
            local_time: self.local_string(self.now),
            strategy: self.strategy.to_string(),
            looking_for,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetReminderPreviewUseCase {
    type Response = ReminderPreview;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminderPreview";

    async fn execute(&mut self, ctx: &FrontdeskContext) -> Result<Self::Response, Self::Error> {
        let now = timestamp_to_datetime(ctx.sys.get_timestamp_millis());

        let windows = self
            .windows
            .iter()
            .map(|window| WindowPreview {
                window: *window,
                target: now + Duration::hours(window.hours_ahead()),
                dates: reminder_target_dates(now, *window, self.timezone, self.strategy),
            })
            .collect();

        Ok(ReminderPreview {
            now,
            timezone: self.timezone,
            strategy: self.strategy,
            windows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use frontdesk_infra::StaticTimeSys;
    use std::sync::Arc;

    fn ctx_at(instant: DateTime<Utc>) -> FrontdeskContext {
        let mut ctx = FrontdeskContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {
            timestamp_millis: instant.timestamp_millis(),
        });
        ctx
    }

    #[actix_web::main]
    #[test]
    async fn previews_targets_in_reminder_timezone() {
        let ctx = ctx_at(Utc.with_ymd_and_hms(2024, 3, 14, 10, 0, 0).unwrap());
        let usecase = GetReminderPreviewUseCase {
            windows: vec![ReminderWindow::TwentyFourHours, ReminderWindow::OneHour],
            timezone: Tz::Australia__Sydney,
            strategy: DateMatchStrategy::SingleDay,
        };

        let res = execute(usecase, &ctx).await.unwrap().into_api_response();
        assert_eq!(res.current_time, "2024-03-14T10:00:00.000Z");
        assert_eq!(res.timezone, "Australia/Sydney");
        assert_eq!(res.local_time, "2024-03-14T21:00:00+11:00");
        assert_eq!(res.strategy, "single-day");
        assert_eq!(res.looking_for.len(), 2);

        let day_ahead = &res.looking_for["24h"];
        assert_eq!(day_ahead.target_date_time, "2024-03-15T10:00:00.000Z");
        assert_eq!(day_ahead.local_time, "2024-03-15T21:00:00+11:00");
        assert_eq!(day_ahead.date_string, "2024-03-15");

        let hour_ahead = &res.looking_for["1h"];
        assert_eq!(hour_ahead.target_date_time, "2024-03-14T11:00:00.000Z");
        assert_eq!(hour_ahead.date_strings, vec!["2024-03-14".to_string()]);
    }

    #[actix_web::main]
    #[test]
    async fn hour_band_lists_both_dates() {
        let ctx = ctx_at(Utc.with_ymd_and_hms(2024, 3, 13, 18, 10, 0).unwrap());
        let usecase = GetReminderPreviewUseCase {
            windows: vec![ReminderWindow::TwentyFourHours],
            timezone: Tz::Asia__Kolkata,
            strategy: DateMatchStrategy::HourBand,
        };

        let res = execute(usecase, &ctx).await.unwrap().into_api_response();
        let day_ahead = &res.looking_for["24h"];
        assert_eq!(day_ahead.date_string, "2024-03-14");
        assert_eq!(
            day_ahead.date_strings,
            vec!["2024-03-14".to_string(), "2024-03-15".to_string()]
        );
        assert_eq!(res.strategy, "hour-band");
    }
}
