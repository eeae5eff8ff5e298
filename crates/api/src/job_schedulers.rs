use crate::{
    calendar::SyncCalendarsUseCase, reminder::SendRemindersUseCase, shared::usecase::execute,
};
use actix_web::rt::time::{interval, sleep_until, Instant};
use frontdesk_infra::FrontdeskContext;
use std::time::Duration;
use tracing::info;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Runs the reminder sweep followed by the calendar sync every
/// `interval_minutes`, starting at the next whole minute.
pub fn start_frontdesk_jobs(ctx: FrontdeskContext, interval_minutes: u64) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut job_interval = interval(Duration::from_secs(interval_minutes.max(1) * 60));
        loop {
            job_interval.tick().await;
            info!("Running scheduled reminder sweep and calendar sync");
            let context = ctx.clone();
            actix_web::rt::spawn(run_jobs(context));
        }
    });
}

async fn run_jobs(ctx: FrontdeskContext) {
    let send_reminders = SendRemindersUseCase {
        windows: ctx.config.reminder_windows.clone(),
    };
    // Failures are logged by the use case
    let _ = execute(send_reminders, &ctx).await;

    let sync_calendars = SyncCalendarsUseCase {
        days_ahead: ctx.config.calendar_sync_days,
    };
    let _ = execute(sync_calendars, &ctx).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_works() {
        assert_eq!(get_start_delay(50 * 1000, 5), 5);
        assert_eq!(get_start_delay(50 * 1000, 10), 60);
        assert_eq!(get_start_delay(50 * 1000, 15), 55);
        assert_eq!(get_start_delay(60 * 1000, 60), 60);
        assert_eq!(get_start_delay(60 * 1000, 10), 50);
        assert_eq!(get_start_delay(59 * 1000, 0), 1);
        assert_eq!(get_start_delay(59 * 1000, 1), 60);
    }

    #[actix_web::main]
    #[test]
    async fn jobs_run_against_empty_stores() {
        let ctx = FrontdeskContext::create_inmemory();
        run_jobs(ctx).await;
    }
}
