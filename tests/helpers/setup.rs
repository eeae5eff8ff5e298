use frontdesk_api::Application;
use frontdesk_infra::{FrontdeskContext, InMemoryMessenger, StaticTimeSys};
use frontdesk_sdk::FrontdeskSDK;
use std::sync::Arc;

pub struct TestApp {
    /// Shares the repositories with the running application
    pub ctx: FrontdeskContext,
    pub messenger: Arc<InMemoryMessenger>,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, FrontdeskSDK) {
    spawn_app_with(|_| {}).await
}

/// Same as `spawn_app` but lets the test adjust the context first
pub async fn spawn_app_with<F>(configure: F) -> (TestApp, FrontdeskSDK)
where
    F: FnOnce(&mut FrontdeskContext),
{
    let mut ctx = FrontdeskContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.sys = Arc::new(StaticTimeSys {
        timestamp_millis: super::utils::NOW,
    });
    let messenger = Arc::new(InMemoryMessenger::new());
    ctx.messenger = messenger.clone();
    configure(&mut ctx);

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { ctx, messenger };
    let sdk = FrontdeskSDK::new(address);
    (app, sdk)
}
