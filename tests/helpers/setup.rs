use notely_api::Application;
use notely_infra::{
    InMemoryEmailProvider, InMemorySmsProvider, InMemoryUserDirectory, NotelyContext,
};
use std::sync::Arc;

pub struct TestApp {
    /// Shares its repos and providers with the running application, so
    /// tests can seed reminders and inspect what got stored
    pub ctx: NotelyContext,
    pub address: String,
    pub email: Arc<InMemoryEmailProvider>,
    pub sms: Arc<InMemorySmsProvider>,
    pub directory: Arc<InMemoryUserDirectory>,
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    spawn_app_with_ctx(test_context()).await
}

/// Same as `spawn_app` but with the dispatch route locked behind a key
pub async fn spawn_protected_app(dispatch_key: &str) -> TestApp {
    let mut ctx = test_context();
    ctx.config.dispatch_key = Some(dispatch_key.to_string());
    spawn_app_with_ctx(ctx).await
}

fn test_context() -> NotelyContext {
    let mut ctx = NotelyContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx
}

async fn spawn_app_with_ctx(mut ctx: NotelyContext) -> TestApp {
    let email = Arc::new(InMemoryEmailProvider::new());
    let sms = Arc::new(InMemorySmsProvider::new());
    let directory = Arc::new(InMemoryUserDirectory::new());
    ctx.providers.email = email.clone();
    ctx.providers.sms = sms.clone();
    ctx.providers.directory = directory.clone();

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

    TestApp {
        ctx,
        address,
        email,
        sms,
        directory,
    }
}
