use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stexam::auth::store::SessionStore;
use stexam::auth::AuthContext;
use stexam::backend::{BackendConfig, ChatWebhook, HttpWebhook, RemoteStore, SupabaseBackend};
use stexam::common::AppContext;
use stexam::ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BackendConfig::from_env()
        .context("STEXAM_BACKEND_URL and STEXAM_ANON_KEY must both be set")?;
    let store: Arc<dyn RemoteStore> = Arc::new(SupabaseBackend::new(config));
    let webhook: Arc<dyn ChatWebhook> = Arc::new(HttpWebhook::new());

    let sessions = SessionStore::from_home().context("unable to locate a home directory")?;
    let auth = Arc::new(AuthContext::new(store.clone(), sessions));
    let ctx = AppContext::new(store, webhook, auth);

    info!("stexam client starting");
    ui::run(ctx).await?;
    Ok(())
}
