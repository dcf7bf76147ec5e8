use std::{sync::Arc, time::Duration};

use herald::{ApiServer, AppState, Config};
use herald_common::{logging, tracing::info};
use herald_dispatch::{
    Dispatcher, HttpGateway, HttpStatusReporter, SettingsProvider, SettingsStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config_path = std::env::var("HERALD_CONFIG")
        .unwrap_or_else(|_| "./herald.config.toml".to_string());
    let config = Config::load(&config_path)?;

    let settings = Arc::new(SettingsStore::new());
    let gateway = HttpGateway::new(
        config.gateway.url.clone(),
        Duration::from_secs(config.gateway.timeout_secs),
    )?;
    let reporter = HttpStatusReporter::new(
        config.origin.url.clone(),
        Duration::from_secs(config.origin.timeout_secs),
        config.origin.policy,
    )?;

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(gateway),
        Arc::new(reporter),
        Arc::clone(&settings) as Arc<dyn SettingsProvider>,
        config.dispatch.policy,
        config.dispatch.batch_size,
    ));

    let state = AppState {
        dispatcher: Arc::clone(&dispatcher),
        settings,
    };

    let server = ApiServer::bind(&config.server.listen, state).await?;
    server
        .serve(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    // Let in-flight retry ladders finish before the process exits; jobs
    // dropped mid-ladder would never reach the origin system.
    info!("draining in-flight dispatches");
    dispatcher.drain().await;

    Ok(())
}
