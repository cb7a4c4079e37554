use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use velo_catalog::AttributeSelection;
use velo_configurator::{Configurator, ConfiguratorService};
use velo_store::{BroadcastNotifier, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let catalog = velo_store::load_configured_catalog(&config.catalog)?;

    let notifier = BroadcastNotifier::new(config.notifications.channel_capacity);
    let mut events = notifier.subscribe();
    let service = ConfiguratorService::new(Configurator::new(catalog), Arc::new(notifier));

    let selection: AttributeSelection = match std::env::args().nth(1) {
        Some(json) => serde_json::from_str(&json)
            .context("Selection must be a JSON object of attribute keys to option labels")?,
        None => AttributeSelection::new(),
    };

    let result = service.configure_selection(&selection).await?;
    if let Ok(event) = events.try_recv() {
        tracing::debug!("Published {:?}", event);
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
