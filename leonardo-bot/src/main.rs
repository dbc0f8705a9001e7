use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use leonardo_bot::config::BotConfig;
use leonardo_bot::logging;
use leonardo_bot::notification::{ChatClient, DiscordClient, ErrorReporter, MessageLifecycle};
use leonardo_bot::plan::HttpPlanSource;
use leonardo_bot::scheduler::Scheduler;
use leonardo_bot::utils::http_client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = BotConfig::parse();
    let _log_guard = logging::init_logging(config.verbose, config.log_dir.as_deref())?;
    config.validate()?;

    info!(config = ?config, "leonardo-bot starting");

    let timeout = config.request_timeout();
    let client = http_client::build_client(timeout);

    let discord: Arc<dyn ChatClient> =
        Arc::new(DiscordClient::new(config.discord(), client.clone()));
    let user = discord.current_user().await.context("Discord login failed")?;
    info!(user = %user, "Logged in to Discord");

    let source = HttpPlanSource::new(client, config.source_url()?, timeout);
    let scheduler = Scheduler::new(
        source,
        MessageLifecycle::new(discord.clone(), config.main_channel(), timeout),
        ErrorReporter::new(discord, config.error_channel(), timeout),
        config.interval(),
    );

    let shutdown = CancellationToken::new();
    if let Some(log_dir) = config.log_dir.clone() {
        logging::start_retention_cleanup(log_dir, shutdown.clone());
    }

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, stopping after the current tick");
                signal_token.cancel();
            }
            Err(e) => error!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });

    scheduler.run(shutdown).await;

    info!("leonardo-bot stopped");
    Ok(())
}
