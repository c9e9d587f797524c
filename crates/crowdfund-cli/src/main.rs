use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crowdfund_core::app::{
    AppBuilder, AppConfig, CampaignService, CompletionLoop, LogFormat, Schedule,
};
use crowdfund_core::impls::{BrokerConfig, InMemoryCampaignRepository, InMemoryEventBus};
use crowdfund_core::ports::{Clock, SystemClock};
use crowdfund_core::wire::{
    CreateCampaignRequest, DeleteCampaignRequest, GetCampaignsByOwnerRequest,
    UpdateCampaignRequest, WireCategory,
};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Walk one campaign through create → update → list → delete.
async fn run_demo(service: &CampaignService) -> anyhow::Result<()> {
    let created = service
        .create_campaign(CreateCampaignRequest {
            owner_id: 1,
            title: "Community garden".into(),
            description: "Raised beds for the school yard".into(),
            target_amount: 5_000,
            deadline: Some(Utc::now() + Duration::days(14)),
            category: WireCategory::Community as i32,
            min_donation: 10,
        })
        .await?
        .campaign;
    info!(campaign = %serde_json::to_string(&created)?, "demo: created");

    let updated = service
        .update_campaign_by_id(UpdateCampaignRequest {
            id: created.id.clone(),
            owner_id: created.owner_id,
            target_amount: 7_500,
            ..Default::default()
        })
        .await?
        .campaign;
    info!(target_amount = updated.target_amount, "demo: updated");

    let listed = service
        .get_campaigns_by_owner(GetCampaignsByOwnerRequest {
            owner_id: created.owner_id,
        })
        .await?;
    info!(count = listed.campaigns.len(), "demo: listed");

    let deleted = service
        .delete_campaign_by_id(DeleteCampaignRequest { id: created.id })
        .await?;
    info!(id = %deleted.id, owner_id = deleted.owner_id, "demo: deleted");
    Ok(())
}

/// Run the scheduler and event relay until `shutdown` resolves, then stop
/// both and close the broker client.
async fn serve(
    service: Arc<CampaignService>,
    bus: Arc<InMemoryEventBus>,
    clock: Arc<dyn Clock>,
    schedule: Schedule,
    demo: bool,
    shutdown: impl Future<Output = ()>,
) {
    let mut events = bus.subscribe();
    let relay = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(message) => info!(
                    routing_key = %message.routing_key,
                    bytes = message.payload.len(),
                    "event delivered"
                ),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event relay lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let completion = CompletionLoop::spawn(Arc::clone(&service), clock, schedule);

    if demo && let Err(err) = run_demo(&service).await {
        error!(error = %err, "demo failed");
    }

    shutdown.await;
    info!("shutdown requested");

    completion.shutdown_and_join().await;
    service.flush_events().await;
    bus.close();
    relay.abort();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    // subscribers see every message; nothing needs to be retained
    let broker = BrokerConfig {
        history: 0,
        ..config.broker.clone()
    };
    let bus = Arc::new(InMemoryEventBus::connect(broker).context("failed to open broker client")?);
    let repository = Arc::new(InMemoryCampaignRepository::new(Arc::clone(&clock)));
    let service = Arc::new(
        AppBuilder::new()
            .repository(repository)
            .publisher(bus.clone())
            .clock(Arc::clone(&clock))
            .build()?,
    );
    info!(exchange = bus.exchange(), schedule = %config.schedule, "campaign service ready");

    let demo = std::env::args().any(|arg| arg == "--demo");
    serve(service, bus, clock, config.schedule, demo, shutdown_signal()).await;
    info!("bye");
    Ok(())
}
