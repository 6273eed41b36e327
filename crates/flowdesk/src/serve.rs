// SPDX-FileCopyrightText: 2026 Flowdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `flowdesk serve` command.
//!
//! Wires storage, the completion provider, the order flow, the agent
//! service, and the channel adapters, then serves the HTTP gateway until
//! a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use flowdesk_agent::AgentService;
use flowdesk_config::FlowdeskConfig;
use flowdesk_core::traits::{CompletionProvider, Notifier, Store};
use flowdesk_core::FlowdeskError;
use flowdesk_gateway::{start_server, AppState, HubNotifier, NotifyHub};
use flowdesk_openai::OpenAiProvider;
use flowdesk_orders::{OrderFlow, ServiceCatalog, Suggester};
use flowdesk_storage::SqliteStore;
use flowdesk_telegram::TelegramFleet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Runs the `flowdesk serve` command.
pub async fn run_serve(config: FlowdeskConfig) -> Result<(), FlowdeskError> {
    // Initialize tracing subscriber.
    init_tracing(&config.agent.log_level);

    info!("starting flowdesk serve");

    // Initialize storage.
    let store = {
        let store = SqliteStore::new(config.storage.clone());
        store.initialize().await?;
        Arc::new(store)
    };

    // Initialize the completion provider.
    let provider: Arc<dyn CompletionProvider> = {
        let p = OpenAiProvider::new(&config.provider).map_err(|e| {
            error!(error = %e, "failed to initialize OpenAI provider");
            eprintln!(
                "error: OpenAI API key required. Set provider.api_key in config or the \
                 OPENAI_API_KEY environment variable."
            );
            e
        })?;
        Arc::new(p)
    };

    // Notifications persist first, then fan out to websocket subscribers.
    let hub = Arc::new(NotifyHub::new());
    let notifier: Arc<dyn Notifier> = Arc::new(HubNotifier::new(store.clone(), hub.clone()));

    // Order-taking chatbot. Suggestion calls use the provider defaults;
    // agent replies override them per plan.
    let catalog = ServiceCatalog::from_config(&config.orders.services);
    let suggester = Suggester::new(
        provider.clone(),
        config.provider.default_model.clone(),
        config.provider.temperature,
    );
    let flow = Arc::new(OrderFlow::new(
        store.clone(),
        catalog,
        suggester,
        notifier.clone(),
    ));

    // Metered agent sessions.
    let agents = Arc::new(AgentService::new(
        store.clone(),
        provider.clone(),
        config.agent.default_plan.clone(),
        config.provider.temperature,
    ));

    // Telegram fleet: resume polling for every persisted binding. A bad
    // binding must not keep the rest of the fleet down.
    let fleet = if config.telegram.enabled {
        let fleet = Arc::new(TelegramFleet::new(agents.clone()));
        let bindings = store.list_telegram_bindings().await?;
        for (bot_token, agent_session_id) in &bindings {
            if let Err(e) = fleet.launch(bot_token).await {
                warn!(
                    session_id = %agent_session_id,
                    error = %e,
                    "failed to resume Telegram polling for binding"
                );
            }
        }
        info!(
            bindings = bindings.len(),
            active = fleet.active().await,
            "telegram fleet started"
        );
        Some(fleet)
    } else {
        info!("telegram channel disabled by configuration");
        None
    };

    // Install signal handler.
    let cancel = install_signal_handler();

    // Spawn the draft expiry sweep.
    {
        let flow = flow.clone();
        let sweep_cancel = cancel.clone();
        let max_idle = Duration::from_secs(config.orders.draft_max_idle_secs);
        let sweep_interval = Duration::from_secs(config.orders.sweep_interval_secs);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);
            // Skip the first immediate tick.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        flow.drafts().sweep(max_idle).await;
                    }
                    _ = sweep_cancel.cancelled() => {
                        info!("draft expiry sweep shutting down");
                        break;
                    }
                }
            }
        });
        info!(
            max_idle_secs = config.orders.draft_max_idle_secs,
            interval_secs = config.orders.sweep_interval_secs,
            "draft expiry sweep started"
        );
    }

    // Serve the gateway until a signal arrives.
    let state = AppState {
        flow,
        agents,
        store: store.clone(),
        provider,
        notifier,
        hub,
        fleet: fleet.clone(),
    };
    let host = config.server.host.clone();
    let port = config.server.port;
    let mut server = tokio::spawn(async move { start_server(&host, port, state).await });

    let outcome = tokio::select! {
        result = &mut server => match result {
            Ok(inner) => inner,
            Err(e) => Err(FlowdeskError::Internal(format!("gateway task failed: {e}"))),
        },
        _ = cancel.cancelled() => {
            server.abort();
            Ok(())
        }
    };

    // Stop polling loops before reporting how the server ended.
    if let Some(fleet) = &fleet {
        fleet.shutdown().await;
    }
    outcome?;

    info!("flowdesk serve shutdown complete");
    Ok(())
}

/// Installs handlers for SIGTERM and SIGINT (Ctrl+C).
///
/// Returns a [`CancellationToken`] that is cancelled when either signal
/// arrives; every background task watches it.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let watcher = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT (Ctrl+C), shutting down"),
                        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "cannot install SIGTERM handler, listening for Ctrl+C only");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), shutting down");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, shutting down");
        }

        watcher.cancel();
    });

    token
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flowdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
