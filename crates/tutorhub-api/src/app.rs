//! Application builder: wires stores, services, router, and middleware,
//! and runs the server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::middleware::from_fn;
use tokio::sync::{broadcast, watch};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use tutorhub_core::config::AppConfig;
use tutorhub_core::events::{DomainEvent, EventBus};
use tutorhub_core::{AppError, AppResult};
use tutorhub_entity::policy::AvailabilityPolicy;
use tutorhub_service::{
    AvailabilityService, BookingLedger, BookingReconciler, CatalogService, CoordinationFacade,
    HttpSessionsClient, LocalSessionsClient, SessionsClient,
};
use tutorhub_store::{BookingStore, SessionCatalog, SlotStore, TutorStatsStore};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::{AppState, BookingsSide, SessionsSide};

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// The wired application plus its background collaborators.
#[derive(Debug)]
pub struct Wiring {
    pub state: AppState,
    /// Present when this process serves bookings and reconciliation is on.
    pub reconciler: Option<BookingReconciler>,
}

/// Construct stores and services for the configured role.
///
/// A combined process coordinates in-process through
/// [`LocalSessionsClient`]; a bookings-only process calls the remote
/// sessions service over HTTP.
pub fn wire(config: AppConfig, events: EventBus) -> AppResult<Wiring> {
    let role = config.server.role;

    let sessions = role.serves_sessions().then(|| {
        let slots = SlotStore::new(AvailabilityPolicy::from(&config.availability));
        let catalog = SessionCatalog::new();
        Arc::new(SessionsSide {
            availability: AvailabilityService::new(slots.clone(), catalog.clone(), events.clone()),
            catalog: CatalogService::new(catalog.clone()),
            rpc: LocalSessionsClient::new(slots, catalog, events.clone()),
        })
    });

    let mut reconciler = None;
    let bookings = if role.serves_bookings() {
        let client: Arc<dyn SessionsClient> = match &sessions {
            Some(side) => Arc::new(side.rpc.clone()),
            None => Arc::new(HttpSessionsClient::from_config(&config.coordination)?),
        };
        let store = BookingStore::new();
        let facade = CoordinationFacade::from_config(Arc::clone(&client), &config.coordination);
        let ledger = BookingLedger::new(
            store.clone(),
            TutorStatsStore::new(),
            facade,
            config.booking.clone(),
            events,
        );
        if config.coordination.reconcile_enabled {
            reconciler = Some(BookingReconciler::new(
                store,
                client,
                config.coordination.reconcile_interval(),
            ));
        }
        Some(Arc::new(BookingsSide { ledger }))
    } else {
        None
    };

    Ok(Wiring {
        state: AppState {
            config: Arc::new(config),
            sessions,
            bookings,
        },
        reconciler,
    })
}

/// Runs the TutorHub server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!(
        role = %config.server.role,
        "Starting TutorHub v{}",
        env!("CARGO_PKG_VERSION")
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let events = EventBus::default();
    tokio::spawn(log_events(events.subscribe()));

    let Wiring { state, reconciler } = wire(config, events)?;

    // ── Shutdown channel & reconciler ────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reconciler_handle = reconciler.map(|reconciler| {
        let cancel = shutdown_rx.clone();
        tokio::spawn(async move { reconciler.run(cancel).await })
    });

    // ── HTTP server ──────────────────────────────────────────────
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("TutorHub listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = reconciler_handle
        && tokio::time::timeout(grace, handle).await.is_err()
    {
        warn!(grace_seconds = grace.as_secs(), "Reconciler did not stop in time");
    }

    info!("TutorHub stopped");
    Ok(())
}

async fn log_events(mut rx: broadcast::Receiver<DomainEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => debug!(
                event_id = %event.id,
                actor = ?event.actor_id,
                payload = ?event.payload,
                "Domain event"
            ),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped = skipped, "Event logger lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
