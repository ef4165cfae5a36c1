//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tutorhub_core::config::{AppConfig, ServiceRole};
use tutorhub_core::{AppError, AppResult};
use tutorhub_service::{AvailabilityService, BookingLedger, CatalogService, LocalSessionsClient};

/// Components owned by the sessions side.
#[derive(Debug, Clone)]
pub struct SessionsSide {
    /// Tutor availability management.
    pub availability: AvailabilityService,
    /// Student catalog queries.
    pub catalog: CatalogService,
    /// Backs the `/internal` RPC surface.
    pub rpc: LocalSessionsClient,
}

/// Components owned by the bookings side.
#[derive(Debug, Clone)]
pub struct BookingsSide {
    /// Booking state machine.
    pub ledger: BookingLedger,
}

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. A side is `None`
/// when the configured role does not serve it; its routes are then not
/// mounted at all.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub sessions: Option<Arc<SessionsSide>>,
    pub bookings: Option<Arc<BookingsSide>>,
}

impl AppState {
    pub fn role(&self) -> ServiceRole {
        self.config.server.role
    }

    pub fn sessions(&self) -> AppResult<&SessionsSide> {
        self.sessions
            .as_deref()
            .ok_or_else(|| AppError::internal("Sessions side is not served by this process"))
    }

    pub fn bookings(&self) -> AppResult<&BookingsSide> {
        self.bookings
            .as_deref()
            .ok_or_else(|| AppError::internal("Bookings side is not served by this process"))
    }
}
