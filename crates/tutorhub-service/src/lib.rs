//! # tutorhub-service
//!
//! Business logic for the booking and availability subsystem. Services
//! take their stores and collaborators at construction time and act on
//! behalf of a [`RequestContext`].
//!
//! The sessions side ([`AvailabilityService`], [`CatalogService`], and
//! [`LocalSessionsClient`] serving the internal RPC surface) owns slots and
//! sessions. The bookings side ([`BookingLedger`], [`CoordinationFacade`],
//! [`BookingReconciler`]) reaches them only through a [`SessionsClient`],
//! in-process or over HTTP.

pub mod availability;
pub mod booking;
pub mod context;
pub mod coordination;
pub mod sessions;

pub use availability::AvailabilityService;
pub use booking::{BookingLedger, BookingReconciler};
pub use context::RequestContext;
pub use coordination::{CoordinationFacade, HttpSessionsClient, LocalSessionsClient, SessionsClient};
pub use sessions::CatalogService;
