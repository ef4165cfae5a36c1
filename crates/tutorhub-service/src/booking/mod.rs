//! Booking ledger and its background reconciliation.

pub mod ledger;
pub mod reconciler;

pub use ledger::{BookingLedger, BookingRequest};
pub use reconciler::{BookingReconciler, ReconcileReport};
