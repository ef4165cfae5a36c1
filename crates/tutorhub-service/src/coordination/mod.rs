//! Coordination between the booking ledger and the sessions side.

pub mod client;
pub mod facade;
pub mod http;
pub mod local;

pub use client::{BookSlotRequest, SeatRequest, SessionsClient, UnbookSlotRequest};
pub use facade::{CancelOutcome, ConfirmOutcome, CoordinationFacade};
pub use http::HttpSessionsClient;
pub use local::LocalSessionsClient;
