//! Student-facing session catalog entities.

pub mod model;
pub mod view;

pub use model::{Session, SessionStatus};
pub use view::{EnrollmentCount, SessionFilter, SessionSnapshot, SessionView};
