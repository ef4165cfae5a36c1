//! Request context carrying the verified caller identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tutorhub_core::types::SubjectId;
use tutorhub_core::{AppError, AppResult};
use tutorhub_entity::role::SubjectRole;

/// Who is acting, as asserted by the identity gateway.
///
/// Passed into service methods so every operation knows its actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub subject_id: SubjectId,
    pub role: SubjectRole,
    /// Display name, if the gateway supplied one.
    pub name: Option<String>,
    pub email: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(
        subject_id: SubjectId,
        role: SubjectRole,
        name: Option<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            subject_id,
            role,
            name,
            email,
            request_time: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == SubjectRole::Admin
    }

    /// Fail with `Authorization` unless the caller has `role`. Admins pass every check.
    pub fn require_role(&self, role: SubjectRole) -> AppResult<()> {
        if self.role == role || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "This action requires the {role} role"
            )))
        }
    }
}
