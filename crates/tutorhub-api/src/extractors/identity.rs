//! `Identity` extractor: reads the caller identity asserted by the gateway.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use tutorhub_core::AppError;
use tutorhub_core::types::SubjectId;
use tutorhub_entity::role::SubjectRole;
use tutorhub_service::RequestContext;

use crate::error::ApiError;

pub const SUBJECT_ID_HEADER: &str = "x-subject-id";
pub const SUBJECT_ROLE_HEADER: &str = "x-subject-role";
pub const SUBJECT_NAME_HEADER: &str = "x-subject-name";
pub const SUBJECT_EMAIL_HEADER: &str = "x-subject-email";

/// Verified caller context available in handlers.
#[derive(Debug, Clone)]
pub struct Identity(pub RequestContext);

impl Identity {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for Identity {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let subject_id = header(parts, SUBJECT_ID_HEADER)
            .ok_or_else(|| AppError::authentication("Missing x-subject-id header"))?;

        let role: SubjectRole = header(parts, SUBJECT_ROLE_HEADER)
            .ok_or_else(|| AppError::authentication("Missing x-subject-role header"))?
            .parse()
            .map_err(|_| AppError::authentication("Unrecognized x-subject-role"))?;

        let ctx = RequestContext::new(
            SubjectId::new(subject_id),
            role,
            header(parts, SUBJECT_NAME_HEADER).map(String::from),
            header(parts, SUBJECT_EMAIL_HEADER).map(String::from),
        );
        Ok(Identity(ctx))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use tutorhub_core::ErrorKind;

    async fn extract(request: Request<()>) -> Result<Identity, ApiError> {
        let (mut parts, _) = request.into_parts();
        Identity::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_reads_identity_headers() {
        let request = Request::builder()
            .header(SUBJECT_ID_HEADER, "tut-7")
            .header(SUBJECT_ROLE_HEADER, "Tutor")
            .header(SUBJECT_NAME_HEADER, "Grace")
            .body(())
            .unwrap();

        let identity = extract(request).await.unwrap();
        assert_eq!(identity.subject_id.as_str(), "tut-7");
        assert_eq!(identity.role, SubjectRole::Tutor);
        assert_eq!(identity.name.as_deref(), Some("Grace"));
        assert!(identity.email.is_none());
    }

    #[tokio::test]
    async fn test_missing_subject_is_authentication_error() {
        let request = Request::builder()
            .header(SUBJECT_ROLE_HEADER, "student")
            .body(())
            .unwrap();
        let err = extract(request).await.unwrap_err();
        assert_eq!(err.0.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let request = Request::builder()
            .header(SUBJECT_ID_HEADER, "x")
            .header(SUBJECT_ROLE_HEADER, "janitor")
            .body(())
            .unwrap();
        let err = extract(request).await.unwrap_err();
        assert_eq!(err.0.kind, ErrorKind::Authentication);
    }
}
