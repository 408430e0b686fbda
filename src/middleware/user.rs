use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// HTTP header identifying the caller
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity taken from the `x-user-id` header
///
/// Rejects with 401 when the header is missing or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| UserId(value.to_string()))
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", USER_ID_HEADER)))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(request: Request<()>) -> Result<UserId, AppError> {
        let (mut parts, _) = request.into_parts();
        UserId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_user_id_from_header() {
        let request = Request::builder()
            .header(USER_ID_HEADER, " alice ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap(), UserId("alice".to_string()));
    }

    #[tokio::test]
    async fn test_missing_user_id_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        assert!(matches!(extract(request).await, Err(AppError::Unauthorized(_))));

        let request = Request::builder()
            .header(USER_ID_HEADER, "   ")
            .body(())
            .unwrap();
        assert!(matches!(extract(request).await, Err(AppError::Unauthorized(_))));
    }
}
