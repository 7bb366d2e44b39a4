use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::{
    prelude::{ApiError, Result},
    token::{Claims, verify_token},
};

/// Admin gate for mutation handlers: extracting it requires a bearer token
/// carrying the admin claim, otherwise the request is rejected with 401
/// before the handler runs.
pub struct AdminUser(pub Claims);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let claims = claims_from_headers(&parts.headers)?;
        if !claims.is_admin {
            tracing::warn!("user {} denied, admin access required", claims.username);
            return Err(ApiError::Unauthorized("admin privileges required".into()));
        }
        Ok(AdminUser(claims))
    }
}

fn claims_from_headers(headers: &HeaderMap) -> Result<Claims> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("token missing, authentication denied");
            ApiError::Unauthorized("missing bearer token".into())
        })?;
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .unwrap_or(header)
        .trim();
    verify_token(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::create_token;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = claims_from_headers(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn bearer_prefix_is_stripped() -> Result<()> {
        let token = create_token("jo", true)?;
        let claims = claims_from_headers(&headers_with(&format!("Bearer {}", token)))?;
        assert_eq!(claims.username, "jo");
        Ok(())
    }

    #[test]
    fn mangled_token_is_unauthorized() {
        let err = claims_from_headers(&headers_with("Bearer nope.nope.nope")).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
