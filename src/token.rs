use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    conf::settings,
    prelude::{ApiError, Result},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub exp: usize,
}

pub fn create_token(username: &str, is_admin: bool) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .as_secs() as usize;
    let claims = Claims {
        username: username.to_string(),
        is_admin,
        exp: now + (settings.jwt_ttl_hours as usize) * 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(token)
}

pub fn verify_token(token: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| ApiError::Unauthorized(format!("invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_claims() -> Result<()> {
        let token = create_token("jo", true)?;
        let claims = verify_token(&token)?;
        assert_eq!(claims.username, "jo");
        assert!(claims.is_admin);
        Ok(())
    }

    #[test]
    fn non_admin_claim_survives() -> Result<()> {
        let claims = verify_token(&create_token("u1", false)?)?;
        assert!(!claims.is_admin);
        Ok(())
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let err = verify_token("not-a-jwt").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
