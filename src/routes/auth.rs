use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::routes::{ApiError, AppState};

/// Bearer token claims. `sub` carries the user's UUID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// HS256 keys shared with the identity provider
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
}

impl JwtKeys {
    pub fn new(secret: &[u8], issuer: Option<String>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(iss) = &issuer {
            validation.set_issuer(&[iss.as_str()]);
        }
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            issuer,
        }
    }

    /// Validate a token and return the user it was issued for
    pub fn verify(&self, token: &str) -> Result<Uuid, ApiError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| ApiError::Unauthorized(format!("invalid token: {}", e)))?;
        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| ApiError::Unauthorized("token subject is not a user id".to_string()))
    }

    /// Sign a token for `user_id`, valid for `ttl`
    pub fn issue(&self, user_id: Uuid, ttl: chrono::Duration) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (chrono::Utc::now() + ttl).timestamp(),
            iss: self.issuer.clone(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }
}

/// The authenticated caller, extracted from `Authorization: Bearer <jwt>`
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

impl FromRequest for CurrentUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<CurrentUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Unauthorized("authentication is not configured".to_string()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let user_id = state.auth.verify(token)?;
    Ok(CurrentUser { user_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let keys = JwtKeys::new(b"test-secret", None);
        let user = Uuid::new_v4();
        let token = keys.issue(user, chrono::Duration::hours(1)).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), user);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = JwtKeys::new(b"test-secret", None);
        let token = keys.issue(Uuid::new_v4(), chrono::Duration::hours(-2)).unwrap();
        assert!(matches!(keys.verify(&token), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtKeys::new(b"one", None)
            .issue(Uuid::new_v4(), chrono::Duration::hours(1))
            .unwrap();
        assert!(JwtKeys::new(b"two", None).verify(&token).is_err());
    }

    #[test]
    fn test_issuer_must_match() {
        let token = JwtKeys::new(b"secret", Some("someone-else".to_string()))
            .issue(Uuid::new_v4(), chrono::Duration::hours(1))
            .unwrap();
        let keys = JwtKeys::new(b"secret", Some("match-questions".to_string()));
        assert!(keys.verify(&token).is_err());
    }
}
