//! Authentication middleware
//!
//! Decodes the bearer JWT of every request under the API prefix and
//! attaches an [`AuthContext`] for the handlers to check permissions against.

use std::collections::HashSet;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::utils::errors::{KindergartenError, Result};

/// Permission levels for different operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Listings and get-by-id
    View,
    /// Create
    Insert,
    /// Update
    Edit,
    /// Delete
    Delete,
}

impl Permission {
    pub const ALL: [Permission; 4] = [Permission::View, Permission::Insert, Permission::Edit, Permission::Delete];
}

/// Token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Actor id
    pub sub: i64,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub exp: usize,
}

/// Authentication context for a request
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub user_id: Option<i64>,
    pub permissions: HashSet<Permission>,
}

impl AuthContext {
    /// Used when the guard is switched off: nobody in particular, allowed everything
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            permissions: Permission::ALL.into_iter().collect(),
        }
    }

    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: Some(claims.sub),
            permissions: claims.permissions.into_iter().collect(),
        }
    }

    /// Require specific permission or return error
    pub fn require(&self, permission: Permission) -> Result<()> {
        if self.permissions.contains(&permission) {
            return Ok(());
        }

        warn!(user_id = self.user_id, permission = ?permission, "Permission denied");
        Err(KindergartenError::PermissionDenied(format!(
            "Недостатньо прав для цієї дії ({:?})",
            permission
        )))
    }
}

/// Authentication middleware
#[derive(Clone)]
pub struct AuthMiddleware {
    enabled: bool,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthMiddleware {
    /// Create a new AuthMiddleware instance
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            enabled: config.enabled,
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Resolve the caller from the request headers
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext> {
        if !self.enabled {
            return Ok(AuthContext::anonymous());
        }

        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| KindergartenError::Authentication("Відсутній токен доступу".to_string()))?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Rejected access token");
            KindergartenError::Authentication("Недійсний токен доступу".to_string())
        })?;

        Ok(AuthContext::from_claims(data.claims))
    }
}

/// Sign a token for `claims`, used by operators' tooling and tests
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String> {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| KindergartenError::Internal(format!("Failed to sign token: {}", e)))
}

/// Layer function: reject unauthenticated requests, attach the context otherwise
pub async fn require_auth(State(auth): State<AuthMiddleware>, mut request: Request, next: Next) -> Response {
    match auth.authenticate(request.headers()) {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config() -> AuthConfig {
        AuthConfig {
            enabled: true,
            jwt_secret: "test-secret".to_string(),
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token)).unwrap());
        headers
    }

    fn claims(permissions: Vec<Permission>) -> Claims {
        Claims {
            sub: 7,
            permissions,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        }
    }

    #[test]
    fn test_valid_token_yields_context() {
        let auth = AuthMiddleware::new(&config());
        let token = issue_token(&claims(vec![Permission::View]), "test-secret").unwrap();

        let context = auth.authenticate(&bearer(&token)).unwrap();
        assert_eq!(context.user_id, Some(7));
        assert!(context.require(Permission::View).is_ok());
        assert!(matches!(
            context.require(Permission::Delete),
            Err(KindergartenError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_missing_or_forged_token_is_rejected() {
        let auth = AuthMiddleware::new(&config());
        assert!(matches!(
            auth.authenticate(&HeaderMap::new()),
            Err(KindergartenError::Authentication(_))
        ));

        let forged = issue_token(&claims(Permission::ALL.to_vec()), "other-secret").unwrap();
        assert!(matches!(
            auth.authenticate(&bearer(&forged)),
            Err(KindergartenError::Authentication(_))
        ));
    }

    #[test]
    fn test_disabled_guard_allows_everything() {
        let auth = AuthMiddleware::new(&AuthConfig {
            enabled: false,
            jwt_secret: String::new(),
        });
        let context = auth.authenticate(&HeaderMap::new()).unwrap();
        assert_eq!(context.user_id, None);
        for permission in Permission::ALL {
            assert!(context.require(permission).is_ok());
        }
    }
}
