//! Request extractors shared by every handler

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::middleware::{client_ip, AuthContext, Permission};
use crate::models::Actor;
use crate::state::AppState;
use crate::utils::errors::{KindergartenError, Result};

/// Who is calling and from where
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub auth: AuthContext,
    pub actor: Actor,
}

impl RequestContext {
    pub fn require(&self, permission: Permission) -> Result<()> {
        self.auth.require(permission)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = KindergartenError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> std::result::Result<Self, Self::Rejection> {
        // Set by the auth layer; absent only on routes mounted outside it
        let auth = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| KindergartenError::Authentication("Відсутній токен доступу".to_string()))?;

        let address = client_ip(
            &parts.headers,
            &parts.extensions,
            state.settings.server.trust_forwarded_for,
        );
        let actor = Actor::new(auth.user_id, address);
        Ok(Self { auth, actor })
    }
}

/// JSON body whose rejections use the crate's error body
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = KindergartenError;

    async fn from_request(request: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| KindergartenError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Path parameters whose rejections use the crate's error body
pub struct PathParam<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = KindergartenError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| KindergartenError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}
