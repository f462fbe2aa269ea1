//! Access guard middleware for session token validation
//!
//! An absent credential and an invalid one are different failure classes:
//! no Authorization header yields 401, a header that is malformed or carries
//! a bad/expired token yields 403.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Identity of the authenticated caller, inserted into request extensions
#[derive(Debug, Clone)]
pub struct AuthAccount {
    pub id: Uuid,
    pub email: String,
}

/// Pull the bearer token out of an Authorization header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, ApiError> {
    let header = header.ok_or(ApiError::Unauthorized)?;
    header.strip_prefix("Bearer ").ok_or(ApiError::Forbidden)
}

/// Authentication middleware guarding the protected routes
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let token = bearer_token(header)?;

    let claims = state.jwt.verify(token).map_err(|_| ApiError::Forbidden)?;

    req.extensions_mut().insert(AuthAccount {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_header_is_unauthorized() {
        assert!(matches!(bearer_token(None), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn non_bearer_header_is_forbidden() {
        assert!(matches!(
            bearer_token(Some("Basic dXNlcjpwdw==")),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn bearer_header_yields_token() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }
}
