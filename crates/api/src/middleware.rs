use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use trackline_core::Error;
use trackline_service::UserService;

use crate::app::errors;
use crate::context::Actor;

#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserService>,
}

/// Resolves the bearer token to an [`Actor`] extension.
///
/// Anything wrong with the token itself is reported as invalid credentials;
/// a valid token whose subject no longer exists surfaces as a missing user.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token.to_string(),
        Err(err) => return errors::error_response(err),
    };

    match state.users.authenticate(&token).await {
        Ok(user) => {
            req.extensions_mut().insert(Actor(user));
            next.run(req).await
        }
        Err(err) => errors::error_response(err),
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Error> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(Error::InvalidToken)?;

    let header = header.to_str().map_err(|_| Error::InvalidToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(Error::InvalidToken)?
        .trim();

    if token.is_empty() {
        return Err(Error::InvalidToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), Err(Error::InvalidToken));

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Err(Error::InvalidToken));

        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Err(Error::InvalidToken));

        headers.insert(AUTHORIZATION, "Bearer tok123".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Ok("tok123"));
    }
}
