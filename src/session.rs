use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::Duration;
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "user_id";

/// Caller identity taken from the session cookie. The value is opaque and
/// is not checked against the users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser(pub String);

impl SessionUser {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let jar = CookieJar::from_headers(headers);
        match jar.get(SESSION_COOKIE).map(|c| c.value()) {
            Some(value) if !value.is_empty() => Ok(Self(value.to_owned())),
            _ => Err(AppError::Unauthorized),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identity as a UUID, if it is one. Ids that do not parse cannot own
    /// any stored row.
    pub fn as_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.0).ok()
    }
}

/// Rejects the request with `401` before any handler runs when the session
/// cookie is absent; otherwise makes the [`SessionUser`] available as an
/// extension.
pub async fn require_session(mut request: Request, next: Next) -> Result<Response, AppError> {
    let user = match SessionUser::from_headers(request.headers()) {
        Ok(u) => u,
        Err(e) => {
            warn!(uri = %request.uri(), "request without session cookie");
            return Err(e);
        }
    };
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn session_cookie(user_id: Uuid, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    fn headers_with(cookie: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(COOKIE, cookie.parse().unwrap());
        h
    }

    #[test]
    fn resolves_user_from_cookie() {
        let user = SessionUser::from_headers(&headers_with("theme=dark; user_id=abc-123")).unwrap();
        assert_eq!(user.as_str(), "abc-123");
        assert!(user.as_uuid().is_none());
    }

    #[test]
    fn missing_cookie_is_unauthorized() {
        let err = SessionUser::from_headers(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));

        let err = SessionUser::from_headers(&headers_with("theme=dark")).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn empty_cookie_is_unauthorized() {
        let err = SessionUser::from_headers(&headers_with("user_id=")).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn issued_cookie_is_scoped_to_root_for_one_day() {
        let id = Uuid::new_v4();
        let cookie = session_cookie(id, 86_400);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), id.to_string());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(86_400)));
    }
}
