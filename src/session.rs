// src/session.rs
//! Client-side session marker kept in the shared cookie jar

use crate::types::UserType;
use crate::utils::cookie_value;
use anyhow::{Context, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, warn};

pub const USER_TYPE_COOKIE: &str = "userType";
pub const CSRF_TOKEN_COOKIE: &str = "csrfToken";

/// Where the account type of the signed-in user is remembered between pages.
pub trait SessionStore: Send + Sync {
    fn set_user_type(&self, user_type: UserType);

    fn user_type(&self) -> Option<UserType>;

    fn csrf_token(&self) -> Option<String>;
}

/// Session marker stored as a cookie for the backend origin. The jar is the
/// same one the HTTP client sends, so the server sees the marker too.
#[derive(Clone)]
pub struct CookieSession {
    jar: Arc<Jar>,
    url: Url,
}

impl CookieSession {
    pub fn new(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)
            .with_context(|| format!("Invalid backend URL for session cookies: {}", base_url))?;

        Ok(Self {
            jar: Arc::new(Jar::default()),
            url,
        })
    }

    pub fn jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }

    /// Store a raw `Set-Cookie` style value, e.g. a CSRF token issued by the
    /// page that hosts the form.
    pub fn add_cookie(&self, cookie: &str) {
        self.jar.add_cookie_str(cookie, &self.url);
    }

    fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.url)?;
        let header = header.to_str().ok()?;
        cookie_value(header, name)
    }
}

impl SessionStore for CookieSession {
    fn set_user_type(&self, user_type: UserType) {
        debug!("Setting session marker {}={}", USER_TYPE_COOKIE, user_type);
        self.add_cookie(&format!("{}={}; Path=/", USER_TYPE_COOKIE, user_type));
    }

    fn user_type(&self) -> Option<UserType> {
        let raw = self.cookie(USER_TYPE_COOKIE)?;
        match raw.parse() {
            Ok(user_type) => Some(user_type),
            Err(e) => {
                warn!("Ignoring malformed session marker: {}", e);
                None
            }
        }
    }

    fn csrf_token(&self) -> Option<String> {
        self.cookie(CSRF_TOKEN_COOKIE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_round_trip() {
        let session = CookieSession::new("http://localhost:8080").unwrap();
        assert_eq!(session.user_type(), None);

        session.set_user_type(UserType::Business);
        assert_eq!(session.user_type(), Some(UserType::Business));

        session.set_user_type(UserType::Applicant);
        assert_eq!(session.user_type(), Some(UserType::Applicant));
    }

    #[test]
    fn test_csrf_token_from_jar() {
        let session = CookieSession::new("http://localhost:8080").unwrap();
        assert_eq!(session.csrf_token(), None);

        session.add_cookie("csrfToken=abc123; Path=/");
        assert_eq!(session.csrf_token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_malformed_marker_ignored() {
        let session = CookieSession::new("http://localhost:8080").unwrap();
        session.add_cookie("userType=ADMIN; Path=/");
        assert_eq!(session.user_type(), None);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(CookieSession::new("not a url").is_err());
    }
}
