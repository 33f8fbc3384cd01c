// src/auth/mod.rs
//! Identity provider boundary: operations, errors and state-change events

pub mod events;
pub mod firebase;

pub use events::{AuthEventBus, AuthSubscription};
pub use firebase::FirebaseIdentityProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    /// Short-lived token the backend exchanges for a session cookie.
    pub id_token: String,
}

/// Error reported by the identity provider, keyed by its `auth/*` code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    EmailAlreadyInUse,
    InvalidEmail,
    OperationNotAllowed,
    WeakPassword,
    Other,
}

pub const EMAIL_IN_USE_ERROR_CODE: &str = "auth/email-already-in-use";
pub const INVALID_EMAIL_ERROR_CODE: &str = "auth/invalid-email";
pub const OPERATION_NOT_ALLOWED_ERROR_CODE: &str = "auth/operation-not-allowed";
pub const WEAK_PASSWORD_ERROR_CODE: &str = "auth/weak-password";

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ProviderErrorKind {
        match self.code.as_str() {
            EMAIL_IN_USE_ERROR_CODE => ProviderErrorKind::EmailAlreadyInUse,
            INVALID_EMAIL_ERROR_CODE => ProviderErrorKind::InvalidEmail,
            OPERATION_NOT_ALLOWED_ERROR_CODE => ProviderErrorKind::OperationNotAllowed,
            WEAK_PASSWORD_ERROR_CODE => ProviderErrorKind::WeakPassword,
            _ => ProviderErrorKind::Other,
        }
    }
}

/// Authentication state changes, delivered to every subscribed flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    SignedOut,
    SignInFailed(ProviderError),
    SignOutFailed(ProviderError),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new email/password account and sign it in.
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, ProviderError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    fn current_user(&self) -> Option<AuthUser>;

    fn subscribe(&self) -> AuthSubscription;
}
