// src/auth/firebase.rs
//! Email/password accounts through the Firebase Identity Toolkit REST API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{error, info, warn};

use super::{AuthEvent, AuthEventBus, AuthSubscription, AuthUser, IdentityProvider, ProviderError};
use crate::core::config_manager::{AppConfig, AuthConfig};
use crate::utils::mask_email;

const SIGN_UP_ENDPOINT: &str = "/accounts:signUp";
const SIGN_IN_ENDPOINT: &str = "/accounts:signInWithPassword";
const NETWORK_ERROR_CODE: &str = "auth/network-request-failed";
const INTERNAL_ERROR_CODE: &str = "auth/internal-error";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    id_token: String,
    local_id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestErrorEnvelope {
    error: RestError,
}

#[derive(Debug, Deserialize)]
struct RestError {
    message: String,
}

/// Translate an Identity Toolkit error message (e.g.
/// `WEAK_PASSWORD : Password should be at least 6 characters`) into the
/// `auth/*` code the flows understand.
pub fn map_rest_error(message: &str) -> ProviderError {
    let reason = message.split(':').next().unwrap_or(message).trim();
    let code = match reason {
        "EMAIL_EXISTS" => "auth/email-already-in-use",
        "INVALID_EMAIL" | "MISSING_EMAIL" => "auth/invalid-email",
        "OPERATION_NOT_ALLOWED" | "ADMIN_ONLY_OPERATION" => "auth/operation-not-allowed",
        "WEAK_PASSWORD" => "auth/weak-password",
        "EMAIL_NOT_FOUND" => "auth/user-not-found",
        "INVALID_PASSWORD" | "MISSING_PASSWORD" => "auth/wrong-password",
        "INVALID_LOGIN_CREDENTIALS" => "auth/invalid-credential",
        "USER_DISABLED" => "auth/user-disabled",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "auth/too-many-requests",
        _ => INTERNAL_ERROR_CODE,
    };
    ProviderError::new(code, message)
}

pub struct FirebaseIdentityProvider {
    client: Client,
    config: AuthConfig,
    current: Mutex<Option<AuthUser>>,
    events: AuthEventBus,
}

impl FirebaseIdentityProvider {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        if config.auth.api_key.is_empty() {
            warn!("FIREBASE_API_KEY is not set, identity calls will be rejected");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config: config.auth.clone(),
            current: Mutex::new(None),
            events: AuthEventBus::new(),
        })
    }

    async fn password_call(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ProviderError> {
        let result = self.request(endpoint, email, password).await;

        match &result {
            Ok(user) => {
                info!("Signed in {}", mask_email(email));
                if let Ok(mut current) = self.current.lock() {
                    *current = Some(user.clone());
                }
                self.events.publish(AuthEvent::SignedIn(user.clone()));
            }
            Err(e) => {
                warn!("Identity call {} failed for {}: {}", endpoint, mask_email(email), e);
                self.events.publish(AuthEvent::SignInFailed(e.clone()));
            }
        }

        result
    }

    async fn request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ProviderError> {
        let url = format!(
            "{}{}",
            self.config.identity_base_url.trim_end_matches('/'),
            endpoint
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| {
                error!("Identity provider unreachable: {}", e);
                ProviderError::new(NETWORK_ERROR_CODE, e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::new(NETWORK_ERROR_CODE, e.to_string()))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<RestErrorEnvelope>(&body) {
                Ok(envelope) => map_rest_error(&envelope.error.message),
                Err(_) => ProviderError::new(
                    INTERNAL_ERROR_CODE,
                    format!("identity provider returned {}", status),
                ),
            });
        }

        let parsed: PasswordResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::new(INTERNAL_ERROR_CODE, format!("unexpected response: {}", e))
        })?;

        Ok(AuthUser {
            uid: parsed.local_id,
            email: parsed.email.or_else(|| Some(email.to_string())),
            id_token: parsed.id_token,
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, ProviderError> {
        self.password_call(SIGN_UP_ENDPOINT, email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, ProviderError> {
        self.password_call(SIGN_IN_ENDPOINT, email, password).await
    }

    /// Tokens are stateless on the provider side, so signing out only drops
    /// the cached user.
    async fn sign_out(&self) -> Result<(), ProviderError> {
        match self.current.lock() {
            Ok(mut current) => {
                *current = None;
            }
            Err(_) => {
                let err = ProviderError::new(INTERNAL_ERROR_CODE, "user state poisoned");
                self.events.publish(AuthEvent::SignOutFailed(err.clone()));
                return Err(err);
            }
        }
        info!("Signed out");
        self.events.publish(AuthEvent::SignedOut);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current.lock().ok().and_then(|c| c.clone())
    }

    fn subscribe(&self) -> AuthSubscription {
        self.events.subscribe()
    }
}
