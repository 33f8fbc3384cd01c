#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use walkin_client::auth::{
    AuthEvent, AuthEventBus, AuthSubscription, AuthUser, IdentityProvider, ProviderError,
};
use walkin_client::core::JobBoardApi;
use walkin_client::page::{Page, PageRenderer};
use walkin_client::types::{AccountDetails, HttpReply, JobListing};

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Error(String),
    ClearError,
    Notify(String),
    Navigate(Page),
    SubmitEnabled(bool),
}

#[derive(Default)]
pub struct RecordingRenderer {
    log: Mutex<Vec<Rendered>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<Rendered> {
        self.log.lock().expect("renderer mutex").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Rendered::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Rendered::Notify(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<Page> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Rendered::Navigate(page) => Some(page),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Rendered) {
        self.log.lock().expect("renderer mutex").push(event);
    }
}

impl PageRenderer for RecordingRenderer {
    fn show_error(&self, message: &str) {
        self.push(Rendered::Error(message.to_string()));
    }

    fn clear_error(&self) {
        self.push(Rendered::ClearError);
    }

    fn notify(&self, message: &str) {
        self.push(Rendered::Notify(message.to_string()));
    }

    fn navigate(&self, page: Page) {
        self.push(Rendered::Navigate(page));
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.push(Rendered::SubmitEnabled(enabled));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    PostJob(serde_json::Value),
    CreateAccount(AccountDetails),
    UpdateAccount(AccountDetails),
    SessionLogin { id_token: String, csrf_token: String },
}

/// Backend double: records every call and answers with a scripted reply.
/// `None` as the reply simulates a transport failure.
pub struct FakeApi {
    calls: Mutex<Vec<ApiCall>>,
    reply: Option<HttpReply>,
    gate: Option<Arc<Notify>>,
}

impl FakeApi {
    pub fn replying(reply: HttpReply) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Some(reply),
            gate: None,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: None,
            gate: None,
        }
    }

    /// Hold every call until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("calls mutex").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls mutex").len()
    }

    async fn answer(&self, call: ApiCall) -> Result<HttpReply> {
        self.calls.lock().expect("calls mutex").push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.reply
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection refused"))
    }
}

#[async_trait]
impl JobBoardApi for FakeApi {
    async fn post_job(&self, listing: &JobListing) -> Result<HttpReply> {
        let body = serde_json::to_value(listing)?;
        self.answer(ApiCall::PostJob(body)).await
    }

    async fn create_business_account(&self, details: &AccountDetails) -> Result<HttpReply> {
        self.answer(ApiCall::CreateAccount(details.clone())).await
    }

    async fn update_business_account(&self, details: &AccountDetails) -> Result<HttpReply> {
        self.answer(ApiCall::UpdateAccount(details.clone())).await
    }

    async fn session_login(&self, id_token: &str, csrf_token: &str) -> Result<HttpReply> {
        self.answer(ApiCall::SessionLogin {
            id_token: id_token.to_string(),
            csrf_token: csrf_token.to_string(),
        })
        .await
    }
}

/// Identity provider double that answers every credential call the same way
/// and publishes the matching event.
pub struct FakeProvider {
    pub bus: AuthEventBus,
    result: Result<AuthUser, ProviderError>,
    calls: AtomicUsize,
    current: Mutex<Option<AuthUser>>,
    delay: Option<Duration>,
}

impl FakeProvider {
    pub fn accepting(user: AuthUser) -> Self {
        Self::with_result(Ok(user))
    }

    pub fn rejecting(code: &str) -> Self {
        Self::with_result(Err(ProviderError::new(code, "rejected by provider")))
    }

    fn with_result(result: Result<AuthUser, ProviderError>) -> Self {
        Self {
            bus: AuthEventBus::new(),
            result,
            calls: AtomicUsize::new(0),
            current: Mutex::new(None),
            delay: None,
        }
    }

    /// Publish the event first and only return after `delay`, the way a
    /// provider callback can beat the call's own completion.
    pub fn answering_after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer(&self) -> Result<AuthUser, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(user) => {
                *self.current.lock().expect("user mutex") = Some(user.clone());
                self.bus.publish(AuthEvent::SignedIn(user.clone()));
            }
            Err(err) => self.bus.publish(AuthEvent::SignInFailed(err.clone())),
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn create_account(&self, _email: &str, _password: &str) -> Result<AuthUser, ProviderError> {
        self.answer().await
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthUser, ProviderError> {
        self.answer().await
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        *self.current.lock().expect("user mutex") = None;
        self.bus.publish(AuthEvent::SignedOut);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current.lock().expect("user mutex").clone()
    }

    fn subscribe(&self) -> AuthSubscription {
        self.bus.subscribe()
    }
}

pub fn business_user() -> AuthUser {
    AuthUser {
        uid: "uid-42".to_string(),
        email: Some("owner@kopi.sg".to_string()),
        id_token: "id-token-42".to_string(),
    }
}

/// Poll `condition` until it holds or a second has passed.
pub async fn eventually<F>(condition: F) -> bool
where
    F: Fn() -> bool,
{
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
