// src/account_flow/mod.rs
//! Account creation and log-in orchestration driven by identity events

pub mod account_info;
pub mod messages;

pub use account_info::{AccountInfoForm, AccountInfoOutcome};
pub use messages::provider_error_message;

use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::auth::{AuthEvent, AuthSubscription, AuthUser, IdentityProvider, ProviderErrorKind};
use crate::control::{SubmitControl, SubmitPermit};
use crate::core::{AppConfig, JobBoardApi};
use crate::page::{Page, PageRenderer};
use crate::session::SessionStore;
use crate::strings::StringTable;
use crate::types::{AccountDetails, UserType};
use crate::utils::{mask_email, non_blank};

const CREATED_STATUS: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    SignedOut,
    Authenticating,
    SignedIn,
    SignInFailed,
    SignOutFailed,
}

/// Which page the flow is running on. Decides what a successful sign-in
/// leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    /// New business: create the account record, then ask for details.
    BusinessSignUp,
    /// Existing business: exchange the token for a server session.
    BusinessLogIn,
    /// Business details page: only refreshes the session marker.
    BusinessAccountInfo,
    /// Applicants sign in with their phone through the provider's own UI.
    Applicant,
}

impl FlowKind {
    pub fn user_type(&self) -> UserType {
        match self {
            FlowKind::Applicant => UserType::Applicant,
            _ => UserType::Business,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsOutcome {
    /// The provider accepted the credentials; follow-up happens on the
    /// `SignedIn` event.
    Authenticated(AuthUser),
    /// Refused before reaching the provider.
    Invalid,
    ProviderRejected(ProviderErrorKind),
    AlreadyInFlight,
    /// This page has no credential form.
    Unsupported,
}

/// Collaborators of an [`AccountFlow`].
#[derive(Clone)]
pub struct FlowDeps {
    pub provider: Arc<dyn IdentityProvider>,
    pub api: Arc<dyn JobBoardApi>,
    pub session: Arc<dyn SessionStore>,
    pub renderer: Arc<dyn PageRenderer>,
}

pub struct AccountFlow {
    kind: FlowKind,
    deps: FlowDeps,
    strings: StringTable,
    min_password_length: usize,
    control: SubmitControl,
    state: Mutex<AccountState>,
    /// Sign-up permit waiting for the `SignedIn` handler to finish with it.
    handoff: Mutex<Option<SubmitPermit>>,
    handoff_ready: Notify,
}

impl AccountFlow {
    pub fn new(kind: FlowKind, config: &AppConfig, strings: StringTable, deps: FlowDeps) -> Self {
        Self {
            kind,
            control: SubmitControl::new(deps.renderer.clone()),
            deps,
            strings,
            min_password_length: config.auth.min_password_length,
            state: Mutex::new(AccountState::SignedOut),
            handoff: Mutex::new(None),
            handoff_ready: Notify::new(),
        }
    }

    pub fn state(&self) -> AccountState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(AccountState::SignedOut)
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.control.is_enabled()
    }

    fn set_state(&self, next: AccountState) {
        if let Ok(mut state) = self.state.lock() {
            debug!("{:?} flow: {:?} -> {:?}", self.kind, *state, next);
            *state = next;
        }
    }

    /// Submit the email/password form of the business sign-up or log-in page.
    pub async fn submit_credentials(&self, email: &str, password: &str) -> CredentialsOutcome {
        if !matches!(self.kind, FlowKind::BusinessSignUp | FlowKind::BusinessLogIn) {
            warn!("{:?} flow has no credential form", self.kind);
            return CredentialsOutcome::Unsupported;
        }

        let Some(permit) = self.control.try_acquire() else {
            debug!("Ignoring credential submit while another is in flight");
            return CredentialsOutcome::AlreadyInFlight;
        };

        let Some(email) = non_blank(email) else {
            self.deps
                .renderer
                .show_error(self.strings.get("create-business-account", "empty-email"));
            return CredentialsOutcome::Invalid;
        };

        let password = password.trim();
        if password.chars().count() < self.min_password_length {
            self.deps
                .renderer
                .show_error(&self.strings.weak_password(self.min_password_length));
            return CredentialsOutcome::Invalid;
        }

        self.deps.renderer.clear_error();
        self.set_state(AccountState::Authenticating);

        let result = match self.kind {
            FlowKind::BusinessSignUp => self.deps.provider.create_account(email, password).await,
            _ => self.deps.provider.sign_in(email, password).await,
        };

        match result {
            Ok(user) => {
                info!("Credentials accepted for {}", mask_email(email));
                if self.kind == FlowKind::BusinessSignUp {
                    // Account creation finishes the attempt
                    self.hand_off(permit);
                }
                CredentialsOutcome::Authenticated(user)
            }
            Err(err) => {
                self.set_state(AccountState::SignInFailed);
                let message = provider_error_message(&err, &self.strings, self.min_password_length);
                self.deps.renderer.show_error(&message);
                CredentialsOutcome::ProviderRejected(err.kind())
            }
        }
    }

    pub async fn sign_out(&self) {
        if let Err(e) = self.deps.provider.sign_out().await {
            error!("Sign out failed: {}", e);
        }
    }

    /// Apply one identity event: transition, then the page-specific effects.
    pub async fn handle_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(user) => {
                self.set_state(AccountState::SignedIn);
                self.on_signed_in(user).await;
            }
            AuthEvent::SignedOut => {
                self.set_state(AccountState::SignedOut);
                self.deps
                    .renderer
                    .notify(self.strings.get("auth", "sign-out-success"));
            }
            AuthEvent::SignInFailed(err) => {
                self.set_state(AccountState::SignInFailed);
                warn!("Sign in failed: {}", err);
                self.deps
                    .renderer
                    .notify(self.strings.get("auth", "sign-in-failure"));
            }
            AuthEvent::SignOutFailed(err) => {
                self.set_state(AccountState::SignOutFailed);
                error!("Sign out failed: {}", err);
            }
        }
    }

    async fn on_signed_in(&self, user: AuthUser) {
        match self.kind {
            FlowKind::BusinessSignUp => self.create_empty_account(&user).await,
            FlowKind::BusinessLogIn => self.start_server_session(&user).await,
            FlowKind::BusinessAccountInfo => {
                self.deps.session.set_user_type(UserType::Business);
            }
            FlowKind::Applicant => {
                self.deps.session.set_user_type(UserType::Applicant);
                self.deps.renderer.navigate(Page::Home);
            }
        }
    }

    /// First sign-in of a business: create the account record with the
    /// email standing in for the business name.
    async fn create_empty_account(&self, user: &AuthUser) {
        let _permit = self.claim_control().await;

        self.deps.session.set_user_type(UserType::Business);

        let name = user.email.clone().unwrap_or_else(|| user.uid.clone());
        let details = AccountDetails::business(name);

        match self.deps.api.create_business_account(&details).await {
            Ok(reply) if reply.status == CREATED_STATUS => {
                info!("Business account created for {}", user.uid);
                self.deps.renderer.clear_error();
                self.deps
                    .renderer
                    .notify(self.strings.get("create-business-account", "new-user-info"));
                self.deps.renderer.navigate(Page::BusinessAccountInfo);
            }
            Ok(reply) => {
                warn!("Account creation refused with status {}", reply.status);
                self.deps.renderer.show_error(
                    self.strings
                        .get("create-account", "create-account-error-message"),
                );
            }
            Err(e) => {
                error!("Account creation failed: {:#}", e);
                self.deps
                    .renderer
                    .show_error(self.strings.get("create-account", "error-message"));
            }
        }
    }

    fn hand_off(&self, permit: SubmitPermit) {
        if let Ok(mut slot) = self.handoff.lock() {
            *slot = Some(permit);
        }
        self.handoff_ready.notify_one();
    }

    fn take_handoff(&self) -> Option<SubmitPermit> {
        self.handoff.lock().ok().and_then(|mut slot| slot.take())
    }

    /// The permit of the sign-up that produced this sign-in, or the control
    /// itself once any running attempt settles.
    async fn claim_control(&self) -> Option<SubmitPermit> {
        loop {
            if let Some(permit) = self.take_handoff() {
                return Some(permit);
            }
            tokio::select! {
                permit = self.control.acquire() => return permit,
                _ = self.handoff_ready.notified() => continue,
            }
        }
    }

    async fn start_server_session(&self, user: &AuthUser) {
        let csrf_token = self.deps.session.csrf_token().unwrap_or_else(|| {
            warn!("No CSRF token cookie present for session login");
            String::new()
        });

        match self.deps.api.session_login(&user.id_token, &csrf_token).await {
            Ok(reply) if reply.is_success() => {
                self.deps.session.set_user_type(UserType::Business);
                self.deps.renderer.clear_error();
                self.deps.renderer.navigate(Page::Home);
            }
            Ok(reply) => {
                warn!("Session login refused with status {}", reply.status);
                self.deps
                    .renderer
                    .show_error(self.strings.get("auth", "log-in-error"));
            }
            Err(e) => {
                error!("Session login failed: {:#}", e);
                self.deps
                    .renderer
                    .show_error(self.strings.get("auth", "log-in-error"));
            }
        }
    }

    /// Consume `subscription` on a background task until the provider goes
    /// away or the returned listener is cancelled.
    pub fn listen(self: &Arc<Self>, mut subscription: AuthSubscription) -> FlowListener {
        let flow = Arc::clone(self);
        let handle = tokio::spawn(async move {
            while let Some(event) = subscription.next().await {
                flow.handle_event(event).await;
            }
            debug!("{:?} flow listener finished", flow.kind);
        });
        FlowListener { handle }
    }
}

/// Running event consumer of one flow. Dropping it stops the consumer.
pub struct FlowListener {
    handle: JoinHandle<()>,
}

impl FlowListener {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for FlowListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
