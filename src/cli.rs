// src/cli.rs
use crate::account_flow::{
    AccountFlow, AccountInfoForm, AccountInfoOutcome, CredentialsOutcome, FlowDeps, FlowKind,
};
use crate::auth::{FirebaseIdentityProvider, IdentityProvider};
use crate::catalog;
use crate::core::{AppConfig, JobBoardApi, ServiceClient};
use crate::job_form::{JobForm, JobSubmitter, RequirementCheckbox, SubmitOutcome};
use crate::page::ConsoleRenderer;
use crate::session::{CookieSession, SessionStore, CSRF_TOKEN_COOKIE};
use crate::strings::StringTable;
use crate::utils::parse_form_number;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const EVENT_WAIT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "walkin")]
#[command(about = "Post jobs and manage accounts on the walk-in interview board")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the requirement identifiers a job post can use
    Requirements,
    /// Validate and submit a new job post
    PostJob(PostJobArgs),
    /// Create a business account
    SignUp(CredentialArgs),
    /// Log into an existing business account
    LogIn(LogInArgs),
    /// Set the business name of the signed-in account
    AccountInfo { name: String },
}

#[derive(Args)]
pub struct PostJobArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub address: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "HOURLY")]
    pub frequency: String,
    /// Minimum pay; left empty counts as missing
    #[arg(long, default_value = "")]
    pub pay_min: String,
    #[arg(long, default_value = "")]
    pub pay_max: String,
    /// Requirement identifier to tick (repeatable)
    #[arg(long = "requirement")]
    pub requirements: Vec<String>,
    #[arg(long)]
    pub expiry: String,
    #[arg(long, default_value = "")]
    pub duration: String,
}

impl PostJobArgs {
    /// Build the form the way the page would: one box per catalog entry,
    /// ticked when named on the command line.
    pub fn to_form(&self) -> JobForm {
        let mut requirements: Vec<RequirementCheckbox> = catalog::checkboxes()
            .into_iter()
            .map(|b| {
                let checked = self.requirements.contains(&b.id);
                RequirementCheckbox::new(b.id, checked)
            })
            .collect();

        let known = catalog::ids();
        for id in &self.requirements {
            if !known.contains(&id.as_str()) {
                warn!("Requirement '{}' is not in the catalog", id);
                requirements.push(RequirementCheckbox::new(id.clone(), true));
            }
        }

        JobForm {
            name: self.title.clone(),
            address: self.address.clone(),
            description: self.description.clone(),
            pay_frequency: self.frequency.clone(),
            pay_min: parse_form_number(&self.pay_min),
            pay_max: parse_form_number(&self.pay_max),
            requirements,
            expiry: self.expiry.clone(),
            duration: self.duration.clone(),
        }
    }
}

#[derive(Args)]
pub struct CredentialArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Args)]
pub struct LogInArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
    /// CSRF token issued by the log-in page
    #[arg(long)]
    pub csrf_token: Option<String>,
}

struct Wiring {
    config: AppConfig,
    strings: StringTable,
    session: Arc<CookieSession>,
    api: Arc<ServiceClient>,
    renderer: Arc<ConsoleRenderer>,
}

impl Wiring {
    fn new(config: AppConfig) -> Result<Self> {
        let strings = StringTable::for_locale(&config.locale)?;
        let session = Arc::new(CookieSession::new(&config.api.base_url)?);
        let api = Arc::new(ServiceClient::new(config.clone(), session.jar())?);
        let renderer = Arc::new(ConsoleRenderer::new(config.pages.clone()));

        Ok(Self {
            config,
            strings,
            session,
            api,
            renderer,
        })
    }
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = AppConfig::load_from(&cli.config)?;

    match cli.command {
        Command::Requirements => {
            for id in catalog::ids() {
                println!("{:<20} {}", id, catalog::label(id, &config.locale).unwrap_or("-"));
            }
        }

        Command::PostJob(args) => {
            let wiring = Wiring::new(config)?;
            let submitter = JobSubmitter::new(
                &wiring.config,
                wiring.strings,
                wiring.api,
                wiring.renderer,
            );

            match submitter.add_job(&args.to_form()).await {
                SubmitOutcome::Posted => println!("✓ Job posted"),
                SubmitOutcome::Rejected(e) => anyhow::bail!("Job form rejected: {}", e),
                SubmitOutcome::Failed => anyhow::bail!("Job could not be posted"),
                SubmitOutcome::AlreadyInFlight => {}
            }
        }

        Command::SignUp(credentials) => {
            run_credentials(config, FlowKind::BusinessSignUp, credentials, None).await?;
        }

        Command::LogIn(args) => {
            run_credentials(config, FlowKind::BusinessLogIn, args.credentials, args.csrf_token)
                .await?;
        }

        Command::AccountInfo { name } => {
            let wiring = Wiring::new(config)?;
            let form = AccountInfoForm::new(wiring.strings, wiring.api, wiring.renderer);

            match form.submit(&name).await {
                AccountInfoOutcome::Updated => println!("✓ Business details saved"),
                AccountInfoOutcome::Rejected | AccountInfoOutcome::Failed => {
                    anyhow::bail!("Business details were not saved")
                }
                AccountInfoOutcome::AlreadyInFlight => {}
            }
        }
    }

    Ok(())
}

async fn run_credentials(
    config: AppConfig,
    kind: FlowKind,
    credentials: CredentialArgs,
    csrf_token: Option<String>,
) -> Result<()> {
    let wiring = Wiring::new(config)?;
    if let Some(token) = csrf_token {
        wiring
            .session
            .add_cookie(&format!("{}={}; Path=/", CSRF_TOKEN_COOKIE, token));
    }

    let provider: Arc<dyn IdentityProvider> =
        Arc::new(FirebaseIdentityProvider::new(&wiring.config)?);
    let api: Arc<dyn JobBoardApi> = wiring.api.clone();
    let mut events = provider.subscribe();

    let flow = AccountFlow::new(
        kind,
        &wiring.config,
        wiring.strings.clone(),
        FlowDeps {
            provider: provider.clone(),
            api,
            session: wiring.session.clone(),
            renderer: wiring.renderer.clone(),
        },
    );

    let outcome = flow
        .submit_credentials(&credentials.email, &credentials.password)
        .await;

    if !matches!(outcome, CredentialsOutcome::Authenticated(_)) {
        anyhow::bail!("{:?} did not succeed", kind);
    }

    match tokio::time::timeout(EVENT_WAIT, events.next()).await {
        Ok(Some(event)) => flow.handle_event(event).await,
        Ok(None) => warn!("Identity provider closed before reporting the sign-in"),
        Err(_) => warn!("Timed out waiting for the sign-in event"),
    }

    match wiring.session.user_type() {
        Some(user_type) if user_type == kind.user_type() => {
            info!("Session marker set to {}", user_type);
            Ok(())
        }
        _ => anyhow::bail!(
            "Signed in, but the account could not be prepared: {}",
            wiring.renderer.last_error().unwrap_or_default()
        ),
    }
}
