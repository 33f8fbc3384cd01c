//! Client-side logic of the walk-in interview job board: job-post form
//! validation and submission, and the account sign-up/log-in flows.

pub mod account_flow;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod control;
pub mod core;
pub mod job_form;
pub mod page;
pub mod session;
pub mod strings;
pub mod types;
pub mod utils;

pub use account_flow::{AccountFlow, AccountState, FlowDeps, FlowKind};
pub use core::{AppConfig, JobBoardApi, ServiceClient};
pub use job_form::{JobForm, JobSubmitter, SubmitOutcome};
pub use page::{Page, PageRenderer};
pub use strings::StringTable;
