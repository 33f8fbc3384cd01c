// src/job_form/submit.rs
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{build_payload, validate, FieldError, JobForm};
use crate::control::SubmitControl;
use crate::core::config_manager::{AppConfig, JobDefaults};
use crate::core::JobBoardApi;
use crate::page::{Page, PageRenderer};
use crate::strings::StringTable;
use crate::types::{BodyStatus, HttpReply};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the job and the user was sent home.
    Posted,
    /// Validation failed; nothing was sent.
    Rejected(FieldError),
    /// The backend refused or could not be reached.
    Failed,
    /// Another submit was still in flight; this click was ignored.
    AlreadyInFlight,
}

/// `POST /jobs` succeeded only when the status line is 2xx and the
/// application status echoed in the body, if any, is a 2xx code as well.
pub fn classify_job_response(reply: &HttpReply) -> bool {
    if !reply.is_success() {
        return false;
    }
    match reply.body_status() {
        BodyStatus::Absent => true,
        BodyStatus::Code(status) => (200..300).contains(&status),
        BodyStatus::Malformed(raw) => {
            warn!("Job post answered with unreadable status {}", raw);
            false
        }
    }
}

/// Drives the "add job" form: one validated POST at a time.
pub struct JobSubmitter {
    api: Arc<dyn JobBoardApi>,
    renderer: Arc<dyn PageRenderer>,
    strings: StringTable,
    defaults: JobDefaults,
    control: SubmitControl,
}

impl JobSubmitter {
    pub fn new(
        config: &AppConfig,
        strings: StringTable,
        api: Arc<dyn JobBoardApi>,
        renderer: Arc<dyn PageRenderer>,
    ) -> Self {
        Self {
            api,
            control: SubmitControl::new(renderer.clone()),
            renderer,
            strings,
            defaults: config.job.clone(),
        }
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.control.is_enabled()
    }

    pub async fn add_job(&self, form: &JobForm) -> SubmitOutcome {
        let Some(_permit) = self.control.try_acquire() else {
            debug!("Ignoring job submit while another is in flight");
            return SubmitOutcome::AlreadyInFlight;
        };

        let fields = match validate(form) {
            Ok(fields) => fields,
            Err(e) => {
                info!("Job form rejected: {}", e);
                self.renderer.show_error(&e.message(&self.strings));
                return SubmitOutcome::Rejected(e);
            }
        };

        let payload = build_payload(&fields, &self.defaults);

        match self.api.post_job(&payload).await {
            Ok(reply) if classify_job_response(&reply) => {
                info!("Job '{}' posted", payload.job_name);
                self.renderer.clear_error();
                self.renderer.navigate(Page::Home);
                SubmitOutcome::Posted
            }
            Ok(reply) => {
                warn!(
                    "Backend refused job '{}': status {} body {}",
                    payload.job_name, reply.status, reply.body
                );
                self.show_creation_error();
                SubmitOutcome::Failed
            }
            Err(e) => {
                error!("Failed to post job '{}': {:#}", payload.job_name, e);
                self.show_creation_error();
                SubmitOutcome::Failed
            }
        }
    }

    fn show_creation_error(&self) {
        self.renderer
            .show_error(self.strings.get("new-job", "creation-error"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_job_response() {
        assert!(classify_job_response(&HttpReply::new(200, "")));
        assert!(classify_job_response(&HttpReply::new(200, r#"{"status":200}"#)));
        assert!(!classify_job_response(&HttpReply::new(200, r#"{"status":400}"#)));
        assert!(!classify_job_response(&HttpReply::new(400, r#"{"status":200}"#)));
        assert!(!classify_job_response(&HttpReply::new(500, "")));
    }

    #[test]
    fn test_unreadable_body_status_is_failure() {
        for body in [
            r#"{"status":"500"}"#,
            r#"{"status":"200"}"#,
            r#"{"status":500.0}"#,
            r#"{"status":70000}"#,
            r#"{"status":null,"message":"failed"}"#,
        ] {
            assert!(!classify_job_response(&HttpReply::new(200, body)), "{}", body);
        }
        assert!(classify_job_response(&HttpReply::new(201, r#"{"message":"created"}"#)));
        assert!(classify_job_response(&HttpReply::new(200, "created")));
    }
}
