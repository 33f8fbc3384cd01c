// src/account_flow/account_info.rs
//! Business details page: attaches the real business name to the account

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::control::SubmitControl;
use crate::core::JobBoardApi;
use crate::page::{Page, PageRenderer};
use crate::strings::StringTable;
use crate::types::AccountDetails;
use crate::utils::non_blank;

const SUCCESS_STATUS: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountInfoOutcome {
    Updated,
    Rejected,
    Failed,
    AlreadyInFlight,
}

pub struct AccountInfoForm {
    api: Arc<dyn JobBoardApi>,
    renderer: Arc<dyn PageRenderer>,
    strings: StringTable,
    control: SubmitControl,
}

impl AccountInfoForm {
    pub fn new(
        strings: StringTable,
        api: Arc<dyn JobBoardApi>,
        renderer: Arc<dyn PageRenderer>,
    ) -> Self {
        Self {
            api,
            control: SubmitControl::new(renderer.clone()),
            renderer,
            strings,
        }
    }

    pub async fn submit(&self, business_name: &str) -> AccountInfoOutcome {
        let Some(_permit) = self.control.try_acquire() else {
            debug!("Ignoring account info submit while another is in flight");
            return AccountInfoOutcome::AlreadyInFlight;
        };

        let Some(name) = non_blank(business_name) else {
            let label = self.strings.get("create-business-account", "name");
            self.renderer.show_error(&self.strings.field_error(label));
            return AccountInfoOutcome::Rejected;
        };

        match self
            .api
            .update_business_account(&AccountDetails::business(name))
            .await
        {
            Ok(reply) if reply.status == SUCCESS_STATUS => {
                info!("Business account updated with name '{}'", name);
                self.renderer.clear_error();
                self.renderer.navigate(Page::Home);
                AccountInfoOutcome::Updated
            }
            Ok(reply) => {
                warn!("Account update refused with status {}", reply.status);
                self.renderer.show_error(
                    self.strings
                        .get("create-account", "create-account-error-message"),
                );
                AccountInfoOutcome::Failed
            }
            Err(e) => {
                error!("Account update failed: {:#}", e);
                self.renderer
                    .show_error(self.strings.get("create-account", "error-message"));
                AccountInfoOutcome::Failed
            }
        }
    }
}
