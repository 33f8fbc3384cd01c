// src/page.rs
//! Boundary between flow logic and whatever draws the page

use crate::core::config_manager::PageConfig;
use std::sync::Mutex;
use tracing::{error, info};

/// Pages a flow can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    BusinessAccountInfo,
}

impl Page {
    pub fn path<'a>(&self, pages: &'a PageConfig) -> &'a str {
        match self {
            Page::Home => &pages.home,
            Page::BusinessAccountInfo => &pages.business_account_info,
        }
    }
}

/// Rendering surface used by the flows. Implementations only draw; they make
/// no decisions.
pub trait PageRenderer: Send + Sync {
    /// Replace the contents of the error region.
    fn show_error(&self, message: &str);

    fn clear_error(&self);

    /// Transient notification (the web pages used `alert`).
    fn notify(&self, message: &str);

    fn navigate(&self, page: Page);

    fn set_submit_enabled(&self, enabled: bool);
}

/// Terminal renderer for the CLI. Keeps the last error and navigation target
/// so the caller can report them.
pub struct ConsoleRenderer {
    pages: PageConfig,
    last_error: Mutex<Option<String>>,
    navigated_to: Mutex<Option<Page>>,
}

impl ConsoleRenderer {
    pub fn new(pages: PageConfig) -> Self {
        Self {
            pages,
            last_error: Mutex::new(None),
            navigated_to: Mutex::new(None),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|e| e.clone())
    }

    pub fn navigated_to(&self) -> Option<Page> {
        self.navigated_to.lock().ok().and_then(|p| *p)
    }
}

impl PageRenderer for ConsoleRenderer {
    fn show_error(&self, message: &str) {
        error!("{}", message);
        println!("✗ {}", message);
        if let Ok(mut last) = self.last_error.lock() {
            *last = Some(message.to_string());
        }
    }

    fn clear_error(&self) {
        if let Ok(mut last) = self.last_error.lock() {
            *last = None;
        }
    }

    fn notify(&self, message: &str) {
        info!("{}", message);
        println!("ℹ {}", message);
    }

    fn navigate(&self, page: Page) {
        let path = page.path(&self.pages);
        info!("Navigating to {}", path);
        println!("→ {}", path);
        if let Ok(mut target) = self.navigated_to.lock() {
            *target = Some(page);
        }
    }

    fn set_submit_enabled(&self, enabled: bool) {
        tracing::debug!("Submit control {}", if enabled { "enabled" } else { "disabled" });
    }
}
