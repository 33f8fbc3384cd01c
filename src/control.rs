// src/control.rs
//! Single-flight guard for a form's submit control

use crate::page::PageRenderer;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Tracks whether a submit attempt is in flight. The control is disabled
/// while a [`SubmitPermit`] is alive. When a permit drops it goes straight to
/// a task waiting in [`SubmitControl::acquire`], if any, so the control only
/// re-enables once nobody is holding or waiting for it.
pub struct SubmitControl {
    semaphore: Arc<Semaphore>,
    renderer: Arc<dyn PageRenderer>,
}

impl SubmitControl {
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            renderer,
        }
    }

    /// A click on the control. Returns `None` when another attempt already
    /// holds it.
    pub fn try_acquire(&self) -> Option<SubmitPermit> {
        let permit = self.semaphore.clone().try_acquire_owned().ok()?;
        Some(self.permit(permit))
    }

    /// Wait for the running attempt to settle and take the control over
    /// from it without re-enabling in between.
    pub async fn acquire(&self) -> Option<SubmitPermit> {
        let permit = self.semaphore.clone().acquire_owned().await.ok()?;
        Some(self.permit(permit))
    }

    pub fn is_enabled(&self) -> bool {
        self.semaphore.available_permits() > 0
    }

    fn permit(&self, permit: OwnedSemaphorePermit) -> SubmitPermit {
        self.renderer.set_submit_enabled(false);
        SubmitPermit {
            permit: Some(permit),
            semaphore: self.semaphore.clone(),
            renderer: self.renderer.clone(),
        }
    }
}

/// Holding one of these keeps the control disabled. It can be moved to
/// whichever task finishes the attempt.
pub struct SubmitPermit {
    permit: Option<OwnedSemaphorePermit>,
    semaphore: Arc<Semaphore>,
    renderer: Arc<dyn PageRenderer>,
}

impl Drop for SubmitPermit {
    fn drop(&mut self) {
        drop(self.permit.take());
        // Handed to a waiter when one was queued
        if self.semaphore.available_permits() > 0 {
            self.renderer.set_submit_enabled(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct ToggleLog(Mutex<Vec<bool>>);

    impl PageRenderer for ToggleLog {
        fn show_error(&self, _: &str) {}
        fn clear_error(&self) {}
        fn notify(&self, _: &str) {}
        fn navigate(&self, _: Page) {}
        fn set_submit_enabled(&self, enabled: bool) {
            self.0.lock().unwrap().push(enabled);
        }
    }

    #[test]
    fn test_second_acquire_is_refused() {
        let log = Arc::new(ToggleLog::default());
        let control = SubmitControl::new(log.clone());

        let permit = control.try_acquire().expect("first acquire");
        assert!(!control.is_enabled());
        assert!(control.try_acquire().is_none());

        drop(permit);
        assert!(control.is_enabled());
        assert!(control.try_acquire().is_some());
        assert_eq!(*log.0.lock().unwrap(), vec![false, true, false, true]);
    }

    #[test]
    fn test_reenabled_on_early_return() {
        let control = SubmitControl::new(Arc::new(ToggleLog::default()));

        fn attempt(control: &SubmitControl) -> Result<(), &'static str> {
            let _permit = control.try_acquire().ok_or("busy")?;
            Err("validation failed")
        }

        assert!(attempt(&control).is_err());
        assert!(control.is_enabled());
    }

    #[tokio::test]
    async fn test_release_hands_over_to_waiter() {
        let log = Arc::new(ToggleLog::default());
        let control = Arc::new(SubmitControl::new(log.clone()));

        let click = control.try_acquire().expect("first acquire");

        let waiter = {
            let control = control.clone();
            tokio::spawn(async move {
                let _permit = control.acquire().await.expect("handed over");
                tokio::time::sleep(Duration::from_millis(20)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(click);
        assert!(!control.is_enabled());
        assert!(control.try_acquire().is_none());

        waiter.await.unwrap();
        assert!(control.is_enabled());
        // Never re-enabled between the click and the waiter
        assert_eq!(*log.0.lock().unwrap(), vec![false, false, true]);
    }
}
