// src/account_flow/messages.rs
use crate::auth::{ProviderError, ProviderErrorKind};
use crate::strings::StringTable;
use tracing::error;

const SECTION: &str = "create-business-account";

/// User-facing text for a provider error. Codes outside the known table get
/// the generic message and the original error is logged.
pub fn provider_error_message(
    err: &ProviderError,
    strings: &StringTable,
    min_password_length: usize,
) -> String {
    match err.kind() {
        ProviderErrorKind::EmailAlreadyInUse => strings.get(SECTION, "user-in-use-error").to_string(),
        ProviderErrorKind::InvalidEmail => strings.get(SECTION, "invalid-email-error").to_string(),
        ProviderErrorKind::OperationNotAllowed => {
            strings.get(SECTION, "operation-not-allowed-error").to_string()
        }
        ProviderErrorKind::WeakPassword => strings.weak_password(min_password_length),
        ProviderErrorKind::Other => {
            error!("Identity provider error {}: {}", err.code, err.message);
            strings.get("create-account", "error-message").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings() -> StringTable {
        StringTable::for_locale("en").unwrap()
    }

    #[test]
    fn test_known_codes() {
        let strings = strings();
        let message = |code: &str| provider_error_message(&ProviderError::new(code, "x"), &strings, 6);

        assert_eq!(
            message("auth/email-already-in-use"),
            strings.get(SECTION, "user-in-use-error")
        );
        assert_eq!(
            message("auth/invalid-email"),
            strings.get(SECTION, "invalid-email-error")
        );
        assert_eq!(
            message("auth/operation-not-allowed"),
            strings.get(SECTION, "operation-not-allowed-error")
        );
    }

    #[test]
    fn test_weak_password_names_minimum() {
        let err = ProviderError::new("auth/weak-password", "too short");
        assert!(provider_error_message(&err, &strings(), 6).contains('6'));
        assert!(provider_error_message(&err, &strings(), 12).contains("12"));
    }

    #[test]
    fn test_unknown_code_is_generic() {
        let strings = strings();
        let err = ProviderError::new("auth/network-request-failed", "offline");
        assert_eq!(
            provider_error_message(&err, &strings, 6),
            strings.get("create-account", "error-message")
        );
    }
}
