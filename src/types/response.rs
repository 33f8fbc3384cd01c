// ===== Backend Response Types =====

/// Raw outcome of a backend call: status line plus the unparsed body.
/// Flows classify this themselves, so the transport never decides success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Application-level status echoed in the body. Only an empty or
    /// non-JSON body, or a JSON body without a `status` key, has none.
    pub fn body_status(&self) -> BodyStatus {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&self.body) else {
            return BodyStatus::Absent;
        };
        let Some(status) = value.as_object().and_then(|body| body.get("status")) else {
            return BodyStatus::Absent;
        };

        match status.as_u64().and_then(|code| u16::try_from(code).ok()) {
            Some(code) => BodyStatus::Code(code),
            None => BodyStatus::Malformed(status.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyStatus {
    Absent,
    Code(u16),
    /// A `status` key holding something other than an integer status code.
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_status() {
        let status = |body: &str| HttpReply::new(200, body).body_status();

        assert_eq!(status(r#"{"status":200}"#), BodyStatus::Code(200));
        assert_eq!(status(r#"{"status":400,"message":"bad"}"#), BodyStatus::Code(400));
        assert_eq!(status(""), BodyStatus::Absent);
        assert_eq!(status("ok"), BodyStatus::Absent);
        assert_eq!(status(r#"{"message":"done"}"#), BodyStatus::Absent);
        assert_eq!(status("[200]"), BodyStatus::Absent);
        assert!(matches!(status(r#"{"status":"200"}"#), BodyStatus::Malformed(_)));
        assert!(matches!(status(r#"{"status":200.5}"#), BodyStatus::Malformed(_)));
        assert!(matches!(status(r#"{"status":70000}"#), BodyStatus::Malformed(_)));
        assert!(matches!(status(r#"{"status":null}"#), BodyStatus::Malformed(_)));
    }

    #[test]
    fn test_is_success() {
        assert!(HttpReply::new(204, "").is_success());
        assert!(!HttpReply::new(400, "").is_success());
        assert!(!HttpReply::new(302, "").is_success());
    }
}
