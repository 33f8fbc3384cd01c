// src/types/account.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Applicant,
    Business,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Applicant => "APPLICANT",
            UserType::Business => "BUSINESS",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "APPLICANT" => Ok(UserType::Applicant),
            "BUSINESS" => Ok(UserType::Business),
            other => Err(format!("Unknown user type: {}", other)),
        }
    }
}

/// Body of the create/update business account calls.
/// The server attaches an empty job list on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    pub user_type: UserType,
    pub name: String,
}

impl AccountDetails {
    pub fn business(name: impl Into<String>) -> Self {
        Self {
            user_type: UserType::Business,
            name: name.into(),
        }
    }
}
