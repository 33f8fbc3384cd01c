// src/types/job.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How often the advertised pay is earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayFrequency {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl PayFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayFrequency::Hourly => "HOURLY",
            PayFrequency::Daily => "DAILY",
            PayFrequency::Weekly => "WEEKLY",
            PayFrequency::Monthly => "MONTHLY",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayFrequency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HOURLY" => Ok(PayFrequency::Hourly),
            "DAILY" => Ok(PayFrequency::Daily),
            "WEEKLY" => Ok(PayFrequency::Weekly),
            "MONTHLY" => Ok(PayFrequency::Monthly),
            other => Err(format!("Unknown pay frequency: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobLocation {
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPay {
    pub frequency: PayFrequency,
    pub min: f64,
    pub max: f64,
}

/// Payload of `POST /jobs`.
///
/// `job_duration` is left out of the JSON entirely when no duration was given;
/// the backend reads a missing key as "no duration constraint".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub job_name: String,
    pub job_location: JobLocation,
    pub job_description: String,
    pub job_pay: JobPay,
    pub requirements: BTreeSet<String>,
    pub post_expiry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_duration: Option<String>,
}
