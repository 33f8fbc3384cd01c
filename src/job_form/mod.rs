// src/job_form/mod.rs
//! Job-posting form: validation, payload construction and submission

pub mod submit;

pub use submit::{classify_job_response, JobSubmitter, SubmitOutcome};

use crate::core::config_manager::JobDefaults;
use crate::strings::StringTable;
use crate::types::{JobListing, JobLocation, JobPay, PayFrequency};
use crate::utils::non_blank;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

const EXPIRY_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];
const EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// A requirement checkbox as read from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementCheckbox {
    pub id: String,
    pub checked: bool,
}

impl RequirementCheckbox {
    pub fn new(id: impl Into<String>, checked: bool) -> Self {
        Self {
            id: id.into(),
            checked,
        }
    }
}

/// Raw field values extracted from the job-posting form. Pay bounds are
/// `None` when the number input is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobForm {
    pub name: String,
    pub address: String,
    pub description: String,
    pub pay_frequency: String,
    pub pay_min: Option<f64>,
    pub pay_max: Option<f64>,
    pub requirements: Vec<RequirementCheckbox>,
    pub expiry: String,
    pub duration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobField {
    Title,
    Address,
    PayFrequency,
    PayMin,
    PayMax,
    PayRange,
    Expiry,
}

impl JobField {
    /// Key of the field label in the `new-job` string section.
    pub fn label_key(&self) -> &'static str {
        match self {
            JobField::Title => "title",
            JobField::Address => "address",
            JobField::PayFrequency => "pay-frequency",
            JobField::PayMin => "pay-min",
            JobField::PayMax => "pay-max",
            JobField::PayRange => "pay-range",
            JobField::Expiry => "expiry",
        }
    }
}

impl fmt::Display for JobField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("minimum pay exceeds maximum pay")]
    PayRange,
    #[error("minimum pay is negative")]
    NegativePay,
    #[error("required field '{0}' is blank")]
    Required(JobField),
    #[error("unknown pay frequency '{0}'")]
    UnknownFrequency(String),
    #[error("post expiry '{0}' is not a date")]
    InvalidExpiry(String),
}

impl FieldError {
    pub fn field(&self) -> JobField {
        match self {
            FieldError::PayRange => JobField::PayRange,
            FieldError::NegativePay => JobField::PayMin,
            FieldError::Required(field) => *field,
            FieldError::UnknownFrequency(_) => JobField::PayFrequency,
            FieldError::InvalidExpiry(_) => JobField::Expiry,
        }
    }

    /// User-facing text naming the offending field.
    pub fn message(&self, strings: &StringTable) -> String {
        strings.field_error(strings.get("new-job", self.field().label_key()))
    }
}

/// Field values that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedJobFields {
    pub name: String,
    pub address: String,
    pub description: String,
    pub frequency: PayFrequency,
    pub pay_min: f64,
    pub pay_max: f64,
    pub requirements: BTreeSet<String>,
    pub expiry: String,
    pub duration: Option<String>,
}

/// Check the form. The pay range is checked before anything else, so an
/// inverted range is reported even when other fields are also wrong.
pub fn validate(form: &JobForm) -> Result<ValidatedJobFields, FieldError> {
    if let (Some(min), Some(max)) = (form.pay_min, form.pay_max) {
        if min > max {
            return Err(FieldError::PayRange);
        }
    }

    let name = non_blank(&form.name).ok_or(FieldError::Required(JobField::Title))?;
    let address = non_blank(&form.address).ok_or(FieldError::Required(JobField::Address))?;
    let frequency =
        non_blank(&form.pay_frequency).ok_or(FieldError::Required(JobField::PayFrequency))?;
    let pay_min = form.pay_min.ok_or(FieldError::Required(JobField::PayMin))?;
    let pay_max = form.pay_max.ok_or(FieldError::Required(JobField::PayMax))?;
    let expiry = non_blank(&form.expiry).ok_or(FieldError::Required(JobField::Expiry))?;

    if pay_min < 0.0 {
        return Err(FieldError::NegativePay);
    }

    let frequency: PayFrequency = frequency
        .parse()
        .map_err(|_| FieldError::UnknownFrequency(frequency.to_string()))?;

    if !is_valid_expiry(expiry) {
        return Err(FieldError::InvalidExpiry(expiry.to_string()));
    }

    Ok(ValidatedJobFields {
        name: name.to_string(),
        address: address.to_string(),
        description: form.description.clone(),
        frequency,
        pay_min,
        pay_max,
        requirements: checked_requirements(&form.requirements),
        expiry: expiry.to_string(),
        duration: (!form.duration.is_empty()).then(|| form.duration.clone()),
    })
}

/// Identifiers of the checked boxes only.
pub fn checked_requirements(boxes: &[RequirementCheckbox]) -> BTreeSet<String> {
    boxes
        .iter()
        .filter(|b| b.checked)
        .map(|b| b.id.clone())
        .collect()
}

pub fn build_payload(fields: &ValidatedJobFields, defaults: &JobDefaults) -> JobListing {
    JobListing {
        job_name: fields.name.clone(),
        job_location: JobLocation {
            address: fields.address.clone(),
            lat: defaults.lat,
            lon: defaults.lon,
        },
        job_description: fields.description.clone(),
        job_pay: JobPay {
            frequency: fields.frequency,
            min: fields.pay_min,
            max: fields.pay_max,
        },
        requirements: fields.requirements.clone(),
        post_expiry: fields.expiry.clone(),
        job_duration: fields.duration.clone(),
    }
}

fn is_valid_expiry(value: &str) -> bool {
    NaiveDate::parse_from_str(value, EXPIRY_DATE_FORMAT).is_ok()
        || EXPIRY_DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
}
