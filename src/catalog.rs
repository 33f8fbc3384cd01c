// src/catalog.rs
//! Static requirement catalog used to render the job form checkboxes

use crate::job_form::RequirementCheckbox;

/// A requirement a job post can ask for, with its per-locale labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub id: &'static str,
    labels: &'static [(&'static str, &'static str)],
}

const FALLBACK_REQUIREMENTS: &[Requirement] = &[
    Requirement {
        id: "O_LEVEL",
        labels: &[("en", "O Level")],
    },
    Requirement {
        id: "LANGUAGE_ENGLISH",
        labels: &[("en", "English")],
    },
    Requirement {
        id: "DRIVING_LICENSE_C",
        labels: &[("en", "Category C Driving License")],
    },
];

impl Requirement {
    pub fn label(&self, locale: &str) -> Option<&'static str> {
        self.labels
            .iter()
            .find(|(lang, _)| lang.eq_ignore_ascii_case(locale))
            .map(|(_, label)| *label)
    }
}

// TODO: load from GET /requirements once the backend exposes the catalog
pub fn requirements() -> &'static [Requirement] {
    FALLBACK_REQUIREMENTS
}

pub fn ids() -> Vec<&'static str> {
    requirements().iter().map(|r| r.id).collect()
}

fn find(id: &str) -> Option<&'static Requirement> {
    requirements().iter().find(|r| r.id == id)
}

pub fn label(id: &str, locale: &str) -> Option<&'static str> {
    find(id).and_then(|r| r.label(locale))
}

/// One unchecked box per catalog entry, in catalog order.
pub fn checkboxes() -> Vec<RequirementCheckbox> {
    requirements()
        .iter()
        .map(|r| RequirementCheckbox::new(r.id, false))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contents() {
        assert_eq!(ids(), vec!["O_LEVEL", "LANGUAGE_ENGLISH", "DRIVING_LICENSE_C"]);
        assert_eq!(label("LANGUAGE_ENGLISH", "en"), Some("English"));
        assert_eq!(label("LANGUAGE_ENGLISH", "fr"), None);
        assert_eq!(label("FORKLIFT", "en"), None);
    }

    #[test]
    fn test_checkboxes_start_unchecked() {
        let boxes = checkboxes();
        assert_eq!(boxes.len(), 3);
        assert!(boxes.iter().all(|b| !b.checked));
    }
}
