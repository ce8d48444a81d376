//! Local (pre-submit) validation rules.
//!
//! Runs synchronously before any remote call: required fields, maximum
//! lengths, and format checks against the submitted payload. A non-empty
//! result blocks the submission outright — local errors never reach the
//! server-error mapper.

use regex::Regex;
use serde::Serialize;

use crate::holder::AccountHolder;

use super::steps::StepId;

/// Which local rule a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LocalRule {
    Required,
    MaxLength,
    Format,
}

/// A single client-side validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalError {
    pub field: String,
    pub rule: LocalRule,
    pub message: String,
}

impl LocalError {
    fn required(field: &str) -> Self {
        Self {
            field: field.to_string(),
            rule: LocalRule::Required,
            message: format!("{field} is required"),
        }
    }
}

/// Maximum accepted length for any submitted string value.
const MAX_VALUE_LEN: usize = 255;

/// Top-level payload keys each step must supply.
fn required_keys(step: StepId) -> &'static [&'static str] {
    match step {
        StepId::Registration => &["email"],
        StepId::Organisation1 => &["name", "registrationNumber"],
        StepId::Organisation2 => &["businessActivity", "monthlyPaymentVolume"],
        StepId::Email => &["email"],
        StepId::Location => &["addressLine1", "city", "postalCode", "country"],
        StepId::Details => &["firstName", "lastName"],
        StepId::Ownership | StepId::Documents | StepId::Finalize => &[],
    }
}

/// Local validation rules with compiled patterns.
pub struct LocalRules {
    email_re: Regex,
}

impl LocalRules {
    /// Create the default rule set.
    pub fn default_rules() -> Self {
        Self {
            email_re: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap(),
        }
    }

    /// Validate a step submission payload against the local rules.
    pub fn validate_step(
        &self,
        holder: &AccountHolder,
        step: StepId,
        payload: &serde_json::Value,
    ) -> Vec<LocalError> {
        let mut errors = Vec::new();

        for key in required_keys(step) {
            let missing = match payload.get(key) {
                None | Some(serde_json::Value::Null) => true,
                Some(serde_json::Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if missing {
                errors.push(LocalError::required(key));
            }
        }

        if let Some(object) = payload.as_object() {
            for (key, value) in object {
                if let Some(s) = value.as_str() {
                    if s.len() > MAX_VALUE_LEN {
                        errors.push(LocalError {
                            field: key.clone(),
                            rule: LocalRule::MaxLength,
                            message: format!("{key} exceeds {MAX_VALUE_LEN} characters"),
                        });
                    }
                }
            }
        }

        if let Some(email) = payload.get("email").and_then(|v| v.as_str()) {
            if !email.is_empty() && !self.email_re.is_match(email) {
                errors.push(LocalError {
                    field: "email".to_string(),
                    rule: LocalRule::Format,
                    message: "email is not a valid address".to_string(),
                });
            }
        }

        // German individual accounts must accept the terms of use before
        // the Email step can be submitted.
        if step == StepId::Email {
            if let AccountHolder::Individual(individual) = holder {
                if individual.account_country.as_deref() == Some("DEU") {
                    let accepted = payload
                        .get("tcuAccepted")
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false);
                    if !accepted {
                        errors.push(LocalError::required("tcuAccepted"));
                    }
                }
            }
        }

        errors
    }
}
