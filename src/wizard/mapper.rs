//! Field error mapper — turns server-reported dotted paths into
//! step-scoped field names.
//!
//! Each step owns a declarative table of `{pattern, field}` rules. The
//! Ownership step additionally accepts any path rooted at the UBO list
//! verbatim, because UBOs are a dynamic, index-qualified collection.
//!
//! Paths recognized by no step are logged and then dropped: a silent drop
//! would hide genuine validation failures when the backend schema grows a
//! field the UI does not know about.

use tracing::warn;

use crate::status::{DottedPath, OnboardingStatus};

use super::steps::{StepError, StepId};

/// First segment of every path that targets the dynamic UBO list.
pub const UBO_PATH_ROOT: &str = "individualUltimateBeneficialOwners";

/// A single path-to-field rule.
struct FieldRule {
    pattern: &'static [&'static str],
    field: &'static str,
}

const REGISTRATION_RULES: &[FieldRule] = &[
    FieldRule { pattern: &["email"], field: "email" },
    FieldRule {
        pattern: &["legalRepresentativePersonalAddress", "addressLine1"],
        field: "addressLine1",
    },
    FieldRule {
        pattern: &["legalRepresentativePersonalAddress", "city"],
        field: "city",
    },
    FieldRule {
        pattern: &["legalRepresentativePersonalAddress", "postalCode"],
        field: "postalCode",
    },
    FieldRule {
        pattern: &["legalRepresentativePersonalAddress", "country"],
        field: "country",
    },
];

const ORGANISATION1_RULES: &[FieldRule] = &[
    FieldRule { pattern: &["name"], field: "name" },
    FieldRule { pattern: &["registrationNumber"], field: "registrationNumber" },
    FieldRule { pattern: &["vatNumber"], field: "vatNumber" },
    FieldRule {
        pattern: &["taxIdentificationNumber"],
        field: "taxIdentificationNumber",
    },
    FieldRule {
        pattern: &["residencyAddress", "addressLine1"],
        field: "addressLine1",
    },
    FieldRule { pattern: &["residencyAddress", "city"], field: "city" },
    FieldRule {
        pattern: &["residencyAddress", "postalCode"],
        field: "postalCode",
    },
    FieldRule { pattern: &["residencyAddress", "country"], field: "country" },
];

const ORGANISATION2_RULES: &[FieldRule] = &[
    FieldRule { pattern: &["businessActivity"], field: "businessActivity" },
    FieldRule {
        pattern: &["businessActivityDescription"],
        field: "businessActivityDescription",
    },
    FieldRule {
        pattern: &["monthlyPaymentVolume"],
        field: "monthlyPaymentVolume",
    },
];

const EMAIL_RULES: &[FieldRule] = &[FieldRule { pattern: &["email"], field: "email" }];

const LOCATION_RULES: &[FieldRule] = &[
    FieldRule {
        pattern: &["residencyAddress", "addressLine1"],
        field: "addressLine1",
    },
    FieldRule { pattern: &["residencyAddress", "city"], field: "city" },
    FieldRule {
        pattern: &["residencyAddress", "postalCode"],
        field: "postalCode",
    },
    FieldRule { pattern: &["residencyAddress", "country"], field: "country" },
];

const DETAILS_RULES: &[FieldRule] = &[
    FieldRule { pattern: &["firstName"], field: "firstName" },
    FieldRule { pattern: &["lastName"], field: "lastName" },
    FieldRule { pattern: &["birthDate"], field: "birthDate" },
    FieldRule { pattern: &["employmentStatus"], field: "employmentStatus" },
    FieldRule { pattern: &["monthlyIncome"], field: "monthlyIncome" },
    FieldRule {
        pattern: &["taxIdentificationNumber"],
        field: "taxIdentificationNumber",
    },
];

fn rules_for(step: StepId) -> &'static [FieldRule] {
    match step {
        StepId::Registration => REGISTRATION_RULES,
        StepId::Organisation1 => ORGANISATION1_RULES,
        StepId::Organisation2 => ORGANISATION2_RULES,
        StepId::Email => EMAIL_RULES,
        StepId::Location => LOCATION_RULES,
        StepId::Details => DETAILS_RULES,
        // Ownership matches only through the UBO wildcard; Documents and
        // Finalize own no fields.
        StepId::Ownership | StepId::Documents | StepId::Finalize => &[],
    }
}

/// Resolve a dotted path to a field name for one step, if the step owns it.
fn field_for(step: StepId, path: &DottedPath) -> Option<String> {
    if step == StepId::Ownership && path.first() == Some(UBO_PATH_ROOT) {
        // Index-qualified UBO paths are passed through verbatim.
        return Some(path.to_string());
    }
    rules_for(step)
        .iter()
        .find(|rule| path.matches(rule.pattern))
        .map(|rule| rule.field.to_string())
}

/// Map the status errors onto one step's field set.
///
/// Only an `Invalid` status carries errors; every reported code is
/// preserved, one entry per (field, code) pair.
pub fn map_errors(status: &OnboardingStatus, step: StepId) -> Vec<StepError> {
    status
        .field_errors()
        .iter()
        .filter_map(|error| field_for(step, &error.field).map(|field| (field, &error.codes)))
        .flat_map(|(field, codes)| {
            codes.iter().map(move |code| StepError {
                field_name: field.clone(),
                code: *code,
            })
        })
        .collect()
}

/// Log every reported path that no step recognizes. Called once per
/// installed status so the drop is observable instead of silent.
pub fn warn_unmatched(status: &OnboardingStatus) {
    const ALL_STEPS: &[StepId] = &[
        StepId::Registration,
        StepId::Organisation1,
        StepId::Organisation2,
        StepId::Ownership,
        StepId::Documents,
        StepId::Email,
        StepId::Location,
        StepId::Details,
        StepId::Finalize,
    ];
    for error in status.field_errors() {
        let matched = ALL_STEPS
            .iter()
            .any(|step| field_for(*step, &error.field).is_some());
        if !matched {
            warn!(path = %error.field, "validation error path matched by no step, dropping");
        }
    }
}
