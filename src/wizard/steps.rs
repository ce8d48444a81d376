//! Step graph builder — derives the ordered wizard step list from the
//! account-holder snapshot and onboarding status.
//!
//! Steps are recomputed on every read; there is no persisted step entity.
//! The ordered list itself is the invariant: identical inputs must yield an
//! identical id sequence, and ids are unique per list.

use serde::{Deserialize, Serialize};

use crate::holder::{AccountHolder, CompanyType, DocumentCollection, DocumentCollectionStatus, Ubo};
use crate::status::{ErrorCode, OnboardingStatus};

use super::mapper;

/// Identifier of a wizard step. Closed set; the company and individual
/// flows each use a disjoint subset plus the shared `Finalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepId {
    // Company flow
    Registration,
    Organisation1,
    Organisation2,
    Ownership,
    Documents,
    // Individual flow
    Email,
    Location,
    Details,
    // Shared, always last
    Finalize,
}

impl StepId {
    /// URL slug for this step's route.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Organisation1 => "organisation-1",
            Self::Organisation2 => "organisation-2",
            Self::Ownership => "ownership",
            Self::Documents => "documents",
            Self::Email => "email",
            Self::Location => "location",
            Self::Details => "details",
            Self::Finalize => "finalize",
        }
    }

    /// User-facing label (localization happens in a collaborator).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Registration => "Registration",
            Self::Organisation1 => "Organisation 1",
            Self::Organisation2 => "Organisation 2",
            Self::Ownership => "Ownership",
            Self::Documents => "Documents",
            Self::Email => "Email",
            Self::Location => "Location",
            Self::Details => "Details",
            Self::Finalize => "Finalize",
        }
    }

    /// Route for this step, parameterized only by the onboarding id.
    pub fn route(&self, onboarding_id: &str) -> String {
        format!("/onboardings/{onboarding_id}/{}", self.slug())
    }

    /// Whether this id belongs to the Organisation group of the company
    /// flow (the ids the stepper collapses under one parent label).
    pub fn is_organisation(&self) -> bool {
        matches!(self, Self::Organisation1 | Self::Organisation2)
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl std::str::FromStr for StepId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(Self::Registration),
            "organisation-1" => Ok(Self::Organisation1),
            "organisation-2" => Ok(Self::Organisation2),
            "ownership" => Ok(Self::Ownership),
            "documents" => Ok(Self::Documents),
            "email" => Ok(Self::Email),
            "location" => Ok(Self::Location),
            "details" => Ok(Self::Details),
            "finalize" => Ok(Self::Finalize),
            _ => Err(()),
        }
    }
}

/// A field-level error scoped to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepError {
    pub field_name: String,
    pub code: ErrorCode,
}

/// One step of the wizard, recomputed per read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardStep {
    pub id: StepId,
    pub url: String,
    pub label: String,
    pub errors: Vec<StepError>,
}

/// Whether the company flow includes the Ownership step.
///
/// A disjunction, not a priority chain: any single rule suffices.
pub fn has_ownership_step(
    company_type: CompanyType,
    residency_country: Option<&str>,
    ubos: &[Ubo],
) -> bool {
    let type_requires = matches!(company_type, CompanyType::Company | CompanyType::Other);
    let dutch_association = residency_country == Some("NLD")
        && matches!(
            company_type,
            CompanyType::Association | CompanyType::HomeOwnerAssociation
        );
    type_requires || dutch_association || !ubos.is_empty()
}

/// Whether the company flow includes the Documents step: the collection
/// must be exactly `WaitingForDocument` and require at least one purpose.
pub fn has_documents_step(collection: &DocumentCollection) -> bool {
    collection.status == DocumentCollectionStatus::WaitingForDocument
        && !collection.required_purposes.is_empty()
}

/// The ordered id list for a holder. Inclusion is driven only by holder
/// attributes, never by error presence.
fn step_ids(holder: &AccountHolder) -> Vec<StepId> {
    match holder {
        AccountHolder::Individual(_) => vec![
            StepId::Email,
            StepId::Location,
            StepId::Details,
            StepId::Finalize,
        ],
        AccountHolder::Company(company) => {
            let mut ids = vec![
                StepId::Registration,
                StepId::Organisation1,
                StepId::Organisation2,
            ];
            if has_ownership_step(
                company.company_type,
                company.residency_country.as_deref(),
                &company.ultimate_beneficial_owners,
            ) {
                ids.push(StepId::Ownership);
            }
            if has_documents_step(&company.document_collection) {
                ids.push(StepId::Documents);
            }
            ids.push(StepId::Finalize);
            ids
        }
    }
}

/// Build the full step list for a holder, each step carrying the server
/// errors that map to its field set.
pub fn build_steps(
    holder: &AccountHolder,
    status: &OnboardingStatus,
    onboarding_id: &str,
) -> Vec<WizardStep> {
    step_ids(holder)
        .into_iter()
        .map(|id| WizardStep {
            id,
            url: id.route(onboarding_id),
            label: id.label().to_string(),
            errors: mapper::map_errors(status, id),
        })
        .collect()
}
