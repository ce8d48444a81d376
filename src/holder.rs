//! Account-holder data models.
//!
//! An account holder is the individual or company being onboarded. The
//! snapshot is immutable per render; only a successful remote mutation
//! replaces it.

use serde::{Deserialize, Serialize};

/// Legal form of a company account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompanyType {
    Company,
    Association,
    HomeOwnerAssociation,
    SelfEmployed,
    Other,
}

impl std::fmt::Display for CompanyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Company => "company",
            Self::Association => "association",
            Self::HomeOwnerAssociation => "homeOwnerAssociation",
            Self::SelfEmployed => "selfEmployed",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// An ultimate beneficial owner — a natural person with qualifying
/// ownership or control of a company account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ubo {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

/// Status of the supporting-document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentCollectionStatus {
    WaitingForDocument,
    PendingReview,
    Approved,
    Rejected,
}

/// Supporting-document collection attached to a company holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCollection {
    pub status: DocumentCollectionStatus,
    /// Purposes for which the backend still requires a document.
    pub required_purposes: Vec<String>,
}

impl Default for DocumentCollection {
    fn default() -> Self {
        Self {
            status: DocumentCollectionStatus::PendingReview,
            required_purposes: Vec::new(),
        }
    }
}

/// Individual account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualHolder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Country the account is opened in (ISO 3166-1 alpha-3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_country: Option<String>,
    /// Whether the terms of use have been accepted.
    pub tcu_accepted: bool,
}

impl Default for IndividualHolder {
    fn default() -> Self {
        Self {
            email: None,
            account_country: None,
            tcu_accepted: false,
        }
    }
}

/// Company account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyHolder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub company_type: CompanyType,
    /// Residency country of the company (ISO 3166-1 alpha-3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residency_country: Option<String>,
    pub ultimate_beneficial_owners: Vec<Ubo>,
    pub document_collection: DocumentCollection,
}

impl CompanyHolder {
    pub fn new(company_type: CompanyType) -> Self {
        Self {
            name: None,
            company_type,
            residency_country: None,
            ultimate_beneficial_owners: Vec::new(),
            document_collection: DocumentCollection::default(),
        }
    }
}

/// The account holder being onboarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AccountHolder {
    Individual(IndividualHolder),
    Company(CompanyHolder),
}

impl AccountHolder {
    /// Whether this holder goes through the company flow.
    pub fn is_company(&self) -> bool {
        matches!(self, Self::Company(_))
    }
}
