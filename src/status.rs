//! Onboarding status — server-computed validity of the collected data.
//!
//! The wire payload reports each invalid field as a single dotted string
//! (`"legalRepresentativePersonalAddress.city"`); the domain type splits it
//! into an ordered [`DottedPath`] so the error mapper can match on segments.

use serde::{Deserialize, Serialize};

/// Validation error codes reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    Missing,
    InvalidString,
    InvalidType,
    TooLong,
    TooShort,
    UnrecognizedKeys,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Missing => "Missing",
            Self::InvalidString => "InvalidString",
            Self::InvalidType => "InvalidType",
            Self::TooLong => "TooLong",
            Self::TooShort => "TooShort",
            Self::UnrecognizedKeys => "UnrecognizedKeys",
        };
        write!(f, "{s}")
    }
}

/// A server-reported field identifier as an ordered list of nested
/// property names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedPath(Vec<String>);

impl DottedPath {
    /// Split a raw dotted string into segments.
    pub fn parse(raw: &str) -> Self {
        Self(raw.split('.').map(str::to_string).collect())
    }

    pub fn from_segments<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Whether the segments equal `pattern` exactly.
    pub fn matches(&self, pattern: &[&str]) -> bool {
        self.0.len() == pattern.len() && self.0.iter().zip(pattern).all(|(s, p)| s == p)
    }
}

impl std::fmt::Display for DottedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// A single invalid field with its reported codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: DottedPath,
    pub codes: Vec<ErrorCode>,
}

/// Server-computed validity state of all collected onboarding data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingStatus {
    Invalid { errors: Vec<FieldError> },
    Valid,
    Finalized,
}

impl OnboardingStatus {
    /// Field errors, empty unless the status is `Invalid`.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Invalid { errors } => errors,
            _ => &[],
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

// ── Wire payload ─────────────────────────────────────────────────────

/// Status discriminant as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Valid,
    Invalid,
    Finalized,
}

/// One invalid field on the wire: a dotted string plus its codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFieldError {
    pub field: String,
    pub errors: Vec<ErrorCode>,
}

/// The status payload consumed from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPayload {
    pub status: StatusKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<RawFieldError>>,
}

impl From<StatusPayload> for OnboardingStatus {
    fn from(payload: StatusPayload) -> Self {
        match payload.status {
            StatusKind::Valid => Self::Valid,
            StatusKind::Finalized => Self::Finalized,
            StatusKind::Invalid => Self::Invalid {
                errors: payload
                    .errors
                    .unwrap_or_default()
                    .into_iter()
                    .map(|raw| FieldError {
                        field: DottedPath::parse(&raw.field),
                        codes: raw.errors,
                    })
                    .collect(),
            },
        }
    }
}
