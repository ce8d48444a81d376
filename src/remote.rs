//! Remote mutation contract — consumed, not owned, by the wizard core.
//!
//! The engine only interprets the shape of a rejection's field paths and
//! the presence or absence of a rejection; transport mechanics live behind
//! the [`RemoteClient`] trait. [`InMemoryRemote`] is the dev/test
//! collaborator honoring the same contract.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::RemoteError;
use crate::holder::AccountHolder;
use crate::status::{ErrorCode, OnboardingStatus, RawFieldError, StatusKind, StatusPayload};
use crate::wizard::mapper::UBO_PATH_ROOT;
use crate::wizard::steps::StepId;

/// One rejected field of a validation rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedField {
    pub path: Vec<String>,
    pub code: ErrorCode,
    pub message: String,
}

/// Fresh onboarding state carried by a successful mutation.
#[derive(Debug, Clone)]
pub struct OnboardingUpdate {
    pub holder: AccountHolder,
    pub status: OnboardingStatus,
}

/// Result of a remote mutation call.
#[derive(Debug, Clone)]
pub enum MutationOutcome {
    /// The mutation was accepted; the carried state fully replaces the
    /// session snapshot.
    Success { onboarding: OnboardingUpdate },
    /// The payload failed server-side validation; state is unchanged.
    ValidationRejection { fields: Vec<RejectedField> },
    /// A generic rejection with no field-level guidance.
    OtherRejection { message: String },
}

/// The remote mutation surface of the onboarding backend.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn update_step(
        &self,
        onboarding_id: &str,
        step: StepId,
        payload: &serde_json::Value,
    ) -> Result<MutationOutcome, RemoteError>;

    async fn finalize(&self, onboarding_id: &str) -> Result<MutationOutcome, RemoteError>;
}

// ── In-memory double ─────────────────────────────────────────────────

/// Fields the backend requires before an onboarding becomes `Valid`,
/// expressed as dotted paths.
fn required_fields(holder: &AccountHolder) -> &'static [&'static str] {
    match holder {
        AccountHolder::Company(_) => &[
            "email",
            "legalRepresentativePersonalAddress.city",
            "name",
            "registrationNumber",
            "businessActivity",
            "monthlyPaymentVolume",
        ],
        AccountHolder::Individual(_) => &[
            "email",
            "residencyAddress.city",
            "firstName",
            "lastName",
        ],
    }
}

/// Payload keys the backend recognizes beyond the required set.
const OPTIONAL_KEYS: &[&str] = &[
    "tcuAccepted",
    "vatNumber",
    "taxIdentificationNumber",
    "addressLine1",
    "postalCode",
    "country",
    "city",
    "businessActivityDescription",
    "birthDate",
    "employmentStatus",
    "monthlyIncome",
];

const MAX_VALUE_LEN: usize = 255;

struct StoredOnboarding {
    holder: AccountHolder,
    /// Accumulated payload keys across all accepted submissions.
    submitted: HashSet<String>,
    finalized: bool,
}

impl StoredOnboarding {
    /// Whether a dotted requirement is satisfied by a submitted key: the
    /// full dotted form or its final segment both count.
    fn satisfies(&self, requirement: &str) -> bool {
        if self.submitted.contains(requirement) {
            return true;
        }
        requirement
            .rsplit('.')
            .next()
            .is_some_and(|leaf| self.submitted.contains(leaf))
    }

    /// Emit the wire-shaped status payload, as the real backend would.
    fn status_payload(&self) -> StatusPayload {
        if self.finalized {
            return StatusPayload {
                status: StatusKind::Finalized,
                errors: None,
            };
        }
        let missing: Vec<RawFieldError> = required_fields(&self.holder)
            .iter()
            .filter(|req| !self.satisfies(req))
            .map(|req| RawFieldError {
                field: (*req).to_string(),
                errors: vec![ErrorCode::Missing],
            })
            .collect();
        if missing.is_empty() {
            StatusPayload {
                status: StatusKind::Valid,
                errors: None,
            }
        } else {
            StatusPayload {
                status: StatusKind::Invalid,
                errors: Some(missing),
            }
        }
    }

    fn status(&self) -> OnboardingStatus {
        self.status_payload().into()
    }

    fn update(&self) -> OnboardingUpdate {
        OnboardingUpdate {
            holder: self.holder.clone(),
            status: self.status(),
        }
    }
}

/// In-process backend double enforcing the mutation contract: accumulates
/// submissions per onboarding, rejects unknown or overlong values, and
/// recomputes the status payload on every call.
pub struct InMemoryRemote {
    onboardings: Mutex<HashMap<String, StoredOnboarding>>,
    update_calls: AtomicUsize,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self {
            onboardings: Mutex::new(HashMap::new()),
            update_calls: AtomicUsize::new(0),
        }
    }

    /// Seed an onboarding so the double can serve it.
    pub async fn seed(&self, onboarding_id: &str, holder: AccountHolder) {
        self.onboardings.lock().await.insert(
            onboarding_id.to_string(),
            StoredOnboarding {
                holder,
                submitted: HashSet::new(),
                finalized: false,
            },
        );
    }

    /// Number of `update_step` calls that reached the double.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn reject_payload(&self, payload: &serde_json::Value) -> Option<Vec<RejectedField>> {
        let object = payload.as_object()?;
        let mut fields = Vec::new();
        for (key, value) in object {
            let known = key.starts_with(UBO_PATH_ROOT)
                || OPTIONAL_KEYS.contains(&key.as_str())
                || key.contains('.')
                || ["email", "name", "registrationNumber", "businessActivity",
                    "monthlyPaymentVolume", "firstName", "lastName", "city"]
                    .contains(&key.as_str());
            if !known {
                fields.push(RejectedField {
                    path: key.split('.').map(str::to_string).collect(),
                    code: ErrorCode::UnrecognizedKeys,
                    message: format!("unrecognized key {key}"),
                });
                continue;
            }
            if let Some(s) = value.as_str() {
                if s.len() > MAX_VALUE_LEN {
                    fields.push(RejectedField {
                        path: key.split('.').map(str::to_string).collect(),
                        code: ErrorCode::TooLong,
                        message: format!("{key} is too long"),
                    });
                }
            }
        }
        if fields.is_empty() { None } else { Some(fields) }
    }
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteClient for InMemoryRemote {
    async fn update_step(
        &self,
        onboarding_id: &str,
        _step: StepId,
        payload: &serde_json::Value,
    ) -> Result<MutationOutcome, RemoteError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(fields) = self.reject_payload(payload) {
            return Ok(MutationOutcome::ValidationRejection { fields });
        }

        let mut onboardings = self.onboardings.lock().await;
        let stored = onboardings
            .get_mut(onboarding_id)
            .ok_or_else(|| RemoteError::NotFound {
                onboarding_id: onboarding_id.to_string(),
            })?;

        if stored.finalized {
            return Ok(MutationOutcome::OtherRejection {
                message: "onboarding is already finalized".to_string(),
            });
        }

        if let Some(object) = payload.as_object() {
            stored.submitted.extend(object.keys().cloned());
        }
        Ok(MutationOutcome::Success {
            onboarding: stored.update(),
        })
    }

    async fn finalize(&self, onboarding_id: &str) -> Result<MutationOutcome, RemoteError> {
        let mut onboardings = self.onboardings.lock().await;
        let stored = onboardings
            .get_mut(onboarding_id)
            .ok_or_else(|| RemoteError::NotFound {
                onboarding_id: onboarding_id.to_string(),
            })?;

        match stored.status() {
            OnboardingStatus::Invalid { errors } => Ok(MutationOutcome::ValidationRejection {
                fields: errors
                    .into_iter()
                    .flat_map(|error| {
                        let path: Vec<String> = error.field.segments().to_vec();
                        let message = format!("{} is invalid", error.field);
                        error.codes.into_iter().map(move |code| RejectedField {
                            path: path.clone(),
                            code,
                            message: message.clone(),
                        })
                    })
                    .collect(),
            }),
            _ => {
                stored.finalized = true;
                Ok(MutationOutcome::Success {
                    onboarding: stored.update(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holder::{CompanyHolder, CompanyType, IndividualHolder};
    use serde_json::json;

    async fn seeded_individual() -> InMemoryRemote {
        let remote = InMemoryRemote::new();
        remote
            .seed(
                "ob-1",
                AccountHolder::Individual(IndividualHolder::default()),
            )
            .await;
        remote
    }

    #[tokio::test]
    async fn accumulated_submissions_drive_the_status() {
        let remote = seeded_individual().await;

        let outcome = remote
            .update_step("ob-1", StepId::Email, &json!({"email": "a@b.example"}))
            .await
            .unwrap();
        let MutationOutcome::Success { onboarding } = outcome else {
            panic!("expected success");
        };
        let missing = onboarding.status.field_errors();
        assert_eq!(missing.len(), 3);

        remote
            .update_step("ob-1", StepId::Location, &json!({"city": "Berlin"}))
            .await
            .unwrap();
        let outcome = remote
            .update_step(
                "ob-1",
                StepId::Details,
                &json!({"firstName": "Ada", "lastName": "Lovelace"}),
            )
            .await
            .unwrap();
        let MutationOutcome::Success { onboarding } = outcome else {
            panic!("expected success");
        };
        assert!(onboarding.status.is_valid());
    }

    #[tokio::test]
    async fn unknown_key_is_rejected_not_stored() {
        let remote = seeded_individual().await;
        let outcome = remote
            .update_step("ob-1", StepId::Email, &json!({"bogusField": "x"}))
            .await
            .unwrap();
        match outcome {
            MutationOutcome::ValidationRejection { fields } => {
                assert_eq!(fields[0].code, ErrorCode::UnrecognizedKeys);
                assert_eq!(fields[0].path, vec!["bogusField"]);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn overlong_value_is_rejected() {
        let remote = seeded_individual().await;
        let outcome = remote
            .update_step("ob-1", StepId::Email, &json!({"email": "x".repeat(300)}))
            .await
            .unwrap();
        match outcome {
            MutationOutcome::ValidationRejection { fields } => {
                assert_eq!(fields[0].code, ErrorCode::TooLong);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn finalize_rejects_while_invalid_then_succeeds() {
        let remote = InMemoryRemote::new();
        remote
            .seed(
                "ob-2",
                AccountHolder::Company(CompanyHolder::new(CompanyType::SelfEmployed)),
            )
            .await;

        let outcome = remote.finalize("ob-2").await.unwrap();
        let MutationOutcome::ValidationRejection { fields } = outcome else {
            panic!("expected rejection");
        };
        assert!(!fields.is_empty());
        assert!(fields.iter().all(|f| f.code == ErrorCode::Missing));

        for (step, payload) in [
            (StepId::Registration, json!({"email": "a@b.example", "legalRepresentativePersonalAddress.city": "Paris"})),
            (StepId::Organisation1, json!({"name": "Acme", "registrationNumber": "42"})),
            (StepId::Organisation2, json!({"businessActivity": "retail", "monthlyPaymentVolume": "lessThan10000"})),
        ] {
            remote.update_step("ob-2", step, &payload).await.unwrap();
        }

        let outcome = remote.finalize("ob-2").await.unwrap();
        let MutationOutcome::Success { onboarding } = outcome else {
            panic!("expected success");
        };
        assert!(onboarding.status.is_finalized());
    }

    #[tokio::test]
    async fn unknown_onboarding_is_not_found() {
        let remote = InMemoryRemote::new();
        let err = remote
            .update_step("missing", StepId::Email, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_calls_are_counted() {
        let remote = seeded_individual().await;
        assert_eq!(remote.update_calls(), 0);
        remote
            .update_step("ob-1", StepId::Email, &json!({"email": "a@b.example"}))
            .await
            .unwrap();
        assert_eq!(remote.update_calls(), 1);
    }
}
