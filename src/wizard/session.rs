//! WizardSession — coordinates the onboarding snapshot, submissions, the
//! finalization gate, and navigation.
//!
//! All reads derive from a single shared snapshot that is replaced
//! atomically by a successful mutation; a rejected response never
//! partially mutates state. Submissions are single-flight per step and
//! tagged with a monotonically increasing request id — a response whose id
//! is no longer the latest recorded for its step is discarded.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tracing::{info, warn};

use crate::error::{Result, SubmitError};
use crate::holder::AccountHolder;
use crate::remote::{MutationOutcome, OnboardingUpdate, RejectedField, RemoteClient};
use crate::status::{DottedPath, FieldError, OnboardingStatus};

use super::finalize::FinalizationGate;
use super::local::LocalRules;
use super::mapper;
use super::navigator;
use super::stepper::{self, StepperNode};
use super::steps::{self, StepError, StepId, WizardStep};

/// The shared onboarding state all reads derive from.
#[derive(Debug, Clone)]
pub struct OnboardingSnapshot {
    pub onboarding_id: String,
    pub holder: AccountHolder,
    pub status: OnboardingStatus,
}

/// Observable effects for collaborators (analytics hook etc.).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WizardEvent {
    Navigated { from: StepId, to: StepId, url: String },
    ErrorsRevealed,
}

/// Result of submitting a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The snapshot was replaced with the fresh state.
    Accepted,
    /// Server-side validation rejected the payload; the user stays on the
    /// step and sees these per-field errors once finalized.
    Rejected { errors: Vec<StepError> },
    /// A generic rejection — a notification, no field-level guidance.
    Failed { message: String },
    /// The response resolved after a newer action made it stale; it was
    /// discarded without touching state.
    Superseded,
}

/// Result of a finalization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The backend accepted; the onboarding status is now `Finalized`.
    Completed,
    /// Validation failed — the gate is now flipped and errors are visible.
    Rejected,
    /// A generic rejection; the gate is untouched.
    Failed { message: String },
}

/// Coordinates the wizard: step graph, submissions, gate, navigation.
pub struct WizardSession {
    remote: Arc<dyn RemoteClient>,
    snapshot: Arc<RwLock<OnboardingSnapshot>>,
    gate: Arc<RwLock<FinalizationGate>>,
    finalized_at: Arc<RwLock<Option<DateTime<Utc>>>>,
    rules: LocalRules,
    /// Latest pending request id per step; presence means in-flight.
    in_flight: Arc<RwLock<HashMap<StepId, u64>>>,
    request_seq: AtomicU64,
    events: broadcast::Sender<WizardEvent>,
}

impl WizardSession {
    pub fn new(remote: Arc<dyn RemoteClient>, snapshot: OnboardingSnapshot) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            remote,
            snapshot: Arc::new(RwLock::new(snapshot)),
            gate: Arc::new(RwLock::new(FinalizationGate::default())),
            finalized_at: Arc::new(RwLock::new(None)),
            rules: LocalRules::default_rules(),
            in_flight: Arc::new(RwLock::new(HashMap::new())),
            request_seq: AtomicU64::new(0),
            events,
        }
    }

    /// Subscribe to navigation/finalization events.
    pub fn subscribe(&self) -> broadcast::Receiver<WizardEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> OnboardingSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn is_finalized(&self) -> bool {
        self.gate.read().await.is_finalized()
    }

    pub async fn finalized_at(&self) -> Option<DateTime<Utc>> {
        *self.finalized_at.read().await
    }

    /// The full step list, errors computed unconditionally.
    pub async fn steps(&self) -> Vec<WizardStep> {
        let snap = self.snapshot.read().await;
        steps::build_steps(&snap.holder, &snap.status, &snap.onboarding_id)
    }

    /// The step list as handed to step-level UI: error lists are emptied
    /// until the gate flips.
    pub async fn steps_for_ui(&self) -> Vec<WizardStep> {
        let finalized = self.is_finalized().await;
        let mut steps = self.steps().await;
        if !finalized {
            for step in &mut steps {
                step.errors.clear();
            }
        }
        steps
    }

    /// The condensed stepper projection.
    pub async fn stepper(&self) -> Vec<StepperNode> {
        let finalized = self.is_finalized().await;
        let steps = self.steps().await;
        stepper::project(&steps, finalized)
    }

    /// Errors currently visible for one step.
    pub async fn visible_errors(&self, step: StepId) -> Vec<StepError> {
        let steps = self.steps().await;
        let computed = steps
            .into_iter()
            .find(|s| s.id == step)
            .map(|s| s.errors)
            .unwrap_or_default();
        self.gate.read().await.visible(&computed).to_vec()
    }

    /// Whether a submission is pending for a step (the UI's loading flag).
    pub async fn is_loading(&self, step: StepId) -> bool {
        self.in_flight.read().await.contains_key(&step)
    }

    /// Mark any pending submission for `step` as stale. Its response will
    /// be discarded when it resolves; the call itself is not cancelled.
    pub async fn invalidate_step(&self, step: StepId) {
        if self.in_flight.write().await.remove(&step).is_some() {
            info!(step = %step, "pending submission invalidated by navigation");
        }
    }

    /// Submit a step payload.
    ///
    /// Local validation blocks the submission outright; server validation
    /// rejections are non-fatal and come back as [`SubmitOutcome::Rejected`].
    pub async fn submit_step(
        &self,
        step: StepId,
        payload: serde_json::Value,
    ) -> Result<SubmitOutcome> {
        let (onboarding_id, holder) = {
            let snap = self.snapshot.read().await;
            (snap.onboarding_id.clone(), snap.holder.clone())
        };

        if !self.steps().await.iter().any(|s| s.id == step) {
            return Err(SubmitError::NotInFlow { step }.into());
        }

        let local = self.rules.validate_step(&holder, step, &payload);
        if !local.is_empty() {
            return Err(SubmitError::LocalValidation { errors: local }.into());
        }

        let request_id = self.request_seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut in_flight = self.in_flight.write().await;
            if in_flight.contains_key(&step) {
                return Err(SubmitError::AlreadyInFlight { step }.into());
            }
            in_flight.insert(step, request_id);
        }

        let result = self.remote.update_step(&onboarding_id, step, &payload).await;

        // Still the latest submission for this step? If not, the response
        // is stale and must not touch state.
        let still_current = {
            let mut in_flight = self.in_flight.write().await;
            match in_flight.get(&step) {
                Some(id) if *id == request_id => {
                    in_flight.remove(&step);
                    true
                }
                _ => false,
            }
        };
        if !still_current {
            warn!(step = %step, request_id, "discarding stale submission response");
            return Ok(SubmitOutcome::Superseded);
        }

        match result? {
            MutationOutcome::Success { onboarding } => {
                self.install_update(onboarding).await;
                Ok(SubmitOutcome::Accepted)
            }
            MutationOutcome::ValidationRejection { fields } => {
                let errors = mapper::map_errors(&rejection_status(fields), step);
                Ok(SubmitOutcome::Rejected { errors })
            }
            MutationOutcome::OtherRejection { message } => Ok(SubmitOutcome::Failed { message }),
        }
    }

    /// Attempt finalization. A validation rejection flips the gate — the
    /// one action that makes computed errors visible for the rest of the
    /// session.
    pub async fn finalize(&self) -> Result<FinalizeOutcome> {
        let onboarding_id = self.snapshot.read().await.onboarding_id.clone();

        match self.remote.finalize(&onboarding_id).await? {
            MutationOutcome::Success { onboarding } => {
                self.install_update(onboarding).await;
                Ok(FinalizeOutcome::Completed)
            }
            MutationOutcome::ValidationRejection { fields } => {
                let status = rejection_status(fields);
                mapper::warn_unmatched(&status);
                {
                    let mut snap = self.snapshot.write().await;
                    snap.status = status;
                }
                let newly_flipped = {
                    let mut gate = self.gate.write().await;
                    let was = gate.is_finalized();
                    gate.finalize();
                    !was
                };
                if newly_flipped {
                    *self.finalized_at.write().await = Some(Utc::now());
                    info!("finalization attempt rejected, validation errors now visible");
                    let _ = self.events.send(WizardEvent::ErrorsRevealed);
                }
                Ok(FinalizeOutcome::Rejected)
            }
            MutationOutcome::OtherRejection { message } => Ok(FinalizeOutcome::Failed { message }),
        }
    }

    /// Move to the step after `current`, if any. Returns the target route.
    pub async fn navigate_next(&self, current: StepId) -> Option<String> {
        let steps = self.steps().await;
        let target = navigator::next(&steps, current)?.clone();
        self.after_navigation(current, &target).await;
        Some(target.url)
    }

    /// Move to the step before `current`, if any. Returns the target route.
    pub async fn navigate_previous(&self, current: StepId) -> Option<String> {
        let steps = self.steps().await;
        let target = navigator::previous(&steps, current)?.clone();
        self.after_navigation(current, &target).await;
        Some(target.url)
    }

    async fn after_navigation(&self, from: StepId, target: &WizardStep) {
        // Navigating away does not cancel an in-flight submission; it only
        // makes its eventual response stale.
        self.invalidate_step(from).await;
        info!(from = %from, to = %target.id, "navigation");
        let _ = self.events.send(WizardEvent::Navigated {
            from,
            to: target.id,
            url: target.url.clone(),
        });
    }

    async fn install_update(&self, update: OnboardingUpdate) {
        mapper::warn_unmatched(&update.status);
        let mut snap = self.snapshot.write().await;
        snap.holder = update.holder;
        snap.status = update.status;
    }
}

/// Build an `Invalid` status from a rejection's flat field list so the
/// mapper can route it like any status response.
fn rejection_status(fields: Vec<RejectedField>) -> OnboardingStatus {
    OnboardingStatus::Invalid {
        errors: fields
            .into_iter()
            .map(|field| FieldError {
                field: DottedPath::from_segments(field.path),
                codes: vec![field.code],
            })
            .collect(),
    }
}
