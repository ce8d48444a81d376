//! Onboarding wizard orchestration engine.
//!
//! The wizard guides an account holder through a computed sequence of
//! regulatory (KYC) steps. This module owns the real invariants of the
//! system: which steps apply to a holder, how server-reported field errors
//! map onto steps, forward/backward navigation, and the finalization gate
//! that decides when errors become visible.

pub mod finalize;
pub mod local;
pub mod mapper;
pub mod navigator;
pub mod routes;
pub mod session;
pub mod stepper;
pub mod steps;

pub use finalize::FinalizationGate;
pub use local::{LocalError, LocalRule, LocalRules};
pub use routes::{WizardRouteState, wizard_routes};
pub use session::{
    FinalizeOutcome, OnboardingSnapshot, SubmitOutcome, WizardEvent, WizardSession,
};
pub use stepper::{StepperItem, StepperNode, project};
pub use steps::{StepError, StepId, WizardStep, build_steps, has_documents_step, has_ownership_step};
