//! Wizard navigator — next/previous relative to the current step.
//!
//! Reaching a boundary is a normal terminal condition, not an error: the
//! UI prevents "previous" on the first step, and this module simply
//! returns `None`.

use super::steps::{StepId, WizardStep};

fn index_of(steps: &[WizardStep], current: StepId) -> Option<usize> {
    steps.iter().position(|step| step.id == current)
}

/// The step after `current`, if any.
pub fn next(steps: &[WizardStep], current: StepId) -> Option<&WizardStep> {
    let index = index_of(steps, current)?;
    steps.get(index + 1)
}

/// The step before `current`, if any.
pub fn previous(steps: &[WizardStep], current: StepId) -> Option<&WizardStep> {
    let index = index_of(steps, current)?;
    index.checked_sub(1).and_then(|i| steps.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(ids: &[StepId]) -> Vec<WizardStep> {
        ids.iter()
            .map(|id| WizardStep {
                id: *id,
                url: id.route("ob-1"),
                label: id.label().to_string(),
                errors: vec![],
            })
            .collect()
    }

    fn flow() -> Vec<WizardStep> {
        steps(&[
            StepId::Registration,
            StepId::Organisation1,
            StepId::Organisation2,
            StepId::Finalize,
        ])
    }

    #[test]
    fn next_moves_forward() {
        let flow = flow();
        let step = next(&flow, StepId::Registration).unwrap();
        assert_eq!(step.id, StepId::Organisation1);
        assert_eq!(step.url, "/onboardings/ob-1/organisation-1");
    }

    #[test]
    fn previous_moves_backward() {
        let flow = flow();
        let step = previous(&flow, StepId::Organisation2).unwrap();
        assert_eq!(step.id, StepId::Organisation1);
    }

    #[test]
    fn boundaries_are_no_ops() {
        let flow = flow();
        assert!(next(&flow, StepId::Finalize).is_none());
        assert!(previous(&flow, StepId::Registration).is_none());
    }

    #[test]
    fn unknown_current_is_a_no_op() {
        let flow = flow();
        assert!(next(&flow, StepId::Email).is_none());
        assert!(previous(&flow, StepId::Email).is_none());
    }

    #[test]
    fn next_then_previous_returns_to_origin() {
        let flow = flow();
        for interior in [StepId::Organisation1, StepId::Organisation2] {
            let forward = next(&flow, interior).unwrap().id;
            let back = previous(&flow, forward).unwrap().id;
            assert_eq!(back, interior);
        }
    }
}
