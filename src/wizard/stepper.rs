//! Stepper view projector — derives the condensed, user-facing progress
//! indicator from the full step list.
//!
//! Pure projection: grouping never alters the underlying navigation graph.
//! The union of leaves across all nodes equals the step list, in order,
//! with the Organisation steps collapsed into one group anchored at the
//! first Organisation step.

use serde::Serialize;

use super::steps::{StepId, WizardStep};

/// A leaf entry of the stepper (a step, or one child of a group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepperItem {
    pub id: StepId,
    pub url: String,
    pub label: String,
    /// Errors exist the moment they are computed, but only become visible
    /// once the wizard is finalized.
    pub has_errors: bool,
}

/// A node of the display-only stepper projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StepperNode {
    Step(StepperItem),
    Group {
        label: String,
        children: Vec<StepperItem>,
    },
}

fn item(step: &WizardStep, finalized: bool) -> StepperItem {
    StepperItem {
        id: step.id,
        url: step.url.clone(),
        label: step.label.clone(),
        has_errors: finalized && !step.errors.is_empty(),
    }
}

/// Project the step list into stepper nodes.
///
/// Retains every step that is `Organisation1` or not Organisation-prefixed;
/// `Organisation1` is replaced by a group whose children are all
/// Organisation steps from the original list, in original order.
pub fn project(steps: &[WizardStep], finalized: bool) -> Vec<StepperNode> {
    steps
        .iter()
        .filter(|step| step.id == StepId::Organisation1 || !step.id.is_organisation())
        .map(|step| {
            if step.id == StepId::Organisation1 {
                StepperNode::Group {
                    label: "Organisation".to_string(),
                    children: steps
                        .iter()
                        .filter(|s| s.id.is_organisation())
                        .map(|s| item(s, finalized))
                        .collect(),
                }
            } else {
                StepperNode::Step(item(step, finalized))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ErrorCode;
    use crate::wizard::steps::StepError;

    fn step(id: StepId, errors: Vec<StepError>) -> WizardStep {
        WizardStep {
            id,
            url: id.route("ob-1"),
            label: id.label().to_string(),
            errors,
        }
    }

    fn field_error(name: &str) -> StepError {
        StepError {
            field_name: name.to_string(),
            code: ErrorCode::Missing,
        }
    }

    fn company_steps() -> Vec<WizardStep> {
        vec![
            step(StepId::Registration, vec![]),
            step(StepId::Organisation1, vec![field_error("name")]),
            step(StepId::Organisation2, vec![]),
            step(StepId::Ownership, vec![]),
            step(StepId::Finalize, vec![]),
        ]
    }

    /// Leaves of a node list, flattened in order.
    fn leaves(nodes: &[StepperNode]) -> Vec<StepId> {
        nodes
            .iter()
            .flat_map(|node| match node {
                StepperNode::Step(item) => vec![item.id],
                StepperNode::Group { children, .. } => children.iter().map(|c| c.id).collect(),
            })
            .collect()
    }

    #[test]
    fn organisation_steps_collapse_into_one_group() {
        let nodes = project(&company_steps(), false);
        assert_eq!(nodes.len(), 4);
        match &nodes[1] {
            StepperNode::Group { label, children } => {
                assert_eq!(label, "Organisation");
                assert_eq!(
                    children.iter().map(|c| c.id).collect::<Vec<_>>(),
                    vec![StepId::Organisation1, StepId::Organisation2]
                );
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn leaf_union_preserves_the_step_list() {
        let steps = company_steps();
        let nodes = project(&steps, true);
        assert_eq!(
            leaves(&nodes),
            steps.iter().map(|s| s.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn errors_hidden_until_finalized() {
        let steps = company_steps();

        let before = project(&steps, false);
        for node in &before {
            match node {
                StepperNode::Step(item) => assert!(!item.has_errors),
                StepperNode::Group { children, .. } => {
                    assert!(children.iter().all(|c| !c.has_errors))
                }
            }
        }

        let after = project(&steps, true);
        match &after[1] {
            StepperNode::Group { children, .. } => {
                assert!(children[0].has_errors, "Organisation1 carries an error");
                assert!(!children[1].has_errors);
            }
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn individual_flow_projects_flat() {
        let steps = vec![
            step(StepId::Email, vec![]),
            step(StepId::Location, vec![]),
            step(StepId::Details, vec![]),
            step(StepId::Finalize, vec![]),
        ];
        let nodes = project(&steps, false);
        assert_eq!(nodes.len(), 4);
        assert!(nodes
            .iter()
            .all(|n| matches!(n, StepperNode::Step(_))));
    }
}
