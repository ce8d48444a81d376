//! Finalization gate — governs when computed errors become visible.
//!
//! Two states, one transition: `NotFinalized → Finalized`, flipped by the
//! first submission attempt that fails validation. `Finalized` has no
//! outgoing transition within a session; corrective edits never reset it.

use serde::{Deserialize, Serialize};

/// Whether validation errors are surfaced to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinalizationGate {
    #[default]
    NotFinalized,
    Finalized,
}

impl FinalizationGate {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: FinalizationGate) -> bool {
        matches!((self, target), (Self::NotFinalized, Self::Finalized))
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized)
    }

    /// Flip the gate. Monotonic: once finalized, stays finalized.
    pub fn finalize(&mut self) {
        *self = Self::Finalized;
    }

    /// Gate a computed error list: empty until finalized, passed through
    /// unchanged afterwards.
    pub fn visible<'a, T>(&self, computed: &'a [T]) -> &'a [T] {
        if self.is_finalized() { computed } else { &[] }
    }
}

impl std::fmt::Display for FinalizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotFinalized => "notFinalized",
            Self::Finalized => "finalized",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_forward_transition_is_valid() {
        use FinalizationGate::*;
        assert!(NotFinalized.can_transition_to(Finalized));
        assert!(!Finalized.can_transition_to(NotFinalized));
        assert!(!NotFinalized.can_transition_to(NotFinalized));
        assert!(!Finalized.can_transition_to(Finalized));
    }

    #[test]
    fn finalize_is_monotonic() {
        let mut gate = FinalizationGate::default();
        assert!(!gate.is_finalized());
        gate.finalize();
        assert!(gate.is_finalized());
        // Repeated flips stay finalized.
        gate.finalize();
        assert!(gate.is_finalized());
    }

    #[test]
    fn visible_gates_on_state() {
        let computed = vec!["email", "city"];
        let mut gate = FinalizationGate::default();
        assert!(gate.visible(&computed).is_empty());
        gate.finalize();
        assert_eq!(gate.visible(&computed), &["email", "city"]);
    }

    #[test]
    fn display_matches_serde() {
        for gate in [FinalizationGate::NotFinalized, FinalizationGate::Finalized] {
            let display = format!("{gate}");
            let json = serde_json::to_string(&gate).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }
}
