//! Classified outcomes of meeting-point computations.
//!
//! None of these are fatal. Each names a distinct reason the caller gets no
//! overlap region, so that user-facing messaging can tell "a provider let us
//! down" apart from "these people are simply too far apart".

use crate::domain::TravelerId;
use crate::share::ShareError;

use super::budget::BudgetProbe;

/// Why a meeting region could not be produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeetingError {
    /// Not enough travelers for the requested operation
    #[error("need at least {required} travelers, got {actual}")]
    TooFewTravelers { required: usize, actual: usize },

    /// Budget outside the supported range
    #[error("travel budget of {0} minutes is outside 1..=60")]
    InvalidBudget(u32),

    /// Some travelers have no isochrone (fetch failed or provider returned none)
    #[error("missing isochrones for {} of {expected} travelers", missing.len())]
    InsufficientData {
        missing: Vec<TravelerId>,
        expected: usize,
    },

    /// Every isochrone is present but they share no area
    #[error("no overlapping area within {budget_minutes} minutes")]
    NoOverlap { budget_minutes: u32 },

    /// No candidate budget produced an overlap
    #[error("no candidate budget up to {max_budget} minutes yields an overlap")]
    Infeasible {
        max_budget: u32,
        probes: Vec<BudgetProbe>,
    },

    /// Share token could not be decoded
    #[error("share token rejected: {0}")]
    DecodeRejected(#[from] ShareError),
}

impl MeetingError {
    /// Whether the failure stems from missing provider data rather than
    /// from geometry.
    pub fn is_data_problem(&self) -> bool {
        match self {
            MeetingError::InsufficientData { .. } => true,
            MeetingError::Infeasible { probes, .. } => probes
                .iter()
                .any(|p| matches!(p.outcome, super::ProbeOutcome::InsufficientData { .. })),
            _ => false,
        }
    }

    /// Whether no provider data backed the outcome at all: every isochrone
    /// was missing, or every probed budget lacked data.
    pub fn is_starved(&self) -> bool {
        match self {
            MeetingError::InsufficientData { .. } => true,
            MeetingError::Infeasible { probes, .. } => probes
                .iter()
                .all(|p| matches!(p.outcome, super::ProbeOutcome::InsufficientData { .. })),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ProbeOutcome;

    #[test]
    fn error_display() {
        let err = MeetingError::TooFewTravelers {
            required: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "need at least 2 travelers, got 1");

        let err = MeetingError::InvalidBudget(90);
        assert_eq!(
            err.to_string(),
            "travel budget of 90 minutes is outside 1..=60"
        );

        let err = MeetingError::InsufficientData {
            missing: vec![TravelerId::from("a")],
            expected: 3,
        };
        assert_eq!(err.to_string(), "missing isochrones for 1 of 3 travelers");

        let err = MeetingError::NoOverlap { budget_minutes: 15 };
        assert_eq!(err.to_string(), "no overlapping area within 15 minutes");

        let err = MeetingError::DecodeRejected(ShareError::UnsupportedVersion(7));
        assert_eq!(
            err.to_string(),
            "share token rejected: unsupported share version 7"
        );
    }

    #[test]
    fn data_problems_are_distinguished_from_geometry() {
        let insufficient = MeetingError::InsufficientData {
            missing: vec![],
            expected: 2,
        };
        assert!(insufficient.is_data_problem());
        assert!(!MeetingError::NoOverlap { budget_minutes: 5 }.is_data_problem());

        let geometric = MeetingError::Infeasible {
            max_budget: 60,
            probes: vec![BudgetProbe {
                budget_minutes: 60,
                outcome: ProbeOutcome::NoOverlap,
            }],
        };
        assert!(!geometric.is_data_problem());

        let starved = MeetingError::Infeasible {
            max_budget: 60,
            probes: vec![BudgetProbe {
                budget_minutes: 60,
                outcome: ProbeOutcome::InsufficientData { missing: 2 },
            }],
        };
        assert!(starved.is_data_problem());
        assert!(starved.is_starved());
    }

    #[test]
    fn mixed_outcomes_are_incomplete_but_not_starved() {
        let outcomes = [
            (35, ProbeOutcome::NoOverlap),
            (50, ProbeOutcome::NoOverlap),
            (55, ProbeOutcome::NoOverlap),
            (60, ProbeOutcome::InsufficientData { missing: 1 }),
        ];
        let mixed = MeetingError::Infeasible {
            max_budget: 60,
            probes: outcomes
                .into_iter()
                .map(|(budget_minutes, outcome)| BudgetProbe {
                    budget_minutes,
                    outcome,
                })
                .collect(),
        };

        assert!(mixed.is_data_problem());
        assert!(!mixed.is_starved());
        assert!(!MeetingError::NoOverlap { budget_minutes: 5 }.is_starved());
    }
}
