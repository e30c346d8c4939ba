//! Minimal shared travel budget search.
//!
//! Reachable area grows with the budget, so "the isochrones overlap" flips
//! from false to true at most once along the ascending candidate list. The
//! default strategy bisects on that, issuing O(log n) rounds of isochrone
//! requests instead of one round per candidate.
//!
//! Road networks do not strictly guarantee this (one-way systems and
//! time-dependent congestion profiles can shrink reachable area at a higher
//! budget). A bisected result is therefore reported as minimal *under the
//! monotonic assumption*; callers that need certainty use
//! [`SearchStrategy::Linear`].

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Region, TransportMode, Traveler};

use super::config::{SearchConfig, SearchStrategy};
use super::error::MeetingError;
use super::isochrones::{IsochroneSet, fetch_isochrones};
use super::provider::IsochroneProvider;

/// Result of trying one budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// All isochrones present and overlapping
    Feasible,

    /// All isochrones present, no common area
    NoOverlap,

    /// `missing` travelers had no isochrone at this budget
    InsufficientData { missing: usize },
}

/// One budget that was tried during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetProbe {
    pub budget_minutes: u32,
    pub outcome: ProbeOutcome,
}

/// How much confidence the chosen budget deserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Minimality {
    /// Every smaller candidate was probed and genuinely had no overlap
    /// (or there is no smaller candidate).
    Exhaustive,

    /// The next smaller candidate genuinely had no overlap; smaller ones are
    /// assumed to fail as well.
    AssumedMonotonic,

    /// A smaller candidate failed only for lack of data, so a smaller
    /// feasible budget may exist.
    Unconfirmed,
}

/// The smallest feasible budget found.
#[derive(Debug, Clone)]
pub struct OptimalBudget {
    pub budget_minutes: u32,
    pub overlap: Region,
    pub isochrones: IsochroneSet,
    pub minimality: Minimality,

    /// Every probe in the order it was made.
    pub probes: Vec<BudgetProbe>,
}

/// Searches the candidate budgets for the smallest one with an overlap.
pub struct BudgetSearch<'a, P: IsochroneProvider> {
    provider: &'a P,
    config: &'a SearchConfig,
}

impl<'a, P: IsochroneProvider> BudgetSearch<'a, P> {
    pub fn new(provider: &'a P, config: &'a SearchConfig) -> Self {
        Self { provider, config }
    }

    /// Find the smallest candidate budget at which every traveler's
    /// isochrone overlaps.
    ///
    /// A budget at which some isochrone could not be fetched is treated like
    /// one without overlap when choosing where to look next; it never counts
    /// as success. Returns `Infeasible` if no candidate works.
    pub async fn run(
        &self,
        travelers: &[Traveler],
        mode: TransportMode,
    ) -> Result<OptimalBudget, MeetingError> {
        if travelers.len() < 2 {
            return Err(MeetingError::TooFewTravelers {
                required: 2,
                actual: travelers.len(),
            });
        }

        let candidates = self.config.candidate_budgets();
        let found = match self.config.strategy {
            SearchStrategy::Bisect => self.bisect(travelers, mode).await,
            SearchStrategy::Linear => self.linear(travelers, mode).await,
        };

        match found {
            (Some((index, overlap, isochrones)), probes) => {
                let minimality = minimality(candidates, index, &probes, self.config.strategy);
                let budget_minutes = candidates[index];
                info!(
                    budget_minutes,
                    ?minimality,
                    probes = probes.len(),
                    "Found feasible meeting budget"
                );
                Ok(OptimalBudget {
                    budget_minutes,
                    overlap,
                    isochrones,
                    minimality,
                    probes,
                })
            }
            (None, probes) => {
                info!(probes = probes.len(), "No feasible meeting budget");
                Err(MeetingError::Infeasible {
                    max_budget: self.config.max_candidate().unwrap_or(0),
                    probes,
                })
            }
        }
    }

    /// Half-open bisection over `[lo, hi)`: success moves `hi` down to the
    /// probe, failure moves `lo` past it.
    async fn bisect(
        &self,
        travelers: &[Traveler],
        mode: TransportMode,
    ) -> (Option<Found>, Vec<BudgetProbe>) {
        let candidates = self.config.candidate_budgets();
        let mut probes = Vec::new();
        let mut best = None;

        let (mut lo, mut hi) = (0, candidates.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let (probe, feasible) = self.probe(travelers, candidates[mid], mode).await;
            probes.push(probe);

            match feasible {
                Some((overlap, isochrones)) => {
                    best = Some((mid, overlap, isochrones));
                    hi = mid;
                }
                None => lo = mid + 1,
            }
        }

        (best, probes)
    }

    async fn linear(
        &self,
        travelers: &[Traveler],
        mode: TransportMode,
    ) -> (Option<Found>, Vec<BudgetProbe>) {
        let mut probes = Vec::new();

        for (index, &budget) in self.config.candidate_budgets().iter().enumerate() {
            let (probe, feasible) = self.probe(travelers, budget, mode).await;
            probes.push(probe);
            if let Some((overlap, isochrones)) = feasible {
                return (Some((index, overlap, isochrones)), probes);
            }
        }

        (None, probes)
    }

    /// Fetch all isochrones at one budget and reduce them.
    async fn probe(
        &self,
        travelers: &[Traveler],
        budget_minutes: u32,
        mode: TransportMode,
    ) -> (BudgetProbe, Option<(Region, IsochroneSet)>) {
        let isochrones = fetch_isochrones(self.provider, travelers, budget_minutes, mode).await;

        let (outcome, feasible) = match isochrones.overlap(travelers, budget_minutes, mode) {
            Ok(overlap) => (ProbeOutcome::Feasible, Some((overlap, isochrones))),
            Err(MeetingError::InsufficientData { missing, .. }) => (
                ProbeOutcome::InsufficientData {
                    missing: missing.len(),
                },
                None,
            ),
            Err(_) => (ProbeOutcome::NoOverlap, None),
        };

        debug!(budget_minutes, ?outcome, "Probed budget");

        (
            BudgetProbe {
                budget_minutes,
                outcome,
            },
            feasible,
        )
    }
}

/// Index of the winning candidate plus its geometry.
type Found = (usize, Region, IsochroneSet);

fn minimality(
    candidates: &[u32],
    index: usize,
    probes: &[BudgetProbe],
    strategy: SearchStrategy,
) -> Minimality {
    let outcome_at = |budget: u32| {
        probes
            .iter()
            .find(|p| p.budget_minutes == budget)
            .map(|p| p.outcome)
    };

    let lower = &candidates[..index];
    if lower
        .iter()
        .any(|&b| matches!(outcome_at(b), Some(ProbeOutcome::InsufficientData { .. })))
    {
        return Minimality::Unconfirmed;
    }

    let all_lower_failed = lower
        .iter()
        .all(|&b| outcome_at(b) == Some(ProbeOutcome::NoOverlap));
    if all_lower_failed {
        return Minimality::Exhaustive;
    }

    match (strategy, lower.last().and_then(|&b| outcome_at(b))) {
        (SearchStrategy::Bisect, Some(ProbeOutcome::NoOverlap)) => Minimality::AssumedMonotonic,
        _ => Minimality::Unconfirmed,
    }
}
