//! Tuning parameters for meeting-point search.

use crate::domain::DEFAULT_POI_CATEGORIES;

use super::MAX_BUDGET_MINUTES;

/// How `BudgetSearch` walks the candidate budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Binary search. Assumes overlap is monotonic in budget; O(log n) probes.
    #[default]
    Bisect,

    /// Ascending scan, stopping at the first feasible budget. Exact even for
    /// providers whose reachable area is not monotonic in budget.
    Linear,
}

impl std::str::FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bisect" => Ok(SearchStrategy::Bisect),
            "linear" => Ok(SearchStrategy::Linear),
            other => Err(format!("unknown search strategy: {other}")),
        }
    }
}

/// Configuration parameters for meeting-point search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Candidate travel budgets in minutes, strictly ascending.
    candidate_budgets: Vec<u32>,

    /// Budget used when a request does not name one.
    pub default_budget_minutes: u32,

    /// Maximum number of venues to return.
    pub max_results: usize,

    /// Budget search strategy.
    pub strategy: SearchStrategy,

    /// Category ids searched when a request does not name any.
    pub default_categories: Vec<String>,
}

impl SearchConfig {
    /// Create a configuration with the given candidate budgets.
    ///
    /// Candidates are sorted and deduplicated; zero and anything above the
    /// supported maximum are dropped.
    pub fn new(candidate_budgets: Vec<u32>, max_results: usize) -> Self {
        Self {
            max_results,
            ..Self::default()
        }
        .with_candidate_budgets(candidate_budgets)
    }

    pub fn with_candidate_budgets(mut self, mut budgets: Vec<u32>) -> Self {
        budgets.retain(|b| (1..=MAX_BUDGET_MINUTES).contains(b));
        budgets.sort_unstable();
        budgets.dedup();
        self.candidate_budgets = budgets;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_default_budget(mut self, minutes: u32) -> Self {
        self.default_budget_minutes = minutes;
        self
    }

    /// Candidate travel budgets in minutes, strictly ascending.
    pub fn candidate_budgets(&self) -> &[u32] {
        &self.candidate_budgets
    }

    /// Largest candidate budget, if any.
    pub fn max_candidate(&self) -> Option<u32> {
        self.candidate_budgets.last().copied()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            candidate_budgets: (1..=12).map(|i| i * 5).collect(), // 5, 10, ..., 60
            default_budget_minutes: 30,
            max_results: 50,
            strategy: SearchStrategy::Bisect,
            default_categories: DEFAULT_POI_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();

        assert_eq!(
            config.candidate_budgets(),
            [5, 10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60]
        );
        assert_eq!(config.default_budget_minutes, 30);
        assert_eq!(config.max_results, 50);
        assert_eq!(config.strategy, SearchStrategy::Bisect);
        assert_eq!(config.default_categories, ["coffee", "meal", "beer"]);
        assert_eq!(config.max_candidate(), Some(60));
    }

    #[test]
    fn candidates_are_normalised() {
        let config = SearchConfig::new(vec![30, 0, 10, 10, 90, 20], 5);
        assert_eq!(config.candidate_budgets(), [10, 20, 30]);
        assert_eq!(config.max_results, 5);

        let config = SearchConfig::default().with_candidate_budgets(vec![60, 5, 61, 5]);
        assert_eq!(config.candidate_budgets(), [5, 60]);
        assert_eq!(config.max_candidate(), Some(60));
    }

    #[test]
    fn builder_methods() {
        let config = SearchConfig::default()
            .with_strategy(SearchStrategy::Linear)
            .with_max_results(7)
            .with_default_budget(15);

        assert_eq!(config.strategy, SearchStrategy::Linear);
        assert_eq!(config.max_results, 7);
        assert_eq!(config.default_budget_minutes, 15);
    }

    #[test]
    fn strategy_from_str() {
        assert_eq!("Linear".parse::<SearchStrategy>(), Ok(SearchStrategy::Linear));
        assert_eq!("bisect".parse::<SearchStrategy>(), Ok(SearchStrategy::Bisect));
        assert!("random".parse::<SearchStrategy>().is_err());
    }
}
