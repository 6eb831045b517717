pub mod head_neck;
pub mod hips;
pub mod overall;
pub mod shoulders;
pub mod spine;

use super::keywords::AnalysisInput;
use super::EngineError;
use common::posture::{Issue, Region, RegionScore};
use std::sync::Arc;

pub use head_neck::HeadNeckAnalyzer;
pub use hips::HipsAnalyzer;
pub use overall::OverallAnalyzer;
pub use shoulders::ShouldersAnalyzer;
pub use spine::SpineAnalyzer;

/// Scores one body region from normalized annotations.
///
/// Implementations start at 100 and only deduct; rules are independent and
/// evaluated in a fixed order so issue ordering is stable.
pub trait RegionAnalyzer: Send + Sync {
    /// Region this analyzer scores
    fn region(&self) -> Region;

    /// Human-readable analyzer name
    fn name(&self) -> &'static str;

    fn analyze(&self, input: &AnalysisInput<'_>) -> Result<RegionScore, EngineError>;
}

/// Accumulates deductions and issues for one region
#[derive(Debug, Default)]
pub(crate) struct ScoreCard {
    deductions: u32,
    issues: Vec<Issue>,
}

impl ScoreCard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn deduct(&mut self, penalty: u32, issue: Issue) {
        self.deductions += penalty;
        self.issues.push(issue);
    }

    /// Deduct only when `condition` holds
    pub(crate) fn deduct_if(&mut self, condition: bool, penalty: u32, issue: Issue) {
        if condition {
            self.deduct(penalty, issue);
        }
    }

    pub(crate) fn finish(self) -> RegionScore {
        RegionScore::from_deductions(self.deductions, self.issues)
    }
}

/// The five built-in analyzers, indexed by [`Region::index`]
pub fn builtin_analyzers() -> [Arc<dyn RegionAnalyzer>; 5] {
    [
        Arc::new(HeadNeckAnalyzer),
        Arc::new(ShouldersAnalyzer),
        Arc::new(SpineAnalyzer),
        Arc::new(HipsAnalyzer),
        Arc::new(OverallAnalyzer),
    ]
}


#[cfg(test)]
mod tests {
    use super::*;
    use common::posture::{IssueCode, Severity};

    #[test]
    fn test_builtin_order_matches_region_index() {
        for (idx, analyzer) in builtin_analyzers().iter().enumerate() {
            assert_eq!(analyzer.region().index(), idx);
        }
    }

    #[test]
    fn test_scorecard_clamps_at_zero() {
        let mut card = ScoreCard::new();
        let issue = Issue::new(IssueCode::PoorPosture, Severity::Critical, "bad");
        card.deduct(75, issue.clone());
        card.deduct(60, issue.clone());
        card.deduct_if(false, 10, issue);

        let score = card.finish();
        assert_eq!(score.score, 0);
        assert_eq!(score.issues.len(), 2);
    }
}
