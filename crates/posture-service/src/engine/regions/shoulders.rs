use super::{RegionAnalyzer, ScoreCard};
use crate::engine::keywords::AnalysisInput;
use crate::engine::EngineError;
use common::posture::{Issue, IssueCode, Region, RegionScore, Severity};

const ROUNDED_TERMS: [&str; 2] = ["rounded", "hunched"];
const UNEVEN_TERMS: [&str; 2] = ["asymmetric", "uneven"];
const ELEVATED_TERMS: [&str; 2] = ["elevated", "raised"];

const ROUNDED_SHOULDERS: Issue = Issue::new(
    IssueCode::RoundedShoulders,
    Severity::Critical,
    "Rounded or hunched shoulders detected",
);
const UNEVEN_SHOULDERS: Issue = Issue::new(
    IssueCode::UnevenShoulders,
    Severity::Warning,
    "Uneven shoulder height detected",
);
const ELEVATED_SHOULDERS: Issue = Issue::new(
    IssueCode::ElevatedShoulders,
    Severity::Caution,
    "Raised shoulders - possible tension",
);
const SHOULDERS_UNCLEAR: Issue = Issue::new(
    IssueCode::ShouldersUnclear,
    Severity::Caution,
    "Shoulder position unclear",
);

pub struct ShouldersAnalyzer;

impl RegionAnalyzer for ShouldersAnalyzer {
    fn region(&self) -> Region {
        Region::Shoulders
    }

    fn name(&self) -> &'static str {
        "Shoulders"
    }

    fn analyze(&self, input: &AnalysisInput<'_>) -> Result<RegionScore, EngineError> {
        let keywords = &input.keywords;
        let mut card = ScoreCard::new();

        if keywords.contains("shoulder") {
            card.deduct_if(keywords.contains_any(&ROUNDED_TERMS), 45, ROUNDED_SHOULDERS);
            card.deduct_if(keywords.contains_any(&UNEVEN_TERMS), 30, UNEVEN_SHOULDERS);
            card.deduct_if(keywords.contains_any(&ELEVATED_TERMS), 25, ELEVATED_SHOULDERS);
        } else {
            card.deduct(20, SHOULDERS_UNCLEAR);
        }

        Ok(card.finish())
    }
}
