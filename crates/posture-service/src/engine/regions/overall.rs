use super::spine::BENDING_TERMS;
use super::{RegionAnalyzer, ScoreCard};
use crate::engine::keywords::AnalysisInput;
use crate::engine::EngineError;
use common::posture::{Issue, IssueCode, Region, RegionScore, Severity};

const POOR_POSTURE_TERMS: [&str; 2] = ["poor", "bad"];
const STRAIN_TERMS: [&str; 3] = ["strain", "stress", "tension"];
const MISALIGNMENT_TERMS: [&str; 6] = [
    "misaligned",
    "asymmetric",
    "uneven",
    "crooked",
    "tilted",
    "twisted",
];

/// Fewer dominant colors than this suggests a washed-out or tiny image
pub const MIN_DOMINANT_COLORS: usize = 3;

const POOR_POSTURE: Issue = Issue::new(
    IssueCode::PoorPosture,
    Severity::Critical,
    "Overall poor posture pattern detected",
);
const BODY_STRAIN: Issue = Issue::new(
    IssueCode::BodyStrain,
    Severity::Warning,
    "Signs of physical strain or tension",
);
const FORWARD_LEAN: Issue = Issue::new(
    IssueCode::ForwardLean,
    Severity::Critical,
    "Body is leaning forward",
);
const BODY_MISALIGNMENT: Issue = Issue::new(
    IssueCode::BodyMisalignment,
    Severity::Warning,
    "General body misalignment detected",
);
const LOW_IMAGE_QUALITY: Issue = Issue::new(
    IssueCode::LowImageQuality,
    Severity::Caution,
    "Low image quality may reduce accuracy",
);

pub struct OverallAnalyzer;

impl RegionAnalyzer for OverallAnalyzer {
    fn region(&self) -> Region {
        Region::Overall
    }

    fn name(&self) -> &'static str {
        "Overall"
    }

    fn analyze(&self, input: &AnalysisInput<'_>) -> Result<RegionScore, EngineError> {
        let keywords = &input.keywords;
        let mut card = ScoreCard::new();

        card.deduct_if(
            keywords.contains_any(&POOR_POSTURE_TERMS) || keywords.contains_any(&BENDING_TERMS),
            75,
            POOR_POSTURE,
        );
        card.deduct_if(keywords.contains_any(&STRAIN_TERMS), 40, BODY_STRAIN);
        card.deduct_if(keywords.contains("forward"), 60, FORWARD_LEAN);
        card.deduct_if(keywords.contains_any(&MISALIGNMENT_TERMS), 50, BODY_MISALIGNMENT);
        card.deduct_if(input.colors_below(MIN_DOMINANT_COLORS), 20, LOW_IMAGE_QUALITY);

        Ok(card.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::regions::test_support::input;

    #[test]
    fn test_clean_image() {
        let mut analysis = input(&["person", "standing"]);
        analysis.dominant_color_count = Some(8);
        assert_eq!(OverallAnalyzer.analyze(&analysis).unwrap().score, 100);
    }

    #[test]
    fn test_low_color_count() {
        let mut analysis = input(&["person"]);
        analysis.dominant_color_count = Some(2);

        let score = OverallAnalyzer.analyze(&analysis).unwrap();
        assert_eq!(score.score, 80);
        assert!(score.has_issue(IssueCode::LowImageQuality));
    }

    #[test]
    fn test_color_threshold_exclusive() {
        let mut analysis = input(&[]);
        analysis.dominant_color_count = Some(3);
        assert_eq!(OverallAnalyzer.analyze(&analysis).unwrap().score, 100);
    }

    #[test]
    fn test_forward_hits_poor_posture_and_lean() {
        let score = OverallAnalyzer.analyze(&input(&["forward"])).unwrap();
        assert_eq!(score.score, 0);
        let codes: Vec<_> = score.issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![IssueCode::PoorPosture, IssueCode::ForwardLean]);
    }

    #[test]
    fn test_bending_family_is_poor_posture() {
        for keyword in BENDING_TERMS.iter().filter(|k| **k != "forward") {
            let score = OverallAnalyzer.analyze(&input(&[*keyword])).unwrap();
            assert_eq!(score.score, 25, "{keyword}");
            assert!(score.has_issue(IssueCode::PoorPosture), "{keyword}");
        }
    }

    #[test]
    fn test_general_poor_keywords() {
        let score = OverallAnalyzer.analyze(&input(&["bad posture"])).unwrap();
        assert_eq!(score.score, 25);
    }

    #[test]
    fn test_strain_and_misalignment() {
        let score = OverallAnalyzer
            .analyze(&input(&["muscle tension", "crooked"]))
            .unwrap();
        assert_eq!(score.score, 10);
        let codes: Vec<_> = score.issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![IssueCode::BodyStrain, IssueCode::BodyMisalignment]);
    }

    #[test]
    fn test_everything_clamps() {
        let mut analysis = input(&["slouching forward", "stress", "uneven"]);
        analysis.dominant_color_count = Some(1);

        let score = OverallAnalyzer.analyze(&analysis).unwrap();
        assert_eq!(score.score, 0);
        assert_eq!(score.issues.len(), 5);
    }
}
