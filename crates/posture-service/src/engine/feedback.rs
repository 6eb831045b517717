//! Feedback and recommendation templates.
//!
//! Feedback is chosen by aggregate score bracket; recommendations combine an
//! urgency block with per-region blocks for every region scoring below 70.

use common::posture::{DetailedAnalysis, FeedbackItem, Region, Severity};

/// Regions scoring below this receive targeted recommendations
pub const REGION_ATTENTION_THRESHOLD: u8 = 70;

static CRITICAL_FEEDBACK: [FeedbackItem; 4] = [
    FeedbackItem::new(Severity::Critical, "Very poor posture detected - immediate attention needed"),
    FeedbackItem::new(Severity::Critical, "Multiple serious alignment problems identified"),
    FeedbackItem::new(Severity::Warning, "Holding this posture may lead to pain or injury over time"),
    FeedbackItem::new(Severity::Info, "Consider an assessment with a physiotherapist"),
];

static POOR_FEEDBACK: [FeedbackItem; 3] = [
    FeedbackItem::new(Severity::Warning, "Poor posture detected in several areas"),
    FeedbackItem::new(Severity::Warning, "Significant deviation from healthy alignment"),
    FeedbackItem::new(Severity::Info, "Regular corrective exercises are recommended"),
];

static FAIR_FEEDBACK: [FeedbackItem; 3] = [
    FeedbackItem::new(Severity::Caution, "Fair posture with room for improvement"),
    FeedbackItem::new(Severity::Caution, "Some alignment issues detected"),
    FeedbackItem::new(Severity::Info, "Small daily adjustments can make a noticeable difference"),
];

static GOOD_FEEDBACK: [FeedbackItem; 2] = [
    FeedbackItem::new(Severity::Positive, "Good posture overall"),
    FeedbackItem::new(Severity::Caution, "Minor alignment issues detected"),
];

static EXCELLENT_FEEDBACK: [FeedbackItem; 3] = [
    FeedbackItem::new(Severity::Positive, "Excellent posture!"),
    FeedbackItem::new(Severity::Positive, "Your body alignment looks well balanced"),
    FeedbackItem::new(Severity::Info, "Keep up your current habits"),
];

static BENDING_FEEDBACK: [FeedbackItem; 4] = [
    FeedbackItem::new(Severity::Critical, "Bending posture detected - your spine is under significant load"),
    FeedbackItem::new(Severity::Warning, "Prolonged bending strains the lower back and neck"),
    FeedbackItem::new(Severity::Info, "Lift your chest and stack your head over your hips"),
    FeedbackItem::new(Severity::Info, "Hinge at the hips instead of rounding your back when reaching forward"),
];

static URGENT_RECOMMENDATIONS: [FeedbackItem; 3] = [
    FeedbackItem::new(Severity::Critical, "Stop and reset your posture now"),
    FeedbackItem::new(Severity::Critical, "Seek guidance from a physiotherapist or posture specialist"),
    FeedbackItem::new(Severity::Warning, "Take a posture break every 15-20 minutes"),
];

static MODERATE_RECOMMENDATIONS: [FeedbackItem; 3] = [
    FeedbackItem::new(Severity::Warning, "Take a posture break every 30 minutes"),
    FeedbackItem::new(Severity::Info, "Stretch your neck, shoulders and back daily"),
    FeedbackItem::new(Severity::Info, "Review the ergonomics of your workstation"),
];

static HEAD_NECK_RECOMMENDATIONS: [FeedbackItem; 2] = [
    FeedbackItem::new(Severity::Info, "Practice chin tucks: 10 repetitions, 3 times a day"),
    FeedbackItem::new(Severity::Info, "Raise your screen to eye level to keep your head neutral"),
];

static SHOULDER_RECOMMENDATIONS: [FeedbackItem; 2] = [
    FeedbackItem::new(Severity::Info, "Squeeze your shoulder blades together: hold 5 seconds, 10 repetitions"),
    FeedbackItem::new(Severity::Info, "Stretch your chest in a doorway for 30 seconds"),
];

static SPINE_RECOMMENDATIONS: [FeedbackItem; 2] = [
    FeedbackItem::new(Severity::Info, "Do cat-cow stretches to restore spinal mobility"),
    FeedbackItem::new(Severity::Info, "Strengthen your core with planks and bird-dogs"),
];

static HIP_RECOMMENDATIONS: [FeedbackItem; 2] = [
    FeedbackItem::new(Severity::Info, "Stretch your hip flexors for 30 seconds on each side"),
    FeedbackItem::new(Severity::Info, "Do glute bridges to stabilize your pelvis"),
];

static NO_RECOMMENDATIONS: [FeedbackItem; 0] = [];

/// Score bracket used to select feedback templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackBracket {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl FeedbackBracket {
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=24 => Self::Critical,
            25..=49 => Self::Poor,
            50..=69 => Self::Fair,
            70..=84 => Self::Good,
            _ => Self::Excellent,
        }
    }

    fn templates(self) -> &'static [FeedbackItem] {
        match self {
            Self::Critical => &CRITICAL_FEEDBACK,
            Self::Poor => &POOR_FEEDBACK,
            Self::Fair => &FAIR_FEEDBACK,
            Self::Good => &GOOD_FEEDBACK,
            Self::Excellent => &EXCELLENT_FEEDBACK,
        }
    }
}

/// Ordered feedback for a scored analysis
pub fn compose_feedback(score: u8, analysis: &DetailedAnalysis) -> Vec<FeedbackItem> {
    let mut feedback = FeedbackBracket::for_score(score).templates().to_vec();

    if analysis.spine.issues.iter().any(|i| i.code.is_bending()) {
        feedback.extend_from_slice(&BENDING_FEEDBACK);
    }

    feedback
}

/// Ordered recommendations for a scored analysis
pub fn compose_recommendations(score: u8, analysis: &DetailedAnalysis) -> Vec<FeedbackItem> {
    let mut recommendations = Vec::new();

    if score < 30 {
        recommendations.extend_from_slice(&URGENT_RECOMMENDATIONS);
    } else if score < 60 {
        recommendations.extend_from_slice(&MODERATE_RECOMMENDATIONS);
    }

    for region in [Region::HeadNeck, Region::Shoulders, Region::Spine, Region::Hips] {
        if analysis.get(region).score < REGION_ATTENTION_THRESHOLD {
            recommendations.extend_from_slice(region_recommendations(region));
        }
    }

    recommendations
}

fn region_recommendations(region: Region) -> &'static [FeedbackItem] {
    match region {
        Region::HeadNeck => &HEAD_NECK_RECOMMENDATIONS,
        Region::Shoulders => &SHOULDER_RECOMMENDATIONS,
        Region::Spine => &SPINE_RECOMMENDATIONS,
        Region::Hips => &HIP_RECOMMENDATIONS,
        Region::Overall => &NO_RECOMMENDATIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::posture::{Issue, IssueCode, RegionScore};

    fn region(score: u8) -> RegionScore {
        RegionScore {
            score,
            issues: vec![],
        }
    }

    fn analysis(scores: [u8; 5]) -> DetailedAnalysis {
        DetailedAnalysis {
            head_neck: region(scores[0]),
            shoulders: region(scores[1]),
            spine: region(scores[2]),
            hips: region(scores[3]),
            overall: region(scores[4]),
        }
    }

    #[test]
    fn test_brackets() {
        assert_eq!(FeedbackBracket::for_score(0), FeedbackBracket::Critical);
        assert_eq!(FeedbackBracket::for_score(24), FeedbackBracket::Critical);
        assert_eq!(FeedbackBracket::for_score(25), FeedbackBracket::Poor);
        assert_eq!(FeedbackBracket::for_score(49), FeedbackBracket::Poor);
        assert_eq!(FeedbackBracket::for_score(50), FeedbackBracket::Fair);
        assert_eq!(FeedbackBracket::for_score(69), FeedbackBracket::Fair);
        assert_eq!(FeedbackBracket::for_score(70), FeedbackBracket::Good);
        assert_eq!(FeedbackBracket::for_score(84), FeedbackBracket::Good);
        assert_eq!(FeedbackBracket::for_score(85), FeedbackBracket::Excellent);
    }

    #[test]
    fn test_excellent_feedback_without_recommendations() {
        let a = analysis([100; 5]);
        let feedback = compose_feedback(100, &a);
        assert_eq!(feedback.len(), 3);
        assert_eq!(feedback[0].text(), "✅ Excellent posture!");
        assert!(compose_recommendations(100, &a).is_empty());
    }

    #[test]
    fn test_bending_lines_appended() {
        let mut a = analysis([40; 5]);
        a.spine.issues.push(Issue::new(
            IssueCode::SevereBending,
            Severity::Critical,
            "bent",
        ));

        let feedback = compose_feedback(40, &a);
        assert_eq!(feedback.len(), POOR_FEEDBACK.len() + 4);
        assert_eq!(feedback[3], BENDING_FEEDBACK[0]);
    }

    #[test]
    fn test_non_bending_spine_issue() {
        let mut a = analysis([90; 5]);
        a.spine.issues.push(Issue::new(
            IssueCode::SpineUnclear,
            Severity::Caution,
            "unclear",
        ));

        assert_eq!(compose_feedback(90, &a).len(), EXCELLENT_FEEDBACK.len());
    }

    #[test]
    fn test_urgent_recommendations_with_regions() {
        let a = analysis([0, 100, 0, 69, 0]);
        let recs = compose_recommendations(20, &a);

        let mut expected = URGENT_RECOMMENDATIONS.to_vec();
        expected.extend_from_slice(&HEAD_NECK_RECOMMENDATIONS);
        expected.extend_from_slice(&SPINE_RECOMMENDATIONS);
        expected.extend_from_slice(&HIP_RECOMMENDATIONS);
        assert_eq!(recs, expected);
    }

    #[test]
    fn test_moderate_block_is_exclusive_with_urgent() {
        let a = analysis([100; 5]);
        assert_eq!(compose_recommendations(30, &a), MODERATE_RECOMMENDATIONS.to_vec());
        assert_eq!(compose_recommendations(59, &a), MODERATE_RECOMMENDATIONS.to_vec());
        assert!(compose_recommendations(60, &a).is_empty());
    }

    #[test]
    fn test_overall_region_has_no_block() {
        let a = analysis([100, 100, 100, 100, 0]);
        assert!(compose_recommendations(85, &a).is_empty());
    }
}
