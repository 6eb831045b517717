use super::{RegionAnalyzer, ScoreCard};
use crate::engine::keywords::AnalysisInput;
use crate::engine::EngineError;
use common::posture::{Issue, IssueCode, Region, RegionScore, Severity};

/// Hip and lower-body vocabulary that makes the region assessable
pub const HIP_TERMS: [&str; 20] = [
    "hip",
    "pelvis",
    "pelvic",
    "waist",
    "buttock",
    "glute",
    "thigh",
    "leg",
    "lower body",
    "groin",
    "sacrum",
    "lumbar",
    "hamstring",
    "quadricep",
    "lap",
    "trunk",
    "squat",
    "lunge",
    "stance",
    "standing",
];

const MISALIGNMENT_TERMS: [&str; 5] = ["tilted", "rotated", "twisted", "asymmetric", "uneven"];
const SHIFT_TERMS: [&str; 4] = ["shifted", "offset", "displaced", "misaligned"];
const PELVIC_TILT_TERMS: [&str; 12] = [
    "anterior",
    "posterior",
    "forward",
    "backward",
    "anterior tilt",
    "posterior tilt",
    "forward tilt",
    "backward tilt",
    "anteriorly tilted",
    "posteriorly tilted",
    "tilted forward",
    "tilted backward",
];
const INSTABILITY_TERMS: [&str; 4] = ["unstable", "wobbly", "weak", "collapsed"];
const LEG_LENGTH_TERMS: [&str; 4] = ["uneven", "different", "asymmetric", "one side"];
const MOBILITY_TERMS: [&str; 4] = ["stiff", "rigid", "tight", "restricted"];
const LOWER_LIMB_TERMS: [&str; 3] = ["knee", "ankle", "foot"];
const FLEXION_TERMS: [&str; 3] = ["bent", "flexed", "collapsed"];

const HIP_MISALIGNMENT: Issue = Issue::new(
    IssueCode::HipMisalignment,
    Severity::Critical,
    "Hip misalignment detected",
);
const HIP_SHIFT: Issue = Issue::new(
    IssueCode::HipShift,
    Severity::Warning,
    "Hips shifted off center",
);
const PELVIC_TILT: Issue = Issue::new(
    IssueCode::PelvicTilt,
    Severity::Critical,
    "Pelvic tilt detected",
);
const HIP_INSTABILITY: Issue = Issue::new(
    IssueCode::HipInstability,
    Severity::Warning,
    "Signs of hip instability",
);
const LEG_LENGTH: Issue = Issue::new(
    IssueCode::LegLengthDiscrepancy,
    Severity::Caution,
    "Possible leg length difference",
);
const HIP_MOBILITY: Issue = Issue::new(
    IssueCode::HipMobility,
    Severity::Caution,
    "Restricted hip mobility",
);
const HIPS_UNCLEAR: Issue = Issue::new(
    IssueCode::HipsUnclear,
    Severity::Caution,
    "Hip position unclear from image",
);
const LOWER_LIMB_FLEXION: Issue = Issue::new(
    IssueCode::LowerLimbFlexion,
    Severity::Warning,
    "Bent or collapsed knees and ankles are affecting hip alignment",
);

pub struct HipsAnalyzer;

impl RegionAnalyzer for HipsAnalyzer {
    fn region(&self) -> Region {
        Region::Hips
    }

    fn name(&self) -> &'static str {
        "Hips"
    }

    fn analyze(&self, input: &AnalysisInput<'_>) -> Result<RegionScore, EngineError> {
        let keywords = &input.keywords;
        let mut card = ScoreCard::new();

        if keywords.contains_any(&HIP_TERMS) {
            card.deduct_if(keywords.contains_any(&MISALIGNMENT_TERMS), 45, HIP_MISALIGNMENT);
            card.deduct_if(keywords.contains_any(&SHIFT_TERMS), 40, HIP_SHIFT);
            card.deduct_if(keywords.contains_any(&PELVIC_TILT_TERMS), 50, PELVIC_TILT);
            card.deduct_if(keywords.contains_any(&INSTABILITY_TERMS), 35, HIP_INSTABILITY);
            card.deduct_if(keywords.contains_any(&LEG_LENGTH_TERMS), 30, LEG_LENGTH);
            card.deduct_if(keywords.contains_any(&MOBILITY_TERMS), 25, HIP_MOBILITY);
        } else {
            card.deduct(35, HIPS_UNCLEAR);
        }

        card.deduct_if(
            keywords.contains_any(&LOWER_LIMB_TERMS) && keywords.contains_any(&FLEXION_TERMS),
            30,
            LOWER_LIMB_FLEXION,
        );

        Ok(card.finish())
    }
}
