//! Head and neck alignment.
//!
//! Combines keyword rules with the first face's tilt and pan angles.

use super::{RegionAnalyzer, ScoreCard};
use crate::engine::keywords::AnalysisInput;
use crate::engine::EngineError;
use common::posture::{Issue, IssueCode, Region, RegionScore, Severity};

const FORWARD_TERMS: [&str; 2] = ["forward", "tilted"];
const NECK_TERMS: [&str; 2] = ["neck", "cervical"];
const STRAIN_TERMS: [&str; 2] = ["strain", "tension"];

/// Degrees of head tilt tolerated before deducting
pub const MAX_TILT_DEGREES: f32 = 5.0;
/// Degrees of head rotation tolerated before deducting
pub const MAX_PAN_DEGREES: f32 = 10.0;

const FORWARD_HEAD: Issue = Issue::new(
    IssueCode::ForwardHead,
    Severity::Critical,
    "Forward head posture detected - head is positioned ahead of the shoulders",
);
const HEAD_TILT: Issue = Issue::new(
    IssueCode::HeadTilt,
    Severity::Warning,
    "Head tilted to one side",
);
const HEAD_ROTATION: Issue = Issue::new(
    IssueCode::HeadRotation,
    Severity::Caution,
    "Head turned away from center",
);
const FACE_NOT_VISIBLE: Issue = Issue::new(
    IssueCode::FaceNotVisible,
    Severity::Caution,
    "Face not clearly visible - head position could not be verified",
);
const NECK_STRAIN: Issue = Issue::new(
    IssueCode::NeckStrain,
    Severity::Critical,
    "Neck strain or tension detected",
);

pub struct HeadNeckAnalyzer;

impl RegionAnalyzer for HeadNeckAnalyzer {
    fn region(&self) -> Region {
        Region::HeadNeck
    }

    fn name(&self) -> &'static str {
        "Head & Neck"
    }

    fn analyze(&self, input: &AnalysisInput<'_>) -> Result<RegionScore, EngineError> {
        let keywords = &input.keywords;
        let mut card = ScoreCard::new();

        card.deduct_if(keywords.contains_any(&FORWARD_TERMS), 40, FORWARD_HEAD);

        match input.primary_face() {
            Some(face) => {
                card.deduct_if(face.tilt_angle.abs() > MAX_TILT_DEGREES, 25, HEAD_TILT);
                card.deduct_if(face.pan_angle.abs() > MAX_PAN_DEGREES, 20, HEAD_ROTATION);
            }
            None => card.deduct(30, FACE_NOT_VISIBLE),
        }

        card.deduct_if(
            keywords.contains_any(&NECK_TERMS) && keywords.contains_any(&STRAIN_TERMS),
            35,
            NECK_STRAIN,
        );

        Ok(card.finish())
    }
}
