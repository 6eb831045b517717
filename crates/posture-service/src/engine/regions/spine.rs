//! Spinal alignment.
//!
//! NOTE: the severe-bending rule runs regardless of whether the spine was
//! visible and overlaps the bending family checked inside the visible branch,
//! so a single "bent" keyword is deducted twice. Scores downstream depend on
//! this; keep both rules.

use super::{RegionAnalyzer, ScoreCard};
use crate::engine::keywords::AnalysisInput;
use crate::engine::EngineError;
use common::posture::{Issue, IssueCode, Region, RegionScore, Severity};

const SPINE_TERMS: [&str; 4] = ["spine", "back", "torso", "body"];
pub const BENDING_TERMS: [&str; 10] = [
    "bent", "bending", "stooped", "stooping", "forward", "flexed", "curved", "hunched",
    "crouched", "leaning",
];
const SLOUCH_TERMS: [&str; 2] = ["slouched", "slumped"];
const CURVATURE_TERMS: [&str; 2] = ["curved", "kyphosis"];
const TWIST_TERMS: [&str; 2] = ["twisted", "rotated"];
const SEVERE_BENDING_TERMS: [&str; 4] = ["bent", "leaning", "forward", "stooped"];

const SPINE_BENDING: Issue = Issue::new(
    IssueCode::SpineBending,
    Severity::Critical,
    "Forward bending of the spine detected",
);
const SLOUCHING: Issue = Issue::new(
    IssueCode::Slouching,
    Severity::Critical,
    "Slouching posture detected",
);
const SPINAL_CURVATURE: Issue = Issue::new(
    IssueCode::SpinalCurvature,
    Severity::Critical,
    "Excessive spinal curvature detected",
);
const SPINAL_TWIST: Issue = Issue::new(
    IssueCode::SpinalTwist,
    Severity::Warning,
    "Twisted or rotated spine detected",
);
const FORWARD_HEAD_SPINE: Issue = Issue::new(
    IssueCode::ForwardHeadSpine,
    Severity::Warning,
    "Forward head position is pulling the upper spine out of line",
);
const SPINE_UNCLEAR: Issue = Issue::new(
    IssueCode::SpineUnclear,
    Severity::Caution,
    "Spine alignment unclear from image",
);
const SEVERE_BENDING: Issue = Issue::new(
    IssueCode::SevereBending,
    Severity::Critical,
    "Severe bending posture - heavy load on the lower back",
);

pub struct SpineAnalyzer;

impl RegionAnalyzer for SpineAnalyzer {
    fn region(&self) -> Region {
        Region::Spine
    }

    fn name(&self) -> &'static str {
        "Spine"
    }

    fn analyze(&self, input: &AnalysisInput<'_>) -> Result<RegionScore, EngineError> {
        let keywords = &input.keywords;
        let mut card = ScoreCard::new();

        if keywords.contains_any(&SPINE_TERMS) {
            card.deduct_if(keywords.contains_any(&BENDING_TERMS), 80, SPINE_BENDING);
            card.deduct_if(keywords.contains_any(&SLOUCH_TERMS), 60, SLOUCHING);
            card.deduct_if(keywords.contains_any(&CURVATURE_TERMS), 70, SPINAL_CURVATURE);
            card.deduct_if(keywords.contains_any(&TWIST_TERMS), 50, SPINAL_TWIST);
            card.deduct_if(
                keywords.contains("forward") && keywords.contains("head"),
                40,
                FORWARD_HEAD_SPINE,
            );
        } else {
            card.deduct(30, SPINE_UNCLEAR);
        }

        card.deduct_if(keywords.contains_any(&SEVERE_BENDING_TERMS), 70, SEVERE_BENDING);

        Ok(card.finish())
    }
}
