//! Posture analysis contracts.
//!
//! These types describe the input handed to the posture engine and the
//! verdict it returns. They are shared by the service, its HTTP API and any
//! client rendering results.

use crate::vision::{
    AnnotateImageResponse, AnnotateResponse, FaceAnnotation, LabelAnnotation,
    LocalizedObjectAnnotation,
};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// Annotation bag for a single photograph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAnnotations {
    /// Text labels in provider order
    pub labels: Vec<LabelAnnotation>,

    /// Localized objects in provider order
    pub objects: Vec<LocalizedObjectAnnotation>,

    /// Detected faces (empty when none)
    pub faces: Vec<FaceAnnotation>,

    /// Number of dominant colors, when image properties were returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_color_count: Option<usize>,
}

impl RawAnnotations {
    /// Take the first image entry of a batch response.
    ///
    /// An empty batch yields an empty bag.
    pub fn from_vision_response(response: AnnotateResponse) -> Self {
        response
            .responses
            .into_iter()
            .next()
            .map(Self::from)
            .unwrap_or_default()
    }
}

impl From<AnnotateImageResponse> for RawAnnotations {
    fn from(image: AnnotateImageResponse) -> Self {
        Self {
            labels: image.label_annotations,
            objects: image.localized_object_annotations,
            faces: image.face_annotations,
            dominant_color_count: image
                .image_properties_annotation
                .map(|p| p.dominant_color_count()),
        }
    }
}

/// Result of person detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionVerdict {
    pub detected: bool,

    /// Accumulated points expressed as a percentage. Not clamped: values
    /// below 0 or above 100 are kept as computed.
    pub confidence_percent: f64,
}

/// Scored body region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    HeadNeck,
    Shoulders,
    Spine,
    Hips,
    Overall,
}

impl Region {
    /// All regions in aggregation order
    pub const ALL: [Region; 5] = [
        Region::HeadNeck,
        Region::Shoulders,
        Region::Spine,
        Region::Hips,
        Region::Overall,
    ];

    pub fn index(self) -> usize {
        match self {
            Region::HeadNeck => 0,
            Region::Shoulders => 1,
            Region::Spine => 2,
            Region::Hips => 3,
            Region::Overall => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Region::HeadNeck => "head_neck",
            Region::Shoulders => "shoulders",
            Region::Spine => "spine",
            Region::Hips => "hips",
            Region::Overall => "overall",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of an issue or feedback line, used by clients for color coding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Caution,
    Info,
    Positive,
}

impl Severity {
    /// Emoji prefix used in the rendered text
    pub fn emoji(self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::Warning => "🟠",
            Severity::Caution => "🟡",
            Severity::Info => "💡",
            Severity::Positive => "✅",
        }
    }
}

/// Identifies the rule that produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    // head / neck
    ForwardHead,
    HeadTilt,
    HeadRotation,
    FaceNotVisible,
    NeckStrain,
    // shoulders
    RoundedShoulders,
    UnevenShoulders,
    ElevatedShoulders,
    ShouldersUnclear,
    // spine
    SpineBending,
    Slouching,
    SpinalCurvature,
    SpinalTwist,
    ForwardHeadSpine,
    SpineUnclear,
    SevereBending,
    // hips
    HipMisalignment,
    HipShift,
    PelvicTilt,
    HipInstability,
    LegLengthDiscrepancy,
    HipMobility,
    HipsUnclear,
    LowerLimbFlexion,
    // overall
    PoorPosture,
    BodyStrain,
    ForwardLean,
    BodyMisalignment,
    LowImageQuality,
}

impl IssueCode {
    /// Whether the issue describes a bending posture
    pub fn is_bending(self) -> bool {
        matches!(self, IssueCode::SpineBending | IssueCode::SevereBending)
    }
}

/// A single finding for a region.
///
/// Serialized with an extra `text` field carrying the emoji-prefixed string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Issue {
    pub code: IssueCode,
    pub severity: Severity,
    pub message: Cow<'static, str>,
}

impl Issue {
    pub const fn new(code: IssueCode, severity: Severity, message: &'static str) -> Self {
        Self {
            code,
            severity,
            message: Cow::Borrowed(message),
        }
    }

    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity.emoji(), self.message)
    }
}

impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Issue", 4)?;
        s.serialize_field("code", &self.code)?;
        s.serialize_field("severity", &self.severity)?;
        s.serialize_field("message", &self.message)?;
        s.serialize_field("text", &self.text())?;
        s.end()
    }
}

/// A feedback or recommendation line
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedbackItem {
    pub severity: Severity,
    pub message: Cow<'static, str>,
}

impl FeedbackItem {
    pub const fn new(severity: Severity, message: &'static str) -> Self {
        Self {
            severity,
            message: Cow::Borrowed(message),
        }
    }

    pub fn owned(severity: Severity, message: String) -> Self {
        Self {
            severity,
            message: Cow::Owned(message),
        }
    }

    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FeedbackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity.emoji(), self.message)
    }
}

impl Serialize for FeedbackItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("FeedbackItem", 3)?;
        s.serialize_field("severity", &self.severity)?;
        s.serialize_field("message", &self.message)?;
        s.serialize_field("text", &self.text())?;
        s.end()
    }
}

/// Score for one region, 0 to 100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionScore {
    pub score: u8,

    /// Issues in the order the rules were evaluated
    pub issues: Vec<Issue>,
}

impl RegionScore {
    /// Apply a total deduction to a starting score of 100, flooring at 0
    pub fn from_deductions(deductions: u32, issues: Vec<Issue>) -> Self {
        let score = 100u32.saturating_sub(deductions) as u8;
        Self { score, issues }
    }

    pub fn has_issue(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }
}

/// Per-region breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub head_neck: RegionScore,
    pub shoulders: RegionScore,
    pub spine: RegionScore,
    pub hips: RegionScore,
    pub overall: RegionScore,
}

impl DetailedAnalysis {
    pub fn get(&self, region: Region) -> &RegionScore {
        match region {
            Region::HeadNeck => &self.head_neck,
            Region::Shoulders => &self.shoulders,
            Region::Spine => &self.spine,
            Region::Hips => &self.hips,
            Region::Overall => &self.overall,
        }
    }

    /// Scores in aggregation order
    pub fn scores(&self) -> [u8; 5] {
        Region::ALL.map(|r| self.get(r).score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostureStatus {
    Poor,
    Fair,
    Good,
}

impl PostureStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostureStatus::Poor => "poor",
            PostureStatus::Fair => "fair",
            PostureStatus::Good => "good",
        }
    }
}

/// Complete engine output for one photograph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostureVerdict {
    /// Weighted aggregate, 0 to 100
    pub score: u8,

    pub status: PostureStatus,

    pub feedback: Vec<FeedbackItem>,

    pub recommendations: Vec<FeedbackItem>,

    /// Confidence in the verdict (0.0 to 1.0)
    pub confidence: f64,

    pub person_detected: bool,

    pub face_detected: bool,

    /// Raw detection result, absent when detection did not run to completion
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detection: Option<DetectionVerdict>,

    /// Present iff a person was detected
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub detailed_analysis: Option<DetailedAnalysis>,
}

impl PostureVerdict {
    /// Feedback lines rendered with their emoji prefix
    pub fn feedback_lines(&self) -> Vec<String> {
        self.feedback.iter().map(FeedbackItem::text).collect()
    }
}

/// Request to analyze a base64 encoded image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeImageRequest {
    /// Image bytes, base64 encoded (standard alphabet, optional data-URL prefix)
    pub image: String,
}
