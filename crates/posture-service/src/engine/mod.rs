//! Posture scoring engine.
//!
//! A pure, deterministic function from a vision annotation bag to a
//! [`PostureVerdict`]. The engine never fails across its public boundary:
//! missing people produce a "no person" verdict and analyzer faults (errors
//! or panics) produce a fixed degraded verdict.

pub mod aggregate;
pub mod detector;
pub mod feedback;
pub mod keywords;
pub mod regions;

use aggregate::{classify, ScoreWeights};
use common::posture::{
    DetailedAnalysis, DetectionVerdict, FeedbackItem, PostureStatus, PostureVerdict,
    RawAnnotations, Region, RegionScore, Severity,
};
use keywords::AnalysisInput;
use regions::{builtin_analyzers, RegionAnalyzer};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Score reported when analysis had to be abandoned
pub const DEGRADED_SCORE: u8 = 25;
/// Confidence reported when analysis had to be abandoned
pub const DEGRADED_CONFIDENCE: f64 = 0.1;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid score weights: {0}")]
    InvalidWeights(String),

    #[error("aggregate score {0} is outside 0..=100")]
    ScoreOutOfRange(f64),

    #[error("{region} analyzer failed: {message}")]
    Analyzer { region: Region, message: String },

    #[error("{region} analyzer panicked: {message}")]
    AnalyzerPanic { region: Region, message: String },
}

/// Orchestration stages of a single analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    NotStarted,
    ExtractingAnnotations,
    DetectingPerson,
    NoPersonTerminal,
    AnalyzingRegions,
    Aggregating,
    ComposingFeedback,
    Done,
    DegradedTerminal,
}

impl AnalysisStage {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisStage::NotStarted => "not_started",
            AnalysisStage::ExtractingAnnotations => "extracting_annotations",
            AnalysisStage::DetectingPerson => "detecting_person",
            AnalysisStage::NoPersonTerminal => "no_person",
            AnalysisStage::AnalyzingRegions => "analyzing_regions",
            AnalysisStage::Aggregating => "aggregating",
            AnalysisStage::ComposingFeedback => "composing_feedback",
            AnalysisStage::Done => "done",
            AnalysisStage::DegradedTerminal => "degraded",
        }
    }

    /// Whether the analysis ends in this stage
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AnalysisStage::Done | AnalysisStage::NoPersonTerminal | AnalysisStage::DegradedTerminal
        )
    }
}

/// Verdict plus the terminal stage that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub verdict: PostureVerdict,
    pub stage: AnalysisStage,
}

/// Immutable scoring engine, cheap to clone and share between requests
#[derive(Clone)]
pub struct PostureEngine {
    weights: ScoreWeights,
    analyzers: [Arc<dyn RegionAnalyzer>; 5],
}

impl Default for PostureEngine {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            analyzers: builtin_analyzers(),
        }
    }
}

impl PostureEngine {
    pub fn new(weights: ScoreWeights) -> Result<Self, EngineError> {
        weights.validate()?;
        Ok(Self {
            weights,
            analyzers: builtin_analyzers(),
        })
    }

    /// Replace the analyzer for the region it reports
    pub fn with_analyzer(mut self, analyzer: Arc<dyn RegionAnalyzer>) -> Self {
        let idx = analyzer.region().index();
        self.analyzers[idx] = analyzer;
        self
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Score one annotation bag
    pub fn analyze(&self, raw: &RawAnnotations) -> PostureVerdict {
        self.run(raw).verdict
    }

    /// Score one annotation bag and report the terminal stage
    pub fn run(&self, raw: &RawAnnotations) -> AnalysisOutcome {
        let mut stage = AnalysisStage::NotStarted;
        let mut advance = |next: AnalysisStage| {
            debug!(
                from = stage.as_str(),
                to = next.as_str(),
                terminal = next.is_terminal(),
                "posture analysis stage"
            );
            stage = next;
        };

        advance(AnalysisStage::ExtractingAnnotations);
        let input = AnalysisInput::extract(raw);
        let face_detected = !raw.faces.is_empty();

        advance(AnalysisStage::DetectingPerson);
        let detection = detector::detect_person(raw);
        if !detection.detected {
            advance(AnalysisStage::NoPersonTerminal);
            return AnalysisOutcome {
                verdict: no_person_verdict(detection, face_detected),
                stage: AnalysisStage::NoPersonTerminal,
            };
        }

        advance(AnalysisStage::AnalyzingRegions);
        let scored = self.score_regions(&input).and_then(|analysis| {
            advance(AnalysisStage::Aggregating);
            let score = self.weights.aggregate_analysis(&analysis)?;
            Ok((analysis, score))
        });

        let (analysis, score) = match scored {
            Ok(scored) => scored,
            Err(e) => {
                warn!(error = %e, "posture analysis degraded");
                advance(AnalysisStage::DegradedTerminal);
                return AnalysisOutcome {
                    verdict: degraded_verdict(),
                    stage: AnalysisStage::DegradedTerminal,
                };
            }
        };

        advance(AnalysisStage::ComposingFeedback);
        let verdict = PostureVerdict {
            score,
            status: classify(score),
            feedback: feedback::compose_feedback(score, &analysis),
            recommendations: feedback::compose_recommendations(score, &analysis),
            confidence: detection_confidence(&detection),
            person_detected: true,
            face_detected,
            detection: Some(detection),
            detailed_analysis: Some(analysis),
        };

        advance(AnalysisStage::Done);
        AnalysisOutcome {
            verdict,
            stage: AnalysisStage::Done,
        }
    }

    fn score_regions(&self, input: &AnalysisInput<'_>) -> Result<DetailedAnalysis, EngineError> {
        let [head_neck, shoulders, spine, hips, overall] =
            Region::ALL.map(|region| self.score_region(region, input));

        Ok(DetailedAnalysis {
            head_neck: head_neck?,
            shoulders: shoulders?,
            spine: spine?,
            hips: hips?,
            overall: overall?,
        })
    }

    fn score_region(
        &self,
        region: Region,
        input: &AnalysisInput<'_>,
    ) -> Result<RegionScore, EngineError> {
        let analyzer = &self.analyzers[region.index()];

        let result = catch_unwind(AssertUnwindSafe(|| analyzer.analyze(input)))
            .map_err(|payload| EngineError::AnalyzerPanic {
                region,
                message: panic_message(payload.as_ref()),
            })?;

        let score = result.map_err(|e| match e {
            EngineError::Analyzer { .. } | EngineError::AnalyzerPanic { .. } => e,
            other => EngineError::Analyzer {
                region,
                message: other.to_string(),
            },
        })?;

        if score.score > 100 {
            return Err(EngineError::Analyzer {
                region,
                message: format!("{} returned score {}", analyzer.name(), score.score),
            });
        }

        debug!(
            region = region.as_str(),
            score = score.score,
            issues = score.issues.len(),
            "region scored"
        );
        Ok(score)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn detection_confidence(detection: &DetectionVerdict) -> f64 {
    (detection.confidence_percent / 100.0).clamp(0.0, 1.0)
}

/// Verdict for images where no person was found
pub fn no_person_verdict(detection: DetectionVerdict, face_detected: bool) -> PostureVerdict {
    PostureVerdict {
        score: 0,
        status: PostureStatus::Poor,
        feedback: vec![
            FeedbackItem::new(Severity::Critical, "No person detected in the image"),
            FeedbackItem::owned(
                Severity::Info,
                format!(
                    "Person detection confidence: {:.2}%",
                    detection.confidence_percent
                ),
            ),
            FeedbackItem::new(Severity::Info, "Make sure your upper body is clearly visible in the frame"),
            FeedbackItem::new(Severity::Info, "Use good lighting and a plain background"),
            FeedbackItem::new(Severity::Info, "Stand 1-2 meters away from the camera"),
        ],
        recommendations: vec![
            FeedbackItem::new(Severity::Info, "Retake the photo with your whole upper body in frame"),
            FeedbackItem::new(Severity::Info, "Face the camera or stand side-on so your posture is visible"),
            FeedbackItem::new(Severity::Info, "Avoid heavy filters and very dark images"),
        ],
        confidence: detection_confidence(&detection),
        person_detected: false,
        face_detected,
        detection: Some(detection),
        detailed_analysis: None,
    }
}

/// Fixed verdict returned when analysis fails part way
pub fn degraded_verdict() -> PostureVerdict {
    PostureVerdict {
        score: DEGRADED_SCORE,
        status: PostureStatus::Poor,
        feedback: vec![
            FeedbackItem::new(Severity::Critical, "Posture analysis could not be completed"),
            FeedbackItem::new(Severity::Caution, "The image was processed but the results were unreliable"),
            FeedbackItem::new(Severity::Info, "Please try again with a clearer photo"),
        ],
        recommendations: vec![
            FeedbackItem::new(Severity::Info, "Retake the photo in good lighting"),
            FeedbackItem::new(Severity::Info, "Make sure your full body is visible in the frame"),
            FeedbackItem::new(Severity::Info, "Hold the camera steady at chest height"),
        ],
        confidence: DEGRADED_CONFIDENCE,
        person_detected: false,
        face_detected: false,
        detection: None,
        detailed_analysis: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::posture::IssueCode;
    use common::vision::{FaceAnnotation, LabelAnnotation, LocalizedObjectAnnotation};

    fn labels(items: &[(&str, f32)]) -> Vec<LabelAnnotation> {
        items
            .iter()
            .map(|(d, s)| LabelAnnotation {
                description: d.to_string(),
                score: *s,
            })
            .collect()
    }

    fn person_objects(n: usize) -> Vec<LocalizedObjectAnnotation> {
        (0..n)
            .map(|_| LocalizedObjectAnnotation {
                name: "Person".to_string(),
                score: 0.9,
            })
            .collect()
    }

    /// A clearly visible person with neutral posture keywords
    fn upright_person() -> RawAnnotations {
        RawAnnotations {
            labels: labels(&[
                ("Person", 0.97),
                ("Human", 0.95),
                ("Standing", 0.9),
                ("Shoulder", 0.88),
                ("Back", 0.85),
                ("Hip", 0.8),
            ]),
            objects: person_objects(2),
            faces: vec![FaceAnnotation {
                tilt_angle: 1.0,
                pan_angle: -2.0,
                roll_angle: 0.5,
                detection_confidence: 0.98,
            }],
            dominant_color_count: Some(10),
        }
    }

    struct FailingAnalyzer;

    impl RegionAnalyzer for FailingAnalyzer {
        fn region(&self) -> Region {
            Region::Hips
        }

        fn name(&self) -> &'static str {
            "Failing"
        }

        fn analyze(&self, _input: &AnalysisInput<'_>) -> Result<RegionScore, EngineError> {
            Err(EngineError::InvalidWeights("boom".to_string()))
        }
    }

    struct PanickingAnalyzer;

    impl RegionAnalyzer for PanickingAnalyzer {
        fn region(&self) -> Region {
            Region::Spine
        }

        fn name(&self) -> &'static str {
            "Panicking"
        }

        fn analyze(&self, _input: &AnalysisInput<'_>) -> Result<RegionScore, EngineError> {
            panic!("analyzer exploded")
        }
    }

    #[test]
    fn test_upright_person_scores_full() {
        let outcome = PostureEngine::default().run(&upright_person());
        assert_eq!(outcome.stage, AnalysisStage::Done);

        let verdict = outcome.verdict;
        assert!(verdict.person_detected);
        assert!(verdict.face_detected);
        assert_eq!(verdict.score, 100);
        assert_eq!(verdict.status, PostureStatus::Good);
        assert_eq!(verdict.feedback[0].text(), "✅ Excellent posture!");
        assert!(verdict.recommendations.is_empty());

        let detail = verdict.detailed_analysis.unwrap();
        assert_eq!(detail.scores(), [100; 5]);
    }

    #[test]
    fn test_confidence_follows_detection() {
        let verdict = PostureEngine::default().analyze(&upright_person());
        // 30 primary + 30 objects + 6 body parts + 5 face
        assert_eq!(verdict.detection.unwrap().confidence_percent, 71.0);
        assert!((verdict.confidence - 0.71).abs() < 1e-9);
    }

    #[test]
    fn test_no_person_short_circuits() {
        let raw = RawAnnotations {
            labels: labels(&[("Chair", 0.9), ("Table", 0.9)]),
            faces: vec![FaceAnnotation::default()],
            ..Default::default()
        };

        let outcome = PostureEngine::default().run(&raw);
        assert_eq!(outcome.stage, AnalysisStage::NoPersonTerminal);

        let verdict = outcome.verdict;
        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.status, PostureStatus::Poor);
        assert!(!verdict.person_detected);
        assert!(verdict.face_detected);
        assert!(verdict.detailed_analysis.is_none());
        assert_eq!(verdict.feedback.len(), 5);
        assert_eq!(
            verdict.feedback[1].message,
            "Person detection confidence: 5.00%"
        );
    }

    #[test]
    fn test_failing_analyzer_degrades() {
        let engine = PostureEngine::default().with_analyzer(Arc::new(FailingAnalyzer));
        let outcome = engine.run(&upright_person());

        assert_eq!(outcome.stage, AnalysisStage::DegradedTerminal);
        assert_eq!(outcome.verdict, degraded_verdict());
        assert_eq!(outcome.verdict.score, 25);
        assert_eq!(outcome.verdict.confidence, 0.1);
    }

    #[test]
    fn test_panicking_analyzer_degrades() {
        let engine = PostureEngine::default().with_analyzer(Arc::new(PanickingAnalyzer));
        let outcome = engine.run(&upright_person());

        assert_eq!(outcome.stage, AnalysisStage::DegradedTerminal);
        assert!(!outcome.verdict.person_detected);
        assert_eq!(outcome.verdict.feedback.len(), 3);
        assert_eq!(outcome.verdict.recommendations.len(), 3);
    }

    #[test]
    fn test_panic_not_reached_without_person() {
        let engine = PostureEngine::default().with_analyzer(Arc::new(PanickingAnalyzer));
        let outcome = engine.run(&RawAnnotations::default());
        assert_eq!(outcome.stage, AnalysisStage::NoPersonTerminal);
    }

    #[test]
    fn test_bent_spine_feedback() {
        let mut raw = upright_person();
        raw.labels.push(LabelAnnotation {
            description: "Bent".to_string(),
            score: 0.9,
        });
        raw.labels.push(LabelAnnotation {
            description: "Spine".to_string(),
            score: 0.9,
        });

        let verdict = PostureEngine::default().analyze(&raw);
        let detail = verdict.detailed_analysis.as_ref().unwrap();
        assert_eq!(detail.spine.score, 0);
        assert!(detail.spine.has_issue(IssueCode::SpineBending));
        assert!(detail.spine.has_issue(IssueCode::SevereBending));
        assert!(verdict
            .feedback
            .iter()
            .any(|f| f.message.starts_with("Bending posture detected")));
    }

    #[test]
    fn test_custom_weights_rejected() {
        let weights = ScoreWeights::default();
        assert!(PostureEngine::new(weights).is_ok());
        assert!(ScoreWeights::new([0.5; 5]).is_err());
    }

    #[test]
    fn test_stage_terminal_flags() {
        assert!(AnalysisStage::Done.is_terminal());
        assert!(AnalysisStage::NoPersonTerminal.is_terminal());
        assert!(AnalysisStage::DegradedTerminal.is_terminal());
        assert!(!AnalysisStage::Aggregating.is_terminal());
    }
}
