use crate::engine::{AnalysisStage, PostureEngine};
use crate::error::ApiError;
use crate::vision::{check_provider_error, VisionClient};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::posture::{PostureVerdict, RawAnnotations, Region};
use common::vision::AnnotateResponse;
use std::sync::Arc;
use telemetry::metrics::{
    POSTURE_AGGREGATE_SCORE, POSTURE_ANALYSES, POSTURE_DETECTION_POINTS, POSTURE_REGION_SCORE,
    POSTURE_STATUS,
};
use tracing::info;

#[derive(Clone)]
pub struct PostureServiceState {
    inner: Arc<PostureServiceStateInner>,
}

struct PostureServiceStateInner {
    node_id: String,
    engine: PostureEngine,
    vision: Arc<dyn VisionClient>,
}

impl PostureServiceState {
    pub fn new(node_id: String, engine: PostureEngine, vision: Arc<dyn VisionClient>) -> Self {
        Self {
            inner: Arc::new(PostureServiceStateInner {
                node_id,
                engine,
                vision,
            }),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.inner.node_id
    }

    pub fn engine(&self) -> &PostureEngine {
        &self.inner.engine
    }

    /// Send an image to the vision provider and score the result
    pub async fn analyze_image(&self, image: &str) -> Result<PostureVerdict, ApiError> {
        let content = normalize_image(image)?;
        let response = self.inner.vision.annotate(&content).await?;
        self.analyze_response(response)
    }

    /// Score a provider response fetched by the caller
    pub fn analyze_response(&self, response: AnnotateResponse) -> Result<PostureVerdict, ApiError> {
        check_provider_error(&response)?;
        Ok(self.score(&RawAnnotations::from_vision_response(response)))
    }

    /// Run the engine and record metrics for the outcome
    pub fn score(&self, raw: &RawAnnotations) -> PostureVerdict {
        let outcome = self.inner.engine.run(raw);
        let verdict = outcome.verdict;

        let label = match outcome.stage {
            AnalysisStage::Done => "scored",
            AnalysisStage::NoPersonTerminal => "no_person",
            _ => "degraded",
        };
        POSTURE_ANALYSES.with_label_values(&[label]).inc();
        POSTURE_STATUS
            .with_label_values(&[verdict.status.as_str()])
            .inc();

        if let Some(detection) = &verdict.detection {
            POSTURE_DETECTION_POINTS.observe(detection.confidence_percent);
        }
        if let Some(detail) = &verdict.detailed_analysis {
            POSTURE_AGGREGATE_SCORE.observe(f64::from(verdict.score));
            for region in Region::ALL {
                POSTURE_REGION_SCORE
                    .with_label_values(&[region.as_str()])
                    .observe(f64::from(detail.get(region).score));
            }
        }

        info!(
            outcome = label,
            score = verdict.score,
            status = verdict.status.as_str(),
            person_detected = verdict.person_detected,
            "posture analyzed"
        );

        verdict
    }
}

/// Validate a base64 image and return it in canonical padded form.
///
/// Accepts an optional `data:<mime>;base64,` prefix and embedded whitespace.
pub fn normalize_image(image: &str) -> Result<String, ApiError> {
    let payload = match image.trim().split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => image.trim(),
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.is_empty() {
        return Err(ApiError::bad_request("image is empty"));
    }

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ApiError::bad_request(format!("image is not valid base64: {}", e)))?;
    if bytes.is_empty() {
        return Err(ApiError::bad_request("image is empty"));
    }

    Ok(STANDARD.encode(bytes))
}
