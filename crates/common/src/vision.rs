//! Wire contracts for the external vision-annotation provider.
//!
//! Only the subset of the provider response that the posture engine consumes
//! is modelled here; unknown fields are ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Features requested for every posture image.
pub const REQUESTED_FEATURES: [&str; 6] = [
    "LABEL_DETECTION",
    "FACE_DETECTION",
    "OBJECT_LOCALIZATION",
    "SAFE_SEARCH_DETECTION",
    "IMAGE_PROPERTIES",
    "TEXT_DETECTION",
];

/// Default number of results requested per feature
pub const DEFAULT_MAX_RESULTS: u32 = 50;

/// Batch annotate request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageContent {
    /// Base64 encoded image bytes
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub max_results: u32,
}

impl AnnotateRequest {
    /// Build a single-image request asking for every feature the engine uses
    pub fn for_image(content: impl Into<String>, max_results: u32) -> Self {
        Self {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: content.into(),
                },
                features: REQUESTED_FEATURES
                    .iter()
                    .map(|f| Feature {
                        feature_type: f.to_string(),
                        max_results,
                    })
                    .collect(),
            }],
        }
    }
}

/// Batch annotate response body: `{ "responses": [ ... ] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

/// Annotations for a single image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotateImageResponse {
    pub label_annotations: Vec<LabelAnnotation>,
    pub face_annotations: Vec<FaceAnnotation>,
    pub localized_object_annotations: Vec<LocalizedObjectAnnotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_properties_annotation: Option<ImagePropertiesAnnotation>,
    /// Per-image error reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderStatus>,
}

/// Text label with confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAnnotation {
    pub description: String,
    /// Confidence (0.0 to 1.0). The provider calls this `score`.
    #[serde(alias = "confidence", default)]
    pub score: f32,
}

/// Localized object with confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedObjectAnnotation {
    pub name: String,
    #[serde(alias = "confidence", default)]
    pub score: f32,
}

/// Face geometry, angles in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceAnnotation {
    pub tilt_angle: f32,
    pub pan_angle: f32,
    pub roll_angle: f32,
    pub detection_confidence: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagePropertiesAnnotation {
    pub dominant_colors: Option<DominantColors>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DominantColors {
    pub colors: Vec<ColorInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorInfo {
    pub score: f32,
    pub pixel_fraction: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderStatus {
    pub code: i32,
    pub message: String,
}

impl ImagePropertiesAnnotation {
    pub fn dominant_color_count(&self) -> usize {
        self.dominant_colors
            .as_ref()
            .map(|d| d.colors.len())
            .unwrap_or(0)
    }
}
