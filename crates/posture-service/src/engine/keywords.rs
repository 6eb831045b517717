//! Keyword extraction from raw annotations.
//!
//! All matching in the engine is substring containment on lower-cased text:
//! a keyword `"forward head posture"` satisfies both `"forward"` and `"head"`.

use common::posture::RawAnnotations;
use common::vision::{FaceAnnotation, LabelAnnotation};
use std::collections::BTreeSet;

/// Confidence floor for general keywords
pub const GENERAL_CONFIDENCE_FLOOR: f32 = 0.6;

/// Confidence floor for primary person labels and person objects
pub const PRIMARY_CONFIDENCE_FLOOR: f32 = 0.7;

/// Lower-cased, confidence filtered descriptive terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: BTreeSet<String>,
}

impl KeywordSet {
    /// Labels and object names above the general floor
    pub fn from_annotations(raw: &RawAnnotations) -> Self {
        let labels = raw
            .labels
            .iter()
            .filter(|l| l.score > GENERAL_CONFIDENCE_FLOOR)
            .map(|l| l.description.as_str());
        let objects = raw
            .objects
            .iter()
            .filter(|o| o.score > GENERAL_CONFIDENCE_FLOOR)
            .map(|o| o.name.as_str());

        labels.chain(objects).collect()
    }

    /// Label descriptions strictly above `floor`
    pub fn from_labels(labels: &[LabelAnnotation], floor: f32) -> Self {
        labels
            .iter()
            .filter(|l| l.score > floor)
            .map(|l| l.description.as_str())
            .collect()
    }

    /// Whether any keyword contains `term`
    pub fn contains(&self, term: &str) -> bool {
        self.keywords.iter().any(|k| k.contains(term))
    }

    /// Whether any keyword contains any of `terms`
    pub fn contains_any(&self, terms: &[&str]) -> bool {
        terms.iter().any(|t| self.contains(t))
    }

    /// Number of distinct keywords containing at least one of `terms`
    pub fn count_matching(&self, terms: &[&str]) -> usize {
        self.keywords
            .iter()
            .filter(|k| terms.iter().any(|t| k.contains(t)))
            .count()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            keywords: iter
                .into_iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

/// Normalized view of one annotation bag, handed to every region analyzer
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInput<'a> {
    pub keywords: KeywordSet,

    /// Face geometry exactly as annotated
    pub faces: &'a [FaceAnnotation],

    pub dominant_color_count: Option<usize>,
}

impl<'a> AnalysisInput<'a> {
    pub fn extract(raw: &'a RawAnnotations) -> Self {
        Self {
            keywords: KeywordSet::from_annotations(raw),
            faces: &raw.faces,
            dominant_color_count: raw.dominant_color_count,
        }
    }

    /// First detected face, if any
    pub fn primary_face(&self) -> Option<&FaceAnnotation> {
        self.faces.first()
    }

    /// Whether fewer than `threshold` dominant colors were reported.
    ///
    /// False when the provider returned no image properties at all.
    pub fn colors_below(&self, threshold: usize) -> bool {
        matches!(self.dominant_color_count, Some(count) if count < threshold)
    }
}
