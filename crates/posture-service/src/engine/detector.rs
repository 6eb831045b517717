//! Person detection by point accumulation.
//!
//! Every layer contributes independently to a 100 point budget. A person is
//! considered present at 60 points or more.

use super::keywords::{KeywordSet, GENERAL_CONFIDENCE_FLOOR, PRIMARY_CONFIDENCE_FLOOR};
use common::posture::{DetectionVerdict, RawAnnotations};

/// Points required for a positive detection
pub const DETECTION_THRESHOLD: i32 = 60;

/// Labels that directly indicate a person
pub const PRIMARY_PERSON_TERMS: [&str; 20] = [
    "person",
    "human",
    "people",
    "man",
    "woman",
    "boy",
    "girl",
    "child",
    "adult",
    "selfie",
    "portrait",
    "face",
    "head",
    "body",
    "human body",
    "gesture",
    "smile",
    "standing",
    "sitting",
    "model",
];

/// Anatomical terms
pub const BODY_PART_TERMS: [&str; 40] = [
    "head", "neck", "shoulder", "arm", "elbow", "wrist", "hand", "finger", "chest", "torso",
    "back", "spine", "waist", "hip", "leg", "thigh", "knee", "calf", "ankle", "foot", "feet",
    "toe", "abdomen", "stomach", "belly", "jaw", "chin", "ear", "eye", "nose", "mouth", "lip",
    "forehead", "cheek", "skin", "muscle", "shin", "forearm", "bicep", "joint",
];

/// Garments
pub const CLOTHING_TERMS: [&str; 25] = [
    "clothing",
    "shirt",
    "t-shirt",
    "sleeve",
    "jacket",
    "coat",
    "dress",
    "pants",
    "jeans",
    "trousers",
    "shorts",
    "skirt",
    "sweater",
    "hoodie",
    "blouse",
    "vest",
    "outerwear",
    "sportswear",
    "uniform",
    "footwear",
    "shoe",
    "sneakers",
    "hat",
    "cap",
    "collar",
];

const PRIMARY_POINTS_CAP: i32 = 40;
const OBJECT_POINTS_CAP: i32 = 30;
const BODY_PART_POINTS_CAP: i32 = 20;
const BODY_PART_MIN_MATCHES: usize = 3;
const CLOTHING_POINTS_CAP: i32 = 10;
const CLOTHING_MIN_MATCHES: usize = 2;
const FACE_POINTS_CAP: i32 = 10;
const LOW_COLOR_THRESHOLD: usize = 5;
const LOW_COLOR_PENALTY: i32 = 10;

/// Points awarded by each detection layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectionPoints {
    pub primary_labels: i32,
    pub person_objects: i32,
    pub body_parts: i32,
    pub clothing: i32,
    pub faces: i32,
    pub image_quality: i32,
}

impl DetectionPoints {
    pub fn score(raw: &RawAnnotations) -> Self {
        let primary = KeywordSet::from_labels(&raw.labels, PRIMARY_CONFIDENCE_FLOOR)
            .count_matching(&PRIMARY_PERSON_TERMS);

        let person_objects = raw
            .objects
            .iter()
            .filter(|o| o.score > PRIMARY_CONFIDENCE_FLOOR && o.name.eq_ignore_ascii_case("person"))
            .count();

        let general = KeywordSet::from_labels(&raw.labels, GENERAL_CONFIDENCE_FLOOR);

        let body_parts = general.count_matching(&BODY_PART_TERMS);
        let body_part_points = if body_parts >= BODY_PART_MIN_MATCHES {
            capped(body_parts, 2, BODY_PART_POINTS_CAP)
        } else {
            0
        };

        let clothing = general.count_matching(&CLOTHING_TERMS);
        let clothing_points = if clothing >= CLOTHING_MIN_MATCHES {
            capped(clothing, 2, CLOTHING_POINTS_CAP)
        } else {
            0
        };

        let image_quality = match raw.dominant_color_count {
            Some(count) if count < LOW_COLOR_THRESHOLD => -LOW_COLOR_PENALTY,
            _ => 0,
        };

        Self {
            primary_labels: capped(primary, 10, PRIMARY_POINTS_CAP),
            person_objects: capped(person_objects, 15, OBJECT_POINTS_CAP),
            body_parts: body_part_points,
            clothing: clothing_points,
            faces: capped(raw.faces.len(), 5, FACE_POINTS_CAP),
            image_quality,
        }
    }

    /// Raw total, not clamped
    pub fn total(&self) -> i32 {
        self.primary_labels
            + self.person_objects
            + self.body_parts
            + self.clothing
            + self.faces
            + self.image_quality
    }

    pub fn verdict(&self) -> DetectionVerdict {
        let total = self.total();
        DetectionVerdict {
            detected: total >= DETECTION_THRESHOLD,
            confidence_percent: f64::from(total) / 100.0 * 100.0,
        }
    }
}

fn capped(count: usize, per_match: i32, cap: i32) -> i32 {
    i32::try_from(count)
        .unwrap_or(i32::MAX)
        .saturating_mul(per_match)
        .min(cap)
}

/// Decide whether a person is present
pub fn detect_person(raw: &RawAnnotations) -> DetectionVerdict {
    let points = DetectionPoints::score(raw);
    let verdict = points.verdict();

    tracing::debug!(
        primary = points.primary_labels,
        objects = points.person_objects,
        body_parts = points.body_parts,
        clothing = points.clothing,
        faces = points.faces,
        image_quality = points.image_quality,
        total = points.total(),
        detected = verdict.detected,
        "person detection points"
    );

    verdict
}
