//! Property-based checks for the posture engine.

use crate::engine::aggregate::{classify, ScoreWeights};
use crate::engine::detector::{detect_person, BODY_PART_TERMS, CLOTHING_TERMS, PRIMARY_PERSON_TERMS};
use crate::engine::keywords::AnalysisInput;
use crate::engine::regions::{builtin_analyzers, hips::HIP_TERMS, spine::BENDING_TERMS};
use crate::engine::{no_person_verdict, PostureEngine};
use common::posture::RawAnnotations;
use common::vision::{FaceAnnotation, LabelAnnotation, LocalizedObjectAnnotation};
use proptest::prelude::*;

const POSTURE_TERMS: [&str; 24] = [
    "rounded", "hunched", "asymmetric", "uneven", "elevated", "raised", "slouched", "slumped",
    "kyphosis", "twisted", "rotated", "tilted", "strain", "tension", "neck", "poor", "bad",
    "crooked", "stiff", "knee", "collapsed", "anterior tilt", "shifted", "spine",
];

fn vocabulary() -> Vec<&'static str> {
    PRIMARY_PERSON_TERMS
        .iter()
        .chain(BODY_PART_TERMS.iter())
        .chain(CLOTHING_TERMS.iter())
        .chain(HIP_TERMS.iter())
        .chain(BENDING_TERMS.iter())
        .chain(POSTURE_TERMS.iter())
        .copied()
        .collect()
}

fn arb_labels() -> impl Strategy<Value = Vec<LabelAnnotation>> {
    prop::sample::subsequence(vocabulary(), 0..16).prop_flat_map(|terms| {
        let n = terms.len();
        prop::collection::vec(0.0f32..1.0, n).prop_map(move |scores| {
            terms
                .iter()
                .zip(scores)
                .map(|(t, score)| LabelAnnotation {
                    description: t.to_string(),
                    score,
                })
                .collect()
        })
    })
}

fn arb_face() -> impl Strategy<Value = FaceAnnotation> {
    (-45.0f32..45.0, -60.0f32..60.0).prop_map(|(tilt, pan)| FaceAnnotation {
        tilt_angle: tilt,
        pan_angle: pan,
        roll_angle: 0.0,
        detection_confidence: 0.9,
    })
}

fn arb_annotations() -> impl Strategy<Value = RawAnnotations> {
    (
        arb_labels(),
        prop::collection::vec(0.0f32..1.0, 0..4),
        prop::collection::vec(arb_face(), 0..3),
        prop::option::of(0usize..12),
    )
        .prop_map(|(labels, object_scores, faces, colors)| RawAnnotations {
            labels,
            objects: object_scores
                .into_iter()
                .map(|score| LocalizedObjectAnnotation {
                    name: "Person".to_string(),
                    score,
                })
                .collect(),
            faces,
            dominant_color_count: colors,
        })
}

fn arb_weights() -> impl Strategy<Value = ScoreWeights> {
    prop::collection::vec(1u32..100, 5).prop_map(|raw| {
        let total: u32 = raw.iter().sum();
        let mut weights = [0.0; 5];
        for (w, r) in weights.iter_mut().zip(&raw) {
            *w = f64::from(*r) / f64::from(total);
        }
        ScoreWeights::new(weights).unwrap_or_default()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn region_scores_stay_in_range(raw in arb_annotations()) {
        let input = AnalysisInput::extract(&raw);
        for analyzer in builtin_analyzers() {
            let score = analyzer.analyze(&input).unwrap();
            prop_assert!(score.score <= 100);
            if score.issues.is_empty() {
                prop_assert_eq!(score.score, 100);
            }
        }
    }

    #[test]
    fn analyze_is_idempotent(raw in arb_annotations()) {
        let engine = PostureEngine::default();
        let first = engine.analyze(&raw);
        let second = engine.analyze(&raw);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn verdict_score_and_status_agree(raw in arb_annotations()) {
        let verdict = PostureEngine::default().analyze(&raw);
        prop_assert!(verdict.score <= 100);
        prop_assert!((0.0..=1.0).contains(&verdict.confidence));
        if verdict.person_detected {
            prop_assert_eq!(verdict.status, classify(verdict.score));
            prop_assert!(verdict.detailed_analysis.is_some());
        } else {
            // Built-in analyzers never fault, so this is always the no-person path
            prop_assert_eq!(verdict.score, 0);
            prop_assert!(verdict.detection.is_some());
        }
    }

    #[test]
    fn empty_bag_is_no_person(colors in prop::option::of(0usize..20)) {
        let raw = RawAnnotations {
            dominant_color_count: colors,
            ..Default::default()
        };

        let verdict = PostureEngine::default().analyze(&raw);
        prop_assert!(!verdict.person_detected);
        prop_assert_eq!(verdict.score, 0);
        prop_assert_eq!(&verdict, &no_person_verdict(detect_person(&raw), false));
    }

    #[test]
    fn aggregation_is_linear(
        scores in prop::array::uniform5(0u8..=100),
        k in 0.0f64..=1.0,
        weights in arb_weights(),
    ) {
        let base = weights.aggregate(scores).unwrap();
        let scaled_scores = scores.map(|s| (f64::from(s) * k).round() as u8);
        let scaled = weights.aggregate(scaled_scores).unwrap();

        // Rounding happens once per region and once for the sum
        let expected = f64::from(base) * k;
        prop_assert!((f64::from(scaled) - expected).abs() <= 1.5,
            "scaled {} vs expected {}", scaled, expected);
    }

    #[test]
    fn status_is_monotonic(
        low in prop::array::uniform5(0u8..=100),
        bump in prop::array::uniform5(0u8..=100),
        weights in arb_weights(),
    ) {
        let high: [u8; 5] = std::array::from_fn(|i| low[i].saturating_add(bump[i]).min(100));

        let low_score = weights.aggregate(low).unwrap();
        let high_score = weights.aggregate(high).unwrap();
        prop_assert!(high_score >= low_score);
        prop_assert!(classify(high_score) >= classify(low_score));
    }
}
