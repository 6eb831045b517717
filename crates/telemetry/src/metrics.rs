use lazy_static::lazy_static;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

fn score_buckets() -> Vec<f64> {
    (0..=10).map(|i| f64::from(i) * 10.0).collect()
}

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ==== Posture Engine Metrics ====
    pub static ref POSTURE_ANALYSES: IntCounterVec = {
        let metric = IntCounterVec::new(
            Opts::new(
                "posture_analyses_total",
                "Total number of posture analyses by outcome",
            ),
            &["outcome"],
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    pub static ref POSTURE_STATUS: IntCounterVec = {
        let metric = IntCounterVec::new(
            Opts::new(
                "posture_status_total",
                "Total number of verdicts by posture status",
            ),
            &["status"],
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    pub static ref POSTURE_REGION_SCORE: HistogramVec = {
        let metric = HistogramVec::new(
            HistogramOpts::new("posture_region_score", "Per-region posture scores")
                .buckets(score_buckets()),
            &["region"],
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    pub static ref POSTURE_AGGREGATE_SCORE: Histogram = {
        let metric = Histogram::with_opts(
            HistogramOpts::new("posture_aggregate_score", "Weighted overall posture scores")
                .buckets(score_buckets()),
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    pub static ref POSTURE_DETECTION_POINTS: Histogram = {
        let metric = Histogram::with_opts(
            HistogramOpts::new(
                "posture_detection_points",
                "Person detection points per analyzed image",
            )
            .buckets(vec![-10.0, 0.0, 20.0, 40.0, 60.0, 80.0, 100.0, 120.0]),
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    // ==== Vision Provider Metrics ====
    pub static ref VISION_REQUESTS: IntCounterVec = {
        let metric = IntCounterVec::new(
            Opts::new(
                "vision_requests_total",
                "Total number of vision provider requests by outcome",
            ),
            &["outcome"],
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };

    pub static ref VISION_REQUEST_DURATION: Histogram = {
        let metric = Histogram::with_opts(
            HistogramOpts::new(
                "vision_request_duration_seconds",
                "Latency of vision provider requests",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )
        .expect("metric can be created");
        REGISTRY.register(Box::new(metric.clone())).ok();
        metric
    };
}

/// Helper function to encode metrics for Prometheus scraping
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| {
        prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e))
    })
}
