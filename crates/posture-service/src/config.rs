use crate::engine::aggregate::ScoreWeights;
use anyhow::{Context, Result};
use reqwest::Url;
use std::env;
use std::time::Duration;

/// Public endpoint of the default vision annotation provider
pub const DEFAULT_VISION_API_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

const DEFAULT_VISION_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct PostureServiceConfig {
    /// Address to bind the HTTP server to
    pub bind_addr: String,

    /// Vision provider annotate endpoint
    pub vision_url: Url,

    /// API key appended as the `key` query parameter
    pub vision_api_key: Option<String>,

    pub vision_timeout: Duration,

    /// Region weights for aggregation
    pub weights: ScoreWeights,

    /// Node ID for this posture service instance
    pub node_id: String,
}

impl PostureServiceConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            env::var("POSTURE_SERVICE_ADDR").unwrap_or_else(|_| "0.0.0.0:8090".to_string());

        let vision_url = env::var("VISION_API_URL")
            .unwrap_or_else(|_| DEFAULT_VISION_API_URL.to_string());
        let vision_url = Url::parse(&vision_url).context("Invalid VISION_API_URL")?;

        let vision_api_key = env::var("VISION_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let vision_timeout = match env::var("VISION_TIMEOUT_SECS") {
            Ok(s) => Duration::from_secs(
                s.parse::<u64>()
                    .context("VISION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_VISION_TIMEOUT_SECS),
        };

        let weights = match env::var("POSTURE_WEIGHTS") {
            Ok(s) => s.parse::<ScoreWeights>().context("Invalid POSTURE_WEIGHTS")?,
            Err(_) => ScoreWeights::default(),
        };

        let node_id = env::var("NODE_ID").unwrap_or_else(|_| {
            format!(
                "posture-service-{}",
                hostname::get()
                    .ok()
                    .and_then(|h| h.into_string().ok())
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
            )
        });

        Ok(Self {
            bind_addr,
            vision_url,
            vision_api_key,
            vision_timeout,
            weights,
            node_id,
        })
    }
}
