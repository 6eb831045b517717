use async_trait::async_trait;
use common::vision::{AnnotateRequest, AnnotateResponse, DEFAULT_MAX_RESULTS};
use reqwest::Url;
use std::time::{Duration, Instant};
use telemetry::metrics::{VISION_REQUESTS, VISION_REQUEST_DURATION};
use thiserror::Error;
use tracing::{instrument, warn};

/// Longest slice of an error body kept for diagnostics
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("failed to build vision client: {0}")]
    Client(String),

    #[error("vision request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("vision provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed vision response: {0}")]
    Decode(String),

    #[error("vision provider error {code}: {message}")]
    Provider { code: i32, message: String },
}

impl VisionError {
    /// Metric label for this failure
    pub fn kind(&self) -> &'static str {
        match self {
            VisionError::Client(_) => "client",
            VisionError::Transport(e) if e.is_timeout() => "timeout",
            VisionError::Transport(_) => "transport",
            VisionError::Status { .. } => "status",
            VisionError::Decode(_) => "decode",
            VisionError::Provider { .. } => "provider",
        }
    }
}

/// Reject batch responses whose first image carries a provider error
pub fn check_provider_error(response: &AnnotateResponse) -> Result<(), VisionError> {
    match response.responses.first().and_then(|r| r.error.as_ref()) {
        Some(status) => Err(VisionError::Provider {
            code: status.code,
            message: status.message.clone(),
        }),
        None => Ok(()),
    }
}

/// Source of image annotations
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Annotate one base64 encoded image
    async fn annotate(&self, image_base64: &str) -> Result<AnnotateResponse, VisionError>;
}

pub struct HttpVisionClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpVisionClient {
    pub fn new(
        endpoint: Url,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::Client(e.to_string()))?;

        let mut endpoint = endpoint;
        if let Some(key) = api_key {
            endpoint.query_pairs_mut().append_pair("key", key);
        }

        Ok(Self { endpoint, client })
    }

    async fn send(&self, request: &AnnotateRequest) -> Result<AnnotateResponse, VisionError> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            body.truncate(floor_char_boundary(&body, MAX_ERROR_BODY));
            return Err(VisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let response: AnnotateResponse =
            serde_json::from_slice(&bytes).map_err(|e| VisionError::Decode(e.to_string()))?;
        check_provider_error(&response)?;
        Ok(response)
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|i| s.is_char_boundary(*i)).unwrap_or(0)
}

#[async_trait]
impl VisionClient for HttpVisionClient {
    #[instrument(skip_all, fields(image_len = image_base64.len()))]
    async fn annotate(&self, image_base64: &str) -> Result<AnnotateResponse, VisionError> {
        let request = AnnotateRequest::for_image(image_base64, DEFAULT_MAX_RESULTS);

        let started = Instant::now();
        let result = self.send(&request).await;
        VISION_REQUEST_DURATION.observe(started.elapsed().as_secs_f64());

        match &result {
            Ok(_) => VISION_REQUESTS.with_label_values(&["success"]).inc(),
            Err(e) => {
                warn!(error = %e, "vision request failed");
                VISION_REQUESTS.with_label_values(&[e.kind()]).inc();
            }
        }

        result
    }
}
