pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod vision;

#[cfg(test)]
mod tests_proptest;

pub use config::PostureServiceConfig;
pub use engine::PostureEngine;
pub use error::ApiError;
pub use state::PostureServiceState;
pub use vision::{HttpVisionClient, VisionClient, VisionError};
