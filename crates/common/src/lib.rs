pub mod posture;
pub mod vision;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
