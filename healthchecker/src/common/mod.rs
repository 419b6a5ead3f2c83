//! 共通型定義

pub mod error;
pub mod types;

pub use error::{ConfigError, FetchError, MonitorError};
pub use types::{HealthSnapshot, LookbackWindow, Transaction};
