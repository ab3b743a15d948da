pub mod audits;
pub mod config;
pub mod error;
pub mod telemetry;

pub use error::AppError;
