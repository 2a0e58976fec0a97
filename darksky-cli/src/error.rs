use darksky_core::SparklineError;
use thiserror::Error;

// sysexits.h
pub const EX_USAGE: u8 = 64;
pub const EX_UNAVAILABLE: u8 = 69;
pub const EX_SOFTWARE: u8 = 70;
pub const EX_CONFIG: u8 = 78;

/// Everything that can end a run early, grouped by how the process should exit.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing input; nothing was sent over the network.
    #[error("{0}")]
    Usage(String),

    /// A remote API could not be reached or gave no usable answer.
    #[error("{0:#}")]
    Upstream(anyhow::Error),

    #[error("cannot render report: {0}")]
    InvalidArgument(#[from] SparklineError),

    #[error("{0:#}")]
    Config(anyhow::Error),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Usage(_) => EX_USAGE,
            AppError::Upstream(_) => EX_UNAVAILABLE,
            AppError::InvalidArgument(_) => EX_SOFTWARE,
            AppError::Config(_) => EX_CONFIG,
        }
    }
}
