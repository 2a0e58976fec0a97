use thiserror::Error;

/// Contract violations raised by the sparkline encoder.
///
/// These signal a programming or input error, never a network condition; the
/// caller should abandon the render rather than print a partial line.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SparklineError {
    #[error("invalid palette: need at least 2 glyphs, got {0}")]
    PaletteTooSmall(usize),

    #[error("invalid sample at position {index}: {value} is not a finite number")]
    NonFiniteSample { index: usize, value: f64 },
}
