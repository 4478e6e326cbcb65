use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating geometry parameters.
///
/// The pipeline stages themselves never fail; degenerate input produces
/// empty or zero-sized output instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid cluster distance: {0} (must be finite and > 0)")]
    InvalidClusterDistance(f32),

    #[error("Invalid height band: min {min} must be below max {max}")]
    InvalidHeightBand { min: f32, max: f32 },
}
