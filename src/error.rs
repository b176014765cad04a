// src/error.rs

use thiserror::Error;

/// Errors raised while creating or looking up filters.
///
/// Processing itself never fails: out-of-range values are clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VcfError {
    #[error("sample rate must be finite and positive, got {0}")]
    InvalidSampleRate(f64),

    #[error("unknown filter topology `{0}`")]
    UnknownTopology(String),

    #[error("no plugin descriptor at index {0}")]
    UnknownDescriptor(u32),

    #[error("no plugin descriptor with URI `{0}`")]
    UnknownUri(String),
}

pub type VcfResult<T> = Result<T, VcfError>;
