//! Type definitions for optiboard

mod error;
mod stats;
mod summary;

pub use error::*;
pub use stats::*;
pub use summary::*;

/// Snapshot cache warning types
#[derive(Debug, Clone, PartialEq)]
pub enum CacheWarning {
    /// Failed to open or read a snapshot file
    LoadFailed(String),
    /// Snapshot file was corrupted (invalid JSON)
    Corrupted(String),
}

impl std::fmt::Display for CacheWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadFailed(msg) | Self::Corrupted(msg) => f.write_str(msg),
        }
    }
}
