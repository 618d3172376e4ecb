use thiserror::Error;

/// Errors raised while loading or building a track.
#[derive(Debug, Error)]
pub enum TrackError {
    /// A closed Catmull-Rom loop needs at least four control points.
    #[error("track needs at least 4 control points, found {found}")]
    TooFewControlPoints { found: usize },

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Malformed line in a control point file (1-based line number).
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl TrackError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
