//! Motion error types

use crate::scene::ElementId;
use thiserror::Error;

/// Terminal failure of a motion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    /// The target element was detached or destroyed before its transition settled
    #[error("Target unavailable: {0:?}")]
    TargetUnavailable(ElementId),

    /// An action scheduled with `after_delay` returned an error
    #[error("Delayed action failed: {0}")]
    ActionFailed(String),
}

impl MotionError {
    pub(crate) fn action(err: anyhow::Error) -> Self {
        MotionError::ActionFailed(format!("{err:#}"))
    }
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
