use std::fmt;

use crate::Status;

/// Misuse of a [`StateBlock`](crate::StateBlock).
///
/// Native failures reported by capture and apply are not errors here; they
/// come back as a [`Status`]. This type only covers conditions where the
/// handle refused to talk to the device at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateBlockError {
    /// A required argument was null. Carries the argument name.
    InvalidArgument(&'static str),

    /// The native state block was never created, so there is nothing to
    /// capture into or apply from.
    InvalidState,

    /// The native state block has already been released.
    Released,

    /// Native creation failed under [`CreationPolicy::Strict`].
    ///
    /// [`CreationPolicy::Strict`]: crate::CreationPolicy::Strict
    CreationFailed(Status),
}

impl fmt::Display for StateBlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateBlockError::InvalidArgument(name) => write!(f, "argument `{name}` is null"),
            StateBlockError::InvalidState => {
                write!(f, "state block has not been created correctly")
            }
            StateBlockError::Released => write!(f, "state block has already been released"),
            StateBlockError::CreationFailed(status) => {
                write!(f, "unable to create state block: {status}")
            }
        }
    }
}

impl std::error::Error for StateBlockError {}
