//! Errors reported by scene operations.
//!
//! Every variant describes a caller mistake (a broken precondition). The
//! scene checks all preconditions before mutating anything, so an `Err`
//! always leaves the scene exactly as it was.

use std::fmt::Debug;

/// Error returned when a scene operation's precondition does not hold.
///
/// Keys are carried in their `Debug` rendering so the error type stays
/// independent of the scene's key types.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The node is already registered.
    #[error("node {0} is already in the scene")]
    DuplicateNode(String),
    /// The edge is already registered.
    #[error("edge {0} is already in the scene")]
    DuplicateEdge(String),
    /// The pin is already registered.
    #[error("pin {0} is already in the scene")]
    DuplicatePin(String),
    /// The node is not registered.
    #[error("node {0} is not in the scene")]
    UnknownNode(String),
    /// The edge is not registered.
    #[error("edge {0} is not in the scene")]
    UnknownEdge(String),
    /// The pin is not registered.
    #[error("pin {0} is not in the scene")]
    UnknownPin(String),
    /// Incidence bookkeeping disagrees with edge endpoints.
    #[error("inconsistent bookkeeping for {subject}: {reason}")]
    Inconsistent { subject: String, reason: &'static str },
}

impl SceneError {
    pub(crate) fn duplicate_node(node: &impl Debug) -> Self {
        Self::DuplicateNode(format!("{node:?}"))
    }

    pub(crate) fn duplicate_edge(edge: &impl Debug) -> Self {
        Self::DuplicateEdge(format!("{edge:?}"))
    }

    pub(crate) fn duplicate_pin(pin: &impl Debug) -> Self {
        Self::DuplicatePin(format!("{pin:?}"))
    }

    pub(crate) fn unknown_node(node: &impl Debug) -> Self {
        Self::UnknownNode(format!("{node:?}"))
    }

    pub(crate) fn unknown_edge(edge: &impl Debug) -> Self {
        Self::UnknownEdge(format!("{edge:?}"))
    }

    pub(crate) fn unknown_pin(pin: &impl Debug) -> Self {
        Self::UnknownPin(format!("{pin:?}"))
    }

    pub(crate) fn inconsistent(subject: &impl Debug, reason: &'static str) -> Self {
        Self::Inconsistent {
            subject: format!("{subject:?}"),
            reason,
        }
    }
}
