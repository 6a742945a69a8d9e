//! Error types for rendering

use std::collections::HashSet;
use std::fmt;

use tracing::error;

/// Errors raised by a [`Renderer`](super::Renderer)
///
/// A render error means the presentation surface is misconfigured. It is
/// logged once and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RenderError {
    /// A required presentation node does not exist
    MissingNode { node: String },
}

impl RenderError {
    pub fn missing(node: impl ToString) -> Self {
        RenderError::MissingNode {
            node: node.to_string(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::MissingNode { node } => {
                write!(f, "required presentation node is missing: {}", node)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Reports each distinct render error once
#[derive(Debug, Default)]
pub struct RenderErrorLog {
    reported: HashSet<RenderError>,
}

impl RenderErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `result` if it is an error not seen before
    pub fn check(&mut self, result: Result<(), RenderError>) {
        if let Err(err) = result
            && self.reported.insert(err.clone())
        {
            error!("{err}");
        }
    }

    pub fn reported(&self) -> usize {
        self.reported.len()
    }
}
