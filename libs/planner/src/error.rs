use derive_more::Display;

use crate::FrameBound;

/// Errors that abort the compilation of a window operator.
#[derive(Debug, Clone, Eq, PartialEq, Display)]
pub enum PlanError {
    #[display(
        fmt = "a window operator supports exactly one window group, found {}",
        count
    )]
    MultipleWindowGroupsUnsupported { count: usize },

    #[display(fmt = "window operator has no window group")]
    MissingWindowGroup,

    #[display(
        fmt = "field #{} does not exist, the input has {} fields",
        index,
        field_count
    )]
    UnresolvedFieldReference { index: usize, field_count: usize },

    #[display(fmt = "unknown aggregate function: '{}'", name)]
    UnknownFunction { name: String },

    #[display(fmt = "frame function '{}' is not supported", name)]
    UnsupportedFrameFunction { name: String },
}

impl std::error::Error for PlanError {}

/// A window frame that cannot be evaluated.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
#[display(fmt = "unsupported window frame: {} .. {}", start, end)]
pub struct UnsupportedFrameError {
    pub start: FrameBound,
    pub end: FrameBound,
}

impl std::error::Error for UnsupportedFrameError {}
