mod error;
mod source_provider;
mod window;

pub mod logical_plan;
pub mod physical_plan;

pub use error::{PlanError, UnsupportedFrameError};
pub use source_provider::{SourceProvider, SourceProviderRef};
pub use window::{FrameBound, WindowFrame, LEGACY_UNBOUNDED};
