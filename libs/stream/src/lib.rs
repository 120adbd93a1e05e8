mod config;
mod dataset;
mod error;
mod memory_source;
mod registry;
mod stream;
mod streams;

pub use config::{StreamConfig, StreamConfigRef};
pub use error::{ExecutionCancelled, ExecutionResourceError};
pub use memory_source::MemorySource;
pub use registry::SourceRegistry;
pub use stream::{DataStream, ShutdownHandle};
