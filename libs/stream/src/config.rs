use std::sync::Arc;

pub type StreamConfigRef = Arc<StreamConfig>;

#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub name: String,

    /// The maximum number of bytes one open partition may buffer.
    pub memory_limit: usize,

    /// Check that the input is sorted by the partition and order keys.
    pub verify_input_order: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            name: "noname".to_string(),
            memory_limit: 256 * 1024 * 1024,
            verify_input_order: false,
        }
    }
}

impl StreamConfig {
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn with_memory_limit(self, memory_limit: usize) -> Self {
        Self {
            memory_limit,
            ..self
        }
    }

    pub fn with_verify_input_order(self, verify_input_order: bool) -> Self {
        Self {
            verify_input_order,
            ..self
        }
    }
}
