use derive_more::Display;

/// A window operator held more bytes than the configured memory limit.
///
/// `closed_key_bytes` are the partition keys remembered to verify the input order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
#[display(
    fmt = "partition buffers {} bytes and closed partition keys hold {} bytes, which exceeds the memory limit of {} bytes",
    partition_bytes,
    closed_key_bytes,
    limit
)]
pub struct ExecutionResourceError {
    pub partition_bytes: usize,
    pub closed_key_bytes: usize,
    pub limit: usize,
}

impl std::error::Error for ExecutionResourceError {}

/// The consumer cancelled the stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
#[display(fmt = "stream cancelled")]
pub struct ExecutionCancelled;

impl std::error::Error for ExecutionCancelled {}
