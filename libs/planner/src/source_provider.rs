use std::sync::Arc;

use anyhow::Result;
use futures_util::stream::BoxStream;
use winq_dataset::{DataSet, SchemaRef};

/// A leaf of a plan that produces datasets.
pub trait SourceProvider: Send + Sync + 'static {
    fn provider_name(&self) -> &'static str;

    fn schema(&self) -> Result<SchemaRef>;

    fn create_stream(&self) -> Result<BoxStream<'static, Result<DataSet>>>;
}

pub type SourceProviderRef = Arc<dyn SourceProvider>;
