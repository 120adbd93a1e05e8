use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use futures_util::stream::BoxStream;
use winq_dataset::{DataSet, SchemaRef};
use winq_planner::SourceProvider;

/// A source that replays a fixed list of datasets.
pub struct MemorySource {
    schema: SchemaRef,
    datasets: Vec<DataSet>,
    pulled: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new(schema: SchemaRef, datasets: Vec<DataSet>) -> Self {
        Self {
            schema,
            datasets,
            pulled: Default::default(),
        }
    }

    /// Returns the number of datasets consumers have pulled from the streams of this source.
    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }
}

impl SourceProvider for MemorySource {
    fn provider_name(&self) -> &'static str {
        "memory"
    }

    fn schema(&self) -> Result<SchemaRef> {
        Ok(self.schema.clone())
    }

    fn create_stream(&self) -> Result<BoxStream<'static, Result<DataSet>>> {
        let pulled = self.pulled.clone();
        Ok(Box::pin(futures_util::stream::iter(
            self.datasets.clone().into_iter().map(move |dataset| {
                pulled.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(dataset)
            }),
        )))
    }
}
