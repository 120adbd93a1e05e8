use anyhow::{Context, Result};
use futures_util::StreamExt;
use winq_dataset::DataSet;
use winq_planner::physical_plan::PhysicalSourceNode;

use crate::stream::{shutdown_requested, CreateStreamContext, DataSetStream};

pub fn create_source_stream(
    ctx: &CreateStreamContext,
    node: &PhysicalSourceNode,
) -> Result<DataSetStream> {
    let provider = ctx
        .sources
        .get(&node.name)
        .ok_or_else(|| anyhow::anyhow!("source '{}' is not registered", node.name))?;
    let mut input = provider.create_stream().with_context(|| {
        format!(
            "failed to create the stream of source '{}' ({})",
            node.name,
            provider.provider_name()
        )
    })?;
    let schema = node.schema.clone();
    let mut shutdown = ctx.shutdown.clone();

    tracing::debug!(
        name = %ctx.config.name,
        id = node.id,
        source = %node.name,
        provider = provider.provider_name(),
        "create source stream"
    );

    Ok(Box::pin(async_stream::try_stream! {
        loop {
            let item = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => None,
                item = input.next() => item,
            };
            match item {
                Some(dataset) => {
                    let dataset = dataset?;
                    yield DataSet::try_new(schema.clone(), dataset.columns().to_vec())?;
                }
                None => break,
            }
        }
    }))
}
