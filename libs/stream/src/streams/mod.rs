mod source;
mod window;

use anyhow::Result;
use winq_planner::physical_plan::{NodeId, PhysicalNode};

use crate::stream::{CreateStreamContext, DataSetStream};

pub fn create_stream(ctx: &CreateStreamContext, id: NodeId) -> Result<DataSetStream> {
    let node = ctx
        .plan
        .node(id)
        .ok_or_else(|| anyhow::anyhow!("node #{} does not exist", id))?;
    match node {
        PhysicalNode::Source(source) => source::create_source_stream(ctx, source),
        PhysicalNode::Window(window) => window::create_window_stream(ctx, window),
    }
}
