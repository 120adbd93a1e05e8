mod explain;
mod source;
mod to_physical;
mod window;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use winq_dataset::SchemaRef;

pub use source::PhysicalSourceNode;
pub use to_physical::translate_window;
pub use window::{AggregateCall, OrderKey, PhysicalWindowNode};

/// Position of a node in [`PhysicalPlan::nodes`].
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicalNode {
    Source(PhysicalSourceNode),
    Window(PhysicalWindowNode),
}

impl PhysicalNode {
    pub fn id(&self) -> NodeId {
        match self {
            PhysicalNode::Source(source) => source.id,
            PhysicalNode::Window(window) => window.id,
        }
    }

    pub fn schema(&self) -> SchemaRef {
        match self {
            PhysicalNode::Source(source) => source.schema.clone(),
            PhysicalNode::Window(window) => window.schema.clone(),
        }
    }

    pub fn inputs(&self) -> Vec<NodeId> {
        match self {
            PhysicalNode::Source(_) => Vec::new(),
            PhysicalNode::Window(window) => vec![window.input],
        }
    }
}

/// A tree of physical nodes stored as an arena, children before their parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalPlan {
    nodes: Vec<PhysicalNode>,
    root: NodeId,
}

impl PhysicalPlan {
    pub fn try_new(nodes: Vec<PhysicalNode>, root: NodeId) -> Result<Self> {
        anyhow::ensure!(
            root < nodes.len(),
            "root node #{} does not exist, the plan has {} nodes",
            root,
            nodes.len()
        );
        for (index, node) in nodes.iter().enumerate() {
            anyhow::ensure!(
                node.id() == index,
                "node #{} is stored at position {}",
                node.id(),
                index
            );
            for input in node.inputs() {
                anyhow::ensure!(
                    input < index,
                    "node #{} refers to input #{} which is not before it",
                    index,
                    input
                );
            }
        }
        Ok(Self { nodes, root })
    }

    #[inline]
    pub fn root(&self) -> &PhysicalNode {
        &self.nodes[self.root]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&PhysicalNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn nodes(&self) -> &[PhysicalNode] {
        &self.nodes
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn source_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, PhysicalNode::Source(_)))
            .count()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).context("failed to serialize physical plan")
    }

    /// Decodes a plan and checks the arena invariants.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let plan: PhysicalPlan =
            bincode::deserialize(data).context("failed to deserialize physical plan")?;
        Self::try_new(plan.nodes, plan.root)
    }
}
