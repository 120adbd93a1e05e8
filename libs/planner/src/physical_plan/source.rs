use serde::{Deserialize, Serialize};
use winq_dataset::SchemaRef;

use crate::physical_plan::NodeId;

/// Reads a source registered under `name` on the executing worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSourceNode {
    pub id: NodeId,
    pub name: String,
    pub schema: SchemaRef,
}
