use serde::{Deserialize, Serialize};
use winq_array::DataType;
use winq_dataset::SchemaRef;
use winq_expr::{AggregateArg, FieldRef};

use crate::logical_plan::SortDirection;
use crate::physical_plan::NodeId;
use crate::{FrameBound, WindowFrame};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderKey {
    pub field: FieldRef,
    pub direction: SortDirection,
    pub nulls_first: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCall {
    /// Lower-cased function name.
    pub function: String,
    pub args: Vec<AggregateArg>,
    /// The types `args` are cast to before they are passed to the function.
    pub arg_types: Vec<DataType>,
    pub name: String,
    pub return_type: DataType,
}

/// A window operator with every field reference resolved against its input.
///
/// The output schema is the input schema followed by one field per aggregate call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalWindowNode {
    pub id: NodeId,
    pub input: NodeId,
    pub schema: SchemaRef,
    pub partition_keys: Vec<FieldRef>,
    pub order_keys: Vec<OrderKey>,
    pub aggregate_calls: Vec<AggregateCall>,
    pub frame_start: FrameBound,
    pub frame_end: FrameBound,
}

impl PhysicalWindowNode {
    #[inline]
    pub fn frame(&self) -> WindowFrame {
        WindowFrame::new(self.frame_start, self.frame_end)
    }
}
