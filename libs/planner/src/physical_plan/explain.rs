use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::physical_plan::{AggregateCall, NodeId, OrderKey, PhysicalNode, PhysicalPlan};

impl Display for OrderKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} NULLS {}",
            self.field,
            self.direction,
            if self.nulls_first { "FIRST" } else { "LAST" }
        )
    }
}

impl Display for AggregateCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) AS {}: {}",
            self.function,
            self.args.iter().join(", "),
            self.name,
            self.return_type
        )
    }
}

fn explain_node(
    f: &mut Formatter<'_>,
    plan: &PhysicalPlan,
    id: NodeId,
    depth: usize,
) -> fmt::Result {
    let node = match plan.node(id) {
        Some(node) => node,
        None => return writeln!(f, "{:indent$}<missing node #{}>", "", id, indent = depth * 2),
    };

    write!(f, "{:indent$}", "", indent = depth * 2)?;
    match node {
        PhysicalNode::Source(source) => writeln!(
            f,
            "Source #{}: name={}, fields=[{}]",
            source.id,
            source.name,
            source
                .schema
                .fields()
                .iter()
                .map(|field| field.qualified_name())
                .join(", ")
        )?,
        PhysicalNode::Window(window) => writeln!(
            f,
            "Window #{}: partition_by=[{}], order_by=[{}], frame={}, aggregates=[{}]",
            window.id,
            window.partition_keys.iter().join(", "),
            window.order_keys.iter().join(", "),
            window.frame(),
            window.aggregate_calls.iter().join(", ")
        )?,
    }

    for input in node.inputs() {
        explain_node(f, plan, input, depth + 1)?;
    }
    Ok(())
}

impl Display for PhysicalPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        explain_node(f, self, self.root().id(), 0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use winq_array::DataType;
    use winq_dataset::{Field, Schema};

    use crate::logical_plan::{AggregateCallSpec, OrderKeySpec, WindowSpec};
    use crate::physical_plan::{translate_window, PhysicalSourceNode};

    use super::*;

    #[test]
    fn test_explain() {
        let schema = Arc::new(
            Schema::try_new(vec![
                Field::new("k", DataType::String),
                Field::new("v", DataType::Int64),
            ])
            .unwrap(),
        );
        let spec = WindowSpec::default()
            .partition_by(0)
            .order_by(OrderKeySpec::desc(1))
            .aggregate(AggregateCallSpec::new("sum", vec![1], "total"))
            .aggregate(AggregateCallSpec::new("count", vec![], "n"));
        let window = translate_window(1, 0, &schema, &[spec]).unwrap();
        let plan = PhysicalPlan::try_new(
            vec![
                PhysicalNode::Source(PhysicalSourceNode {
                    id: 0,
                    name: "t".to_string(),
                    schema,
                }),
                PhysicalNode::Window(window),
            ],
            1,
        )
        .unwrap();

        assert_eq!(
            plan.to_string(),
            "Window #1: partition_by=[k#0], order_by=[v#1 DESC NULLS FIRST], \
             frame=rows between unbounded preceding and current row, \
             aggregates=[sum(v#1) AS total: int64, count(1) AS n: int64]\n  \
             Source #0: name=t, fields=[k, v]\n"
        );
    }

    #[test]
    fn test_invalid_arena() {
        let schema = Arc::new(Schema::try_new(vec![Field::new("k", DataType::String)]).unwrap());
        let source = PhysicalNode::Source(PhysicalSourceNode {
            id: 1,
            name: "t".to_string(),
            schema,
        });
        assert!(PhysicalPlan::try_new(vec![source.clone()], 0).is_err());
        assert!(PhysicalPlan::try_new(vec![source], 1).is_err());
    }
}
