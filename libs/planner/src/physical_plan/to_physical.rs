use std::sync::Arc;

use anyhow::{Context as _, Result};
use itertools::Itertools;
use winq_array::Scalar;
use winq_dataset::{Field, Schema};
use winq_expr::{find_function, AggregateArg, FieldRef};

use crate::logical_plan::{
    AggregateCallSpec, LogicalPlan, LogicalSourcePlan, LogicalWindowPlan, OrderKeySpec,
    WindowSpec,
};
use crate::physical_plan::{
    AggregateCall, NodeId, OrderKey, PhysicalNode, PhysicalPlan, PhysicalSourceNode,
    PhysicalWindowNode,
};
use crate::PlanError;

/// Functions whose value depends on the frame ends rather than on a fold over the frame.
const FRAME_FUNCTIONS: &[&str] = &["first_value", "last_value", "first", "last"];

#[derive(Default)]
struct Context {
    nodes: Vec<PhysicalNode>,
}

impl Context {
    #[inline]
    fn next_id(&self) -> NodeId {
        self.nodes.len()
    }

    fn push(&mut self, node: PhysicalNode) -> NodeId {
        let id = node.id();
        self.nodes.push(node);
        id
    }
}

fn to_physical(ctx: &mut Context, plan: LogicalPlan) -> Result<NodeId> {
    match plan {
        LogicalPlan::Source(source) => source_to_physical(ctx, source),
        LogicalPlan::Window(window) => window_to_physical(ctx, window),
    }
}

fn source_to_physical(ctx: &mut Context, source: LogicalSourcePlan) -> Result<NodeId> {
    let schema = source.provider.schema().with_context(|| {
        format!(
            "failed to get the schema of source '{}' ({})",
            source.name,
            source.provider.provider_name()
        )
    })?;
    let schema = Arc::new(Schema::try_new(
        schema
            .fields()
            .iter()
            .cloned()
            .map(|mut field| {
                field.qualifier = source.qualifier.clone();
                field
            })
            .collect(),
    )?);
    let id = ctx.next_id();
    Ok(ctx.push(PhysicalNode::Source(PhysicalSourceNode {
        id,
        name: source.name,
        schema,
    })))
}

fn window_to_physical(ctx: &mut Context, window: LogicalWindowPlan) -> Result<NodeId> {
    let input = to_physical(ctx, *window.input)?;
    let input_schema = ctx.nodes[input].schema();
    let node = translate_window(ctx.next_id(), input, &input_schema, &window.groups)?;
    Ok(ctx.push(PhysicalNode::Window(node)))
}

fn resolve_field(schema: &Schema, index: usize) -> Result<FieldRef> {
    FieldRef::resolve(schema, index).ok_or_else(|| {
        PlanError::UnresolvedFieldReference {
            index,
            field_count: schema.len(),
        }
        .into()
    })
}

fn resolve_order_key(schema: &Schema, key: &OrderKeySpec) -> Result<OrderKey> {
    Ok(OrderKey {
        field: resolve_field(schema, key.index)?,
        direction: key.direction,
        nulls_first: key.nulls.nulls_first(key.direction),
    })
}

fn resolve_aggregate_call(schema: &Schema, call: &AggregateCallSpec) -> Result<AggregateCall> {
    let function_name = call.function.to_lowercase();
    if FRAME_FUNCTIONS.contains(&function_name.as_str()) {
        return Err(PlanError::UnsupportedFrameFunction {
            name: function_name,
        }
        .into());
    }
    let function = find_function(&function_name).ok_or_else(|| PlanError::UnknownFunction {
        name: function_name.clone(),
    })?;

    let args: Vec<AggregateArg> = if call.args.is_empty() {
        vec![AggregateArg::Literal(Scalar::Int64(1))]
    } else {
        call.args
            .iter()
            .map(|index| resolve_field(schema, *index).map(AggregateArg::Column))
            .try_collect()?
    };

    let (arg_types, return_type) = function
        .resolve_types(&args.iter().map(AggregateArg::data_type).collect::<Vec<_>>())
        .with_context(|| {
            format!(
                "invalid arguments for '{}({})'",
                function_name,
                args.iter().join(", ")
            )
        })?;

    Ok(AggregateCall {
        function: function_name,
        args,
        arg_types,
        name: call.name.clone(),
        return_type,
    })
}

/// Resolves the single window group of a window operator against the schema of its input.
///
/// The translation is pure: the same inputs always produce the same node.
pub fn translate_window(
    id: NodeId,
    input: NodeId,
    input_schema: &Schema,
    groups: &[WindowSpec],
) -> Result<PhysicalWindowNode> {
    let spec = match groups {
        [] => return Err(PlanError::MissingWindowGroup.into()),
        [spec] => spec,
        _ => {
            return Err(PlanError::MultipleWindowGroupsUnsupported {
                count: groups.len(),
            }
            .into())
        }
    };

    spec.window_frame().mode(!spec.order_keys.is_empty())?;

    let partition_keys: Vec<FieldRef> = spec
        .partition_keys
        .iter()
        .map(|index| resolve_field(input_schema, *index))
        .try_collect()?;
    let order_keys: Vec<OrderKey> = spec
        .order_keys
        .iter()
        .map(|key| resolve_order_key(input_schema, key))
        .try_collect()?;
    let aggregate_calls: Vec<AggregateCall> = spec
        .aggregate_calls
        .iter()
        .map(|call| resolve_aggregate_call(input_schema, call))
        .try_collect()?;

    let schema = Arc::new(
        input_schema.try_append(
            aggregate_calls
                .iter()
                .map(|call| Field::new(call.name.clone(), call.return_type)),
        )?,
    );

    Ok(PhysicalWindowNode {
        id,
        input,
        schema,
        partition_keys,
        order_keys,
        aggregate_calls,
        frame_start: spec.frame_start,
        frame_end: spec.frame_end,
    })
}

impl LogicalPlan {
    pub fn into_physical(self) -> Result<PhysicalPlan> {
        let mut ctx = Context::default();
        let root = to_physical(&mut ctx, self)?;
        PhysicalPlan::try_new(ctx.nodes, root)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use futures_util::stream::BoxStream;
    use winq_array::DataType;
    use winq_dataset::{DataSet, SchemaRef};

    use super::*;
    use crate::logical_plan::{NullDirection, SortDirection};
    use crate::{FrameBound, SourceProvider, UnsupportedFrameError};

    struct TestSource;

    impl SourceProvider for TestSource {
        fn provider_name(&self) -> &'static str {
            "test"
        }

        fn schema(&self) -> Result<SchemaRef> {
            Ok(Arc::new(Schema::try_new(vec![
                Field::new("k", DataType::String),
                Field::new("t", DataType::Int64),
                Field::new("v", DataType::Int32),
                Field::new("f", DataType::Float64),
            ])?))
        }

        fn create_stream(&self) -> Result<BoxStream<'static, Result<DataSet>>> {
            Ok(Box::pin(futures_util::stream::empty()))
        }
    }

    fn input_schema() -> SchemaRef {
        TestSource.schema().unwrap()
    }

    fn running_sum() -> WindowSpec {
        WindowSpec::default()
            .partition_by(0)
            .order_by(OrderKeySpec::asc(1))
            .aggregate(AggregateCallSpec::new("SUM", vec![2], "total"))
    }

    fn plan_error(err: anyhow::Error) -> PlanError {
        err.downcast_ref::<PlanError>()
            .cloned()
            .unwrap_or_else(|| panic!("not a plan error: {}", err))
    }

    #[test]
    fn test_translate_window() {
        let spec = running_sum()
            .order_by(OrderKeySpec::desc(3))
            .order_by(OrderKeySpec::asc(2).nulls(NullDirection::First))
            .aggregate(AggregateCallSpec::new("Count", vec![], "n"))
            .aggregate(AggregateCallSpec::new("avg", vec![3], "mean"));
        let node = translate_window(1, 0, &input_schema(), &[spec]).unwrap();

        assert_eq!(node.id, 1);
        assert_eq!(node.input, 0);
        assert_eq!(
            node.partition_keys,
            vec![FieldRef {
                index: 0,
                name: "k".to_string(),
                data_type: DataType::String,
            }]
        );

        let order_keys = node
            .order_keys
            .iter()
            .map(|key| (key.field.index, key.direction, key.nulls_first))
            .collect::<Vec<_>>();
        assert_eq!(
            order_keys,
            vec![
                (1, SortDirection::Ascending, false),
                (3, SortDirection::Descending, true),
                (2, SortDirection::Ascending, true),
            ]
        );

        let calls = &node.aggregate_calls;
        assert_eq!(calls[0].function, "sum");
        assert_eq!(calls[0].arg_types, vec![DataType::Int64]);
        assert_eq!(calls[0].return_type, DataType::Int64);
        assert_eq!(calls[1].function, "count");
        assert_eq!(calls[1].args, vec![AggregateArg::Literal(Scalar::Int64(1))]);
        assert_eq!(calls[1].return_type, DataType::Int64);
        assert_eq!(calls[2].return_type, DataType::Float64);

        let names = node
            .schema
            .fields()
            .iter()
            .map(|field| field.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["k", "t", "v", "f", "total", "n", "mean"]);
        assert_eq!(node.frame().start, FrameBound::UnboundedPreceding);
        assert_eq!(node.frame().end, FrameBound::CurrentRow);
    }

    #[test]
    fn test_translate_is_deterministic() {
        let schema = input_schema();
        let a = translate_window(1, 0, &schema, &[running_sum()]).unwrap();
        let b = translate_window(1, 0, &schema, &[running_sum()]).unwrap();
        assert_eq!(a, b);
        assert_eq!(bincode::serialize(&a).unwrap(), bincode::serialize(&b).unwrap());
    }

    #[test]
    fn test_window_group_count() {
        let schema = input_schema();
        let err = translate_window(1, 0, &schema, &[running_sum(), running_sum()]).unwrap_err();
        assert_eq!(
            plan_error(err),
            PlanError::MultipleWindowGroupsUnsupported { count: 2 }
        );

        let err = translate_window(1, 0, &schema, &[]).unwrap_err();
        assert_eq!(plan_error(err), PlanError::MissingWindowGroup);
    }

    #[test]
    fn test_unresolved_field() {
        let schema = input_schema();

        let err = translate_window(1, 0, &schema, &[running_sum().partition_by(9)]).unwrap_err();
        assert_eq!(
            plan_error(err),
            PlanError::UnresolvedFieldReference {
                index: 9,
                field_count: 4
            }
        );

        let spec = running_sum().aggregate(AggregateCallSpec::new("max", vec![4], "m"));
        let err = translate_window(1, 0, &schema, &[spec]).unwrap_err();
        assert_eq!(
            plan_error(err),
            PlanError::UnresolvedFieldReference {
                index: 4,
                field_count: 4
            }
        );
    }

    #[test]
    fn test_unsupported_frame() {
        let spec = running_sum().frame(FrameBound::Preceding(3), FrameBound::CurrentRow);
        let err = translate_window(1, 0, &input_schema(), &[spec]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<UnsupportedFrameError>(),
            Some(&UnsupportedFrameError {
                start: FrameBound::Preceding(3),
                end: FrameBound::CurrentRow,
            })
        );
    }

    #[test]
    fn test_unsupported_functions() {
        let schema = input_schema();

        let spec = running_sum().aggregate(AggregateCallSpec::new("FIRST_VALUE", vec![2], "fv"));
        let err = translate_window(1, 0, &schema, &[spec]).unwrap_err();
        assert_eq!(
            plan_error(err),
            PlanError::UnsupportedFrameFunction {
                name: "first_value".to_string()
            }
        );

        let spec = running_sum().aggregate(AggregateCallSpec::new("median", vec![2], "m"));
        let err = translate_window(1, 0, &schema, &[spec]).unwrap_err();
        assert_eq!(
            plan_error(err),
            PlanError::UnknownFunction {
                name: "median".to_string()
            }
        );

        let spec = running_sum().aggregate(AggregateCallSpec::new("sum", vec![0], "s"));
        assert!(translate_window(1, 0, &schema, &[spec]).is_err());
    }

    #[test]
    fn test_into_physical() {
        let plan = LogicalPlan::source("t", Some("t".to_string()), Arc::new(TestSource))
            .window(vec![running_sum()])
            .into_physical()
            .unwrap();

        assert_eq!(plan.node_count(), 2);
        assert_eq!(plan.source_count(), 1);
        assert_eq!(plan.root().id(), 1);
        assert_eq!(plan.root().inputs(), vec![0]);
        assert_eq!(
            plan.root().schema().fields()[0].qualifier.as_deref(),
            Some("t")
        );

        let data = plan.to_bytes().unwrap();
        assert_eq!(PhysicalPlan::from_bytes(&data).unwrap(), plan);
    }

    #[test]
    fn test_stacked_windows() {
        let plan = LogicalPlan::source("t", None, Arc::new(TestSource))
            .window(vec![running_sum()])
            .window(vec![WindowSpec::default()
                .frame(FrameBound::UnboundedPreceding, FrameBound::UnboundedFollowing)
                .aggregate(AggregateCallSpec::new("max", vec![4], "max_total"))])
            .into_physical()
            .unwrap();

        assert_eq!(plan.node_count(), 3);
        match plan.root() {
            PhysicalNode::Window(window) => {
                assert_eq!(window.input, 1);
                assert_eq!(window.aggregate_calls[0].args[0].to_string(), "total#4");
                assert_eq!(window.schema.len(), 6);
            }
            PhysicalNode::Source(_) => panic!("expect a window node"),
        }
    }
}
