use ahash::AHashSet;
use anyhow::{Context, Result};
use derive_more::Display;
use itertools::Itertools;
use tokio_stream::StreamExt;
use winq_array::{compute, ArrayExt, ArrayRef, DataType, Scalar};
use winq_dataset::{DataSet, SchemaRef};
use winq_expr::{find_function, AggregateArg, FieldRef, FrameEvaluator, FrameMode};
use winq_planner::physical_plan::{NodeId, OrderKey, PhysicalWindowNode};

use crate::dataset::{compare_order_values, DataSetExt, GroupedKey};
use crate::stream::{shutdown_requested, CreateStreamContext, DataSetStream};
use crate::streams::create_stream;
use crate::{ExecutionCancelled, ExecutionResourceError, StreamConfigRef};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
enum State {
    #[display(fmt = "unstarted")]
    Unstarted,
    #[display(fmt = "accumulating")]
    Accumulating,
    #[display(fmt = "emitting")]
    Emitting,
    #[display(fmt = "done")]
    Done,
}

struct CallState {
    args: Vec<AggregateArg>,
    arg_types: Vec<DataType>,
    return_type: DataType,
    evaluator: FrameEvaluator,
}

struct OpenPartition {
    key: GroupedKey,
    last_order: Option<Vec<Scalar>>,
    /// Rows of this partition waiting for its value, in input order.
    buffered: Vec<DataSet>,
    buffered_bytes: usize,
}

struct ClosedPartition {
    buffered: Vec<DataSet>,
    values: Vec<Scalar>,
}

/// Computes the aggregate columns of a window operator over input sorted by
/// its partition and order keys.
pub struct WindowManager {
    config: StreamConfigRef,
    id: NodeId,
    schema: SchemaRef,
    mode: FrameMode,
    partition_keys: Vec<FieldRef>,
    order_keys: Vec<OrderKey>,
    calls: Vec<CallState>,
    state: State,
    partition: Option<OpenPartition>,
    partition_count: usize,
    closed_keys: AHashSet<GroupedKey>,
    closed_key_bytes: usize,
}

impl WindowManager {
    pub fn try_new(config: StreamConfigRef, node: &PhysicalWindowNode) -> Result<Self> {
        let mode = node.frame().mode(!node.order_keys.is_empty())?;
        anyhow::ensure!(
            node.schema.len() >= node.aggregate_calls.len(),
            "window #{} outputs {} columns but has {} aggregate calls",
            node.id,
            node.schema.len(),
            node.aggregate_calls.len()
        );
        let output_offset = node.schema.len() - node.aggregate_calls.len();
        let calls = node
            .aggregate_calls
            .iter()
            .enumerate()
            .map(|(index, call)| {
                let function = find_function(&call.function).ok_or_else(|| {
                    anyhow::anyhow!("unknown aggregate function: '{}'", call.function)
                })?;
                anyhow::ensure!(
                    call.args.len() == call.arg_types.len(),
                    "window #{} call '{}' has {} arguments but {} argument types",
                    node.id,
                    call,
                    call.args.len(),
                    call.arg_types.len()
                );
                let (arg_types, return_type) = function
                    .resolve_types(
                        &call
                            .args
                            .iter()
                            .map(AggregateArg::data_type)
                            .collect::<Vec<_>>(),
                    )
                    .with_context(|| {
                        format!("invalid arguments for '{}' in window #{}", call, node.id)
                    })?;
                anyhow::ensure!(
                    arg_types == call.arg_types && return_type == call.return_type,
                    "window #{} call '{}' resolves to ({}) -> {}, not ({}) -> {}",
                    node.id,
                    call,
                    arg_types.iter().join(", "),
                    return_type,
                    call.arg_types.iter().join(", "),
                    call.return_type
                );
                let output_type = node
                    .schema
                    .field_at(output_offset + index)
                    .map(|field| field.data_type);
                anyhow::ensure!(
                    output_type == Some(return_type),
                    "window #{} outputs call '{}' as {:?}, not {}",
                    node.id,
                    call,
                    output_type,
                    return_type
                );

                Ok::<_, anyhow::Error>(CallState {
                    args: call.args.clone(),
                    arg_types: call.arg_types.clone(),
                    return_type: call.return_type,
                    evaluator: FrameEvaluator::new(function, &call.arg_types, mode),
                })
            })
            .try_collect()?;

        tracing::debug!(
            name = %config.name,
            id = node.id,
            frame = %node.frame(),
            mode = %mode,
            calls = node.aggregate_calls.len(),
            "create window stream"
        );

        Ok(Self {
            config,
            id: node.id,
            schema: node.schema.clone(),
            mode,
            partition_keys: node.partition_keys.clone(),
            order_keys: node.order_keys.clone(),
            calls,
            state: State::Unstarted,
            partition: None,
            partition_count: 0,
            closed_keys: AHashSet::new(),
            closed_key_bytes: 0,
        })
    }

    fn set_state(&mut self, state: State) {
        if self.state != state {
            tracing::trace!(
                name = %self.config.name,
                id = self.id,
                from = %self.state,
                to = %state,
                "window state changed"
            );
            self.state = state;
        }
    }

    /// Processes one input dataset and returns the rows whose values are known.
    ///
    /// On error every buffered row is released and the manager is done.
    pub fn process(&mut self, dataset: &DataSet) -> Result<Vec<DataSet>> {
        let res = self.process_dataset(dataset);
        if res.is_err() {
            self.release();
        }
        res
    }

    fn process_dataset(&mut self, dataset: &DataSet) -> Result<Vec<DataSet>> {
        anyhow::ensure!(
            self.state != State::Done,
            "window #{} has already finished",
            self.id
        );
        if dataset.is_empty() {
            return Ok(Vec::new());
        }
        self.set_state(State::Accumulating);

        let keys = dataset.partition_keys(&self.partition_keys)?;
        let args = self
            .calls
            .iter()
            .map(|call| {
                call.args
                    .iter()
                    .zip(&call.arg_types)
                    .map(|(arg, data_type)| arg.eval(dataset, *data_type))
                    .try_collect::<_, Vec<_>, _>()
            })
            .try_collect::<_, Vec<_>, _>()?;
        let order_columns = if self.config.verify_input_order {
            Some(dataset.order_columns(&self.order_keys)?)
        } else {
            None
        };

        match self.mode {
            FrameMode::Running => self.process_running(dataset, &keys, &args, &order_columns),
            FrameMode::WholePartition => {
                self.process_whole_partition(dataset, &keys, &args, &order_columns)
            }
        }
    }

    fn process_running(
        &mut self,
        dataset: &DataSet,
        keys: &[GroupedKey],
        args: &[Vec<ArrayRef>],
        order_columns: &Option<Vec<ArrayRef>>,
    ) -> Result<Vec<DataSet>> {
        let mut values = (0..self.calls.len())
            .map(|_| Vec::with_capacity(dataset.len()))
            .collect::<Vec<_>>();

        for (row, key) in keys.iter().enumerate() {
            self.advance(key, order_values(order_columns, row))?;
            for ((call, args), values) in self.calls.iter_mut().zip(args).zip(&mut values) {
                values.push(call.evaluator.observe(args, row)?.unwrap_or_default());
            }
        }

        self.set_state(State::Emitting);
        let output = self.with_values(dataset, values)?;
        self.set_state(State::Accumulating);
        Ok(vec![output])
    }

    fn process_whole_partition(
        &mut self,
        dataset: &DataSet,
        keys: &[GroupedKey],
        args: &[Vec<ArrayRef>],
        order_columns: &Option<Vec<ArrayRef>>,
    ) -> Result<Vec<DataSet>> {
        let mut outputs = Vec::new();
        let mut values = (0..self.calls.len())
            .map(|_| Vec::with_capacity(dataset.len()))
            .collect::<Vec<_>>();
        // rows before `start` belong to partitions closed by this dataset
        let mut start = 0;

        for (row, key) in keys.iter().enumerate() {
            if let Some(closed) = self.advance(key, order_values(order_columns, row))? {
                self.set_state(State::Emitting);
                for buffered in &closed.buffered {
                    outputs.push(self.with_constant_values(buffered, &closed.values)?);
                }
                for (values, value) in values.iter_mut().zip(&closed.values) {
                    values.extend(std::iter::repeat(value).take(row - start).cloned());
                }
                start = row;
                self.set_state(State::Accumulating);
            }
            for (call, args) in self.calls.iter_mut().zip(args) {
                call.evaluator.observe(args, row)?;
            }
        }

        if start > 0 {
            outputs.push(self.with_values(&dataset.slice(0, start), values)?);
        }
        if start < dataset.len() {
            self.buffer(dataset.slice(start, dataset.len() - start))?;
        }
        Ok(outputs)
    }

    /// Moves to the next row, opening a new partition if `key` differs from the
    /// key of the open partition.
    ///
    /// Returns the partition closed by this row.
    fn advance(
        &mut self,
        key: &GroupedKey,
        order_values: Option<Vec<Scalar>>,
    ) -> Result<Option<ClosedPartition>> {
        if let Some(partition) = self
            .partition
            .as_mut()
            .filter(|partition| &partition.key == key)
        {
            if let (Some(last), Some(current)) = (&partition.last_order, &order_values) {
                anyhow::ensure!(
                    compare_order_values(&self.order_keys, last, current).is_le(),
                    "the input of window #{} is not sorted by its order keys",
                    self.id
                );
            }
            partition.last_order = order_values;
            return Ok(None);
        }

        if self.config.verify_input_order {
            anyhow::ensure!(
                !self.closed_keys.contains(key),
                "the input of window #{} is not sorted by its partition keys, partition {:?} appears again",
                self.id,
                key
            );
        }

        let values = self
            .calls
            .iter()
            .map(|call| call.evaluator.finalize())
            .collect();
        let closed = self.partition.replace(OpenPartition {
            key: key.clone(),
            last_order: order_values,
            buffered: Vec::new(),
            buffered_bytes: 0,
        });
        for call in &mut self.calls {
            call.evaluator.reset();
        }
        self.partition_count += 1;

        tracing::debug!(
            name = %self.config.name,
            id = self.id,
            partitions = self.partition_count,
            "open partition"
        );

        let closed = match closed {
            Some(closed) => closed,
            None => return Ok(None),
        };
        if self.config.verify_input_order {
            self.closed_key_bytes += closed.key.memory_size();
            self.closed_keys.insert(closed.key);
            self.check_memory_limit()?;
        }
        Ok(Some(ClosedPartition {
            buffered: closed.buffered,
            values,
        }))
    }

    fn buffer(&mut self, dataset: DataSet) -> Result<()> {
        if let Some(partition) = &mut self.partition {
            partition.buffered_bytes += dataset.memory_size();
            partition.buffered.push(dataset);
        }
        self.check_memory_limit()
    }

    /// The buffered rows of the open partition and the remembered closed keys
    /// share the memory limit.
    fn check_memory_limit(&self) -> Result<()> {
        let limit = self.config.memory_limit;
        let partition_bytes = self
            .partition
            .as_ref()
            .map(|partition| partition.buffered_bytes)
            .unwrap_or_default();
        let closed_key_bytes = self.closed_key_bytes;

        if partition_bytes + closed_key_bytes > limit {
            tracing::warn!(
                name = %self.config.name,
                id = self.id,
                partition_bytes,
                closed_key_bytes,
                limit,
                "window exceeds the memory limit"
            );
            return Err(ExecutionResourceError {
                partition_bytes,
                closed_key_bytes,
                limit,
            }
            .into());
        }
        Ok(())
    }

    fn with_values(&self, dataset: &DataSet, values: Vec<Vec<Scalar>>) -> Result<DataSet> {
        let columns = self
            .calls
            .iter()
            .zip(values)
            .map(|(call, values)| compute::from_scalars(call.return_type, &values))
            .try_collect::<_, Vec<_>, _>()?;
        dataset.with_columns(self.schema.clone(), columns)
    }

    fn with_constant_values(&self, dataset: &DataSet, values: &[Scalar]) -> Result<DataSet> {
        let columns = self
            .calls
            .iter()
            .zip(values)
            .map(|(call, value)| value.to_array(call.return_type, dataset.len()))
            .try_collect::<_, Vec<_>, _>()?;
        dataset.with_columns(self.schema.clone(), columns)
    }

    /// Closes the open partition after the input ended.
    pub fn finish(&mut self) -> Result<Vec<DataSet>> {
        let mut outputs = Vec::new();
        if let Some(partition) = self.partition.take() {
            self.set_state(State::Emitting);
            let values = self
                .calls
                .iter()
                .map(|call| call.evaluator.finalize())
                .collect::<Vec<_>>();
            for buffered in &partition.buffered {
                outputs.push(self.with_constant_values(buffered, &values)?);
            }
        }
        self.closed_keys.clear();
        self.closed_key_bytes = 0;
        self.set_state(State::Done);

        tracing::debug!(
            name = %self.config.name,
            id = self.id,
            partitions = self.partition_count,
            "window finished"
        );
        Ok(outputs)
    }

    pub fn cancel(&mut self) {
        tracing::warn!(name = %self.config.name, id = self.id, "window cancelled");
        self.release();
    }

    fn release(&mut self) {
        self.partition = None;
        self.closed_keys.clear();
        self.closed_key_bytes = 0;
        for call in &mut self.calls {
            call.evaluator.reset();
        }
        self.set_state(State::Done);
    }
}

fn order_values(order_columns: &Option<Vec<ArrayRef>>, row: usize) -> Option<Vec<Scalar>> {
    order_columns
        .as_ref()
        .map(|columns| columns.iter().map(|column| column.scalar_value(row)).collect())
}

pub fn create_window_stream(
    ctx: &CreateStreamContext,
    node: &PhysicalWindowNode,
) -> Result<DataSetStream> {
    let mut manager = WindowManager::try_new(ctx.config.clone(), node)?;
    let mut input = create_stream(ctx, node.input)?;
    let mut shutdown = ctx.shutdown.clone();

    Ok(Box::pin(async_stream::try_stream! {
        loop {
            let item = tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => {
                    manager.cancel();
                    Err(anyhow::Error::new(ExecutionCancelled))
                }
                item = input.next() => item.transpose(),
            };
            match item? {
                Some(dataset) => {
                    for dataset in manager.process(&dataset)? {
                        yield dataset;
                    }
                }
                None => {
                    for dataset in manager.finish()? {
                        yield dataset;
                    }
                    break;
                }
            }
        }
    }))
}
