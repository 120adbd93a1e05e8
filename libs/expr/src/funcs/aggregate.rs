use std::cmp::Ordering;

use anyhow::Result;
use winq_array::{Array, ArrayExt, ArrayRef, DataType, Scalar};

use crate::func::{AggregateFunction, Function};
use crate::Signature;

const NUMERIC: &Signature = &Signature::OneOf(&[
    Signature::Uniform(1, &[DataType::Int64]),
    Signature::Uniform(1, &[DataType::Float64]),
]);

#[derive(Clone)]
struct SumState {
    sum: Scalar,
    empty: Scalar,
}

fn sum_update(state: &mut SumState, args: &[ArrayRef], row: usize) -> Result<()> {
    let value = args[0].scalar_value(row);
    state.sum = match (&state.sum, value) {
        (_, Scalar::Null) => return Ok(()),
        (Scalar::Null, value) => value,
        (Scalar::Int64(a), Scalar::Int64(b)) => Scalar::Int64(
            a.checked_add(b)
                .ok_or_else(|| anyhow::anyhow!("integer overflow in sum: {} + {}", a, b))?,
        ),
        (Scalar::Float64(a), Scalar::Float64(b)) => Scalar::Float64(a + b),
        (sum, value) => anyhow::bail!(
            "cannot add a value of type '{}' to a sum of type '{}'",
            value.data_type(),
            sum.data_type()
        ),
    };
    Ok(())
}

fn sum_value(state: &SumState) -> Scalar {
    if state.sum.is_null() {
        state.empty.clone()
    } else {
        state.sum.clone()
    }
}

fn zero_of(data_type: DataType) -> Scalar {
    match data_type {
        DataType::Float64 => Scalar::Float64(0.0),
        _ => Scalar::Int64(0),
    }
}

pub const SUM: Function = Function {
    name: "sum",
    signature: NUMERIC,
    return_type: |args| args[0],
    create_accumulator: |_| {
        Box::new(AggregateFunction::new(
            SumState {
                sum: Scalar::Null,
                empty: Scalar::Null,
            },
            sum_update,
            sum_value,
        ))
    },
};

pub const SUM0: Function = Function {
    name: "$sum0",
    signature: NUMERIC,
    return_type: |args| args[0],
    create_accumulator: |args| {
        Box::new(AggregateFunction::new(
            SumState {
                sum: Scalar::Null,
                empty: zero_of(args[0]),
            },
            sum_update,
            sum_value,
        ))
    },
};

pub const COUNT: Function = Function {
    name: "count",
    signature: &Signature::Any(1),
    return_type: |_| DataType::Int64,
    create_accumulator: |_| {
        Box::new(AggregateFunction::<i64>::new(
            0,
            |state, args, row| {
                if args[0].is_valid(row) {
                    *state += 1;
                }
                Ok(())
            },
            |state| Scalar::Int64(*state),
        ))
    },
};

pub const AVG: Function = Function {
    name: "avg",
    signature: NUMERIC,
    return_type: |_| DataType::Float64,
    create_accumulator: |_| {
        Box::new(AggregateFunction::<(f64, i64)>::new(
            (0.0, 0),
            |state, args, row| {
                match args[0].scalar_value(row) {
                    Scalar::Null => {}
                    Scalar::Int64(value) => {
                        state.0 += value as f64;
                        state.1 += 1;
                    }
                    Scalar::Float64(value) => {
                        state.0 += value;
                        state.1 += 1;
                    }
                    value => anyhow::bail!("cannot average a value of type '{}'", value.data_type()),
                }
                Ok(())
            },
            |state| {
                if state.1 == 0 {
                    Scalar::Null
                } else {
                    Scalar::Float64(state.0 / state.1 as f64)
                }
            },
        ))
    },
};

const ORDERED: &Signature = &Signature::Uniform(
    1,
    &[
        DataType::Float64,
        DataType::Float32,
        DataType::Int64,
        DataType::Int32,
        DataType::Int16,
        DataType::Int8,
        DataType::Boolean,
        DataType::Timestamp(None),
        DataType::String,
    ],
);

fn keep_extreme(state: &mut Scalar, args: &[ArrayRef], row: usize, keep: Ordering) -> Result<()> {
    let value = args[0].scalar_value(row);
    if value.is_null() {
        return Ok(());
    }
    if state.is_null() {
        *state = value;
        return Ok(());
    }
    match value.partial_cmp_value(state) {
        Some(ordering) if ordering == keep => *state = value,
        Some(_) => {}
        // NaN never replaces the current extreme
        None if value.data_type() == state.data_type() => {}
        None => anyhow::bail!(
            "cannot compare a value of type '{}' with '{}'",
            value.data_type(),
            state.data_type()
        ),
    }
    Ok(())
}

pub const MIN: Function = Function {
    name: "min",
    signature: ORDERED,
    return_type: |args| args[0],
    create_accumulator: |_| {
        Box::new(AggregateFunction::<Scalar>::new(
            Scalar::Null,
            |state, args, row| keep_extreme(state, args, row, Ordering::Less),
            Clone::clone,
        ))
    },
};

pub const MAX: Function = Function {
    name: "max",
    signature: ORDERED,
    return_type: |args| args[0],
    create_accumulator: |_| {
        Box::new(AggregateFunction::<Scalar>::new(
            Scalar::Null,
            |state, args, row| keep_extreme(state, args, row, Ordering::Greater),
            Clone::clone,
        ))
    },
};
