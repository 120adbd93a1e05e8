use anyhow::Result;
use winq_array::{ArrayRef, DataType, Scalar};

use crate::Signature;

/// The running state of one aggregate call.
pub trait Accumulator: dyn_clone::DynClone + Send + Sync + 'static {
    /// Restores the state the accumulator was created with.
    fn reset(&mut self);

    /// Folds the row `row` of the argument arrays into the state.
    fn update(&mut self, args: &[ArrayRef], row: usize) -> Result<()>;

    /// Returns the aggregate over all rows folded since the last reset.
    fn value(&self) -> Scalar;
}

dyn_clone::clone_trait_object!(Accumulator);

/// An accumulator defined by an initial state and two plain functions.
#[derive(Clone)]
pub struct AggregateFunction<T>
where
    T: Clone + Send + Sync + 'static,
{
    init: T,
    state: T,
    update: fn(&mut T, &[ArrayRef], usize) -> Result<()>,
    value: fn(&T) -> Scalar,
}

impl<T> AggregateFunction<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        init: T,
        update: fn(&mut T, &[ArrayRef], usize) -> Result<()>,
        value: fn(&T) -> Scalar,
    ) -> Self {
        Self {
            state: init.clone(),
            init,
            update,
            value,
        }
    }
}

impl<T> Accumulator for AggregateFunction<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn reset(&mut self) {
        self.state = self.init.clone();
    }

    fn update(&mut self, args: &[ArrayRef], row: usize) -> Result<()> {
        (self.update)(&mut self.state, args, row)
    }

    fn value(&self) -> Scalar {
        (self.value)(&self.state)
    }
}

pub struct Function {
    pub name: &'static str,
    pub signature: &'static Signature,
    /// Computes the result type from the coerced argument types.
    pub return_type: fn(&[DataType]) -> DataType,
    /// Creates an accumulator for the coerced argument types.
    pub create_accumulator: fn(&[DataType]) -> Box<dyn Accumulator>,
}

impl Function {
    /// Returns the coerced argument types and the result type for arguments of `arg_types`.
    pub fn resolve_types(&self, arg_types: &[DataType]) -> Result<(Vec<DataType>, DataType)> {
        let arg_types = self.signature.data_types(arg_types)?;
        let return_type = (self.return_type)(&arg_types);
        Ok((arg_types, return_type))
    }
}
