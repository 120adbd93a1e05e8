use anyhow::Result;
use derive_more::Display;
use winq_array::{ArrayRef, DataType, Scalar};

use crate::{Accumulator, Function};

/// How the frame of a row relates to its partition.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
pub enum FrameMode {
    /// The frame is every row from the partition start up to the current row.
    #[display(fmt = "running")]
    Running,

    /// The frame is the whole partition.
    #[display(fmt = "whole partition")]
    WholePartition,
}

/// Computes the values of one aggregate call, one partition at a time.
///
/// In [`FrameMode::Running`] every observed row yields its value immediately,
/// in [`FrameMode::WholePartition`] nothing is yielded until [`FrameEvaluator::finalize`].
#[derive(Clone)]
pub struct FrameEvaluator {
    mode: FrameMode,
    accumulator: Box<dyn Accumulator>,
}

impl FrameEvaluator {
    pub fn new(function: &Function, arg_types: &[DataType], mode: FrameMode) -> Self {
        Self {
            mode,
            accumulator: (function.create_accumulator)(arg_types),
        }
    }

    /// Starts a new partition.
    pub fn reset(&mut self) {
        self.accumulator.reset();
    }

    pub fn observe(&mut self, args: &[ArrayRef], row: usize) -> Result<Option<Scalar>> {
        self.accumulator.update(args, row)?;
        Ok(match self.mode {
            FrameMode::Running => Some(self.accumulator.value()),
            FrameMode::WholePartition => None,
        })
    }

    /// Returns the value over every row observed since the last reset.
    pub fn finalize(&self) -> Scalar {
        self.accumulator.value()
    }
}
