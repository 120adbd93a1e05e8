use std::collections::BTreeSet;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::logical_plan::LogicalPlan;
use crate::{FrameBound, WindowFrame};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display)]
pub enum SortDirection {
    #[display(fmt = "ASC")]
    Ascending,
    #[display(fmt = "DESC")]
    Descending,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NullDirection {
    First,
    Last,
    /// Nulls sort last for ascending keys and first for descending keys.
    Unspecified,
}

impl NullDirection {
    /// Returns `true` if nulls sort before every other value of a key sorted in `direction`.
    pub fn nulls_first(self, direction: SortDirection) -> bool {
        match self {
            NullDirection::First => true,
            NullDirection::Last => false,
            NullDirection::Unspecified => direction == SortDirection::Descending,
        }
    }
}

/// An order key referring to a field of the input by position.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OrderKeySpec {
    pub index: usize,
    pub direction: SortDirection,
    pub nulls: NullDirection,
}

impl OrderKeySpec {
    pub fn asc(index: usize) -> Self {
        Self {
            index,
            direction: SortDirection::Ascending,
            nulls: NullDirection::Unspecified,
        }
    }

    pub fn desc(index: usize) -> Self {
        Self {
            index,
            direction: SortDirection::Descending,
            nulls: NullDirection::Unspecified,
        }
    }

    pub fn nulls(self, nulls: NullDirection) -> Self {
        Self { nulls, ..self }
    }
}

/// An aggregate call whose arguments refer to fields of the input by position.
///
/// A call without arguments is called with the literal `1`, so `count()` counts rows.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AggregateCallSpec {
    pub function: String,
    pub args: Vec<usize>,
    pub name: String,
}

impl AggregateCallSpec {
    pub fn new(function: impl Into<String>, args: Vec<usize>, name: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            args,
            name: name.into(),
        }
    }
}

/// One window group: the partitioning, ordering and frame shared by a set of aggregate calls.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WindowSpec {
    pub partition_keys: BTreeSet<usize>,
    pub order_keys: Vec<OrderKeySpec>,
    pub aggregate_calls: Vec<AggregateCallSpec>,
    pub frame_start: FrameBound,
    pub frame_end: FrameBound,
}

impl Default for WindowSpec {
    fn default() -> Self {
        let frame = WindowFrame::default();
        Self {
            partition_keys: BTreeSet::new(),
            order_keys: Vec::new(),
            aggregate_calls: Vec::new(),
            frame_start: frame.start,
            frame_end: frame.end,
        }
    }
}

impl WindowSpec {
    pub fn partition_by(mut self, index: usize) -> Self {
        self.partition_keys.insert(index);
        self
    }

    pub fn order_by(mut self, key: OrderKeySpec) -> Self {
        self.order_keys.push(key);
        self
    }

    pub fn aggregate(mut self, call: AggregateCallSpec) -> Self {
        self.aggregate_calls.push(call);
        self
    }

    pub fn frame(self, start: FrameBound, end: FrameBound) -> Self {
        Self {
            frame_start: start,
            frame_end: end,
            ..self
        }
    }

    #[inline]
    pub fn window_frame(&self) -> WindowFrame {
        WindowFrame::new(self.frame_start, self.frame_end)
    }
}

pub struct LogicalWindowPlan {
    pub input: Box<LogicalPlan>,
    /// Only one group is supported, stacked window operators express several.
    pub groups: Vec<WindowSpec>,
}
