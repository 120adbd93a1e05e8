mod source;
mod window;

pub use source::LogicalSourcePlan;
pub use window::{
    AggregateCallSpec, LogicalWindowPlan, NullDirection, OrderKeySpec, SortDirection, WindowSpec,
};

pub enum LogicalPlan {
    Source(LogicalSourcePlan),
    Window(LogicalWindowPlan),
}

impl LogicalPlan {
    pub fn source(
        name: impl Into<String>,
        qualifier: Option<String>,
        provider: crate::SourceProviderRef,
    ) -> Self {
        LogicalPlan::Source(LogicalSourcePlan {
            name: name.into(),
            qualifier,
            provider,
        })
    }

    /// Places a window operator with the given window groups on top of this plan.
    pub fn window(self, groups: Vec<WindowSpec>) -> Self {
        LogicalPlan::Window(LogicalWindowPlan {
            input: Box::new(self),
            groups,
        })
    }
}
