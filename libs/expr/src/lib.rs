mod arg;
mod evaluator;
mod field_ref;
mod func;
mod funcs;
mod signature;

pub use arg::AggregateArg;
pub use evaluator::{FrameEvaluator, FrameMode};
pub use field_ref::FieldRef;
pub use func::{Accumulator, AggregateFunction, Function};
pub use funcs::{find_function, FUNCS};
pub use signature::Signature;
