use std::any::Any;

pub trait ArrayBuilder {
    fn as_any(&self) -> &dyn Any;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool;
}
