use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::{Array, ArrayRef, DataType};

/// An Array where all elements are nulls.
#[derive(Clone)]
pub struct NullArray {
    len: usize,
}

impl Debug for NullArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "NullArray({})", self.len)
    }
}

impl Array for NullArray {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn data_type(&self) -> DataType {
        DataType::Null
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn slice(&self, offset: usize, length: usize) -> ArrayRef {
        if offset + length > self.len {
            panic!(
                "offset+length (is {}) should be <= len (is {})",
                offset + length,
                self.len
            );
        }
        Arc::new(NullArray { len: length })
    }

    #[inline]
    fn is_valid(&self, index: usize) -> bool {
        if index >= self.len {
            panic!("index (is {}) should be < len (is {})", index, self.len);
        }
        false
    }

    #[inline]
    fn null_count(&self) -> usize {
        self.len
    }

    #[inline]
    fn memory_size(&self) -> usize {
        0
    }
}

impl PartialEq for NullArray {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
    }
}

impl NullArray {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}
