use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use anyhow::Result;
use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    ArrayRef, BooleanArray, DataType, Float32Array, Float64Array, Int16Array, Int32Array,
    Int64Array, Int8Array, NullArray, StringArray, TimestampArray,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Boolean(bool),
    Timestamp(i64),
    String(Arc<str>),
}

impl Default for Scalar {
    #[inline]
    fn default() -> Self {
        Scalar::Null
    }
}

macro_rules! impl_from_numerics {
    ($(($ty:ty, $item:ident)),*) => {
        $(
        impl From<$ty> for Scalar {
            fn from(value: $ty) -> Self {
                Scalar::$item(value)
            }
        }
        )*
    };
}

impl_from_numerics!(
    (i8, Int8),
    (i16, Int16),
    (i32, Int32),
    (i64, Int64),
    (f32, Float32),
    (f64, Float64)
);

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value.into())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.into())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

macro_rules! scalar_array {
    ($array_ty:ty, $len:expr, $value:expr) => {
        Arc::new(<$array_ty>::new_scalar($len, $value)) as ArrayRef
    };
}

impl Scalar {
    #[inline]
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Null => DataType::Null,
            Scalar::Int8(_) => DataType::Int8,
            Scalar::Int16(_) => DataType::Int16,
            Scalar::Int32(_) => DataType::Int32,
            Scalar::Int64(_) => DataType::Int64,
            Scalar::Float32(_) => DataType::Float32,
            Scalar::Float64(_) => DataType::Float64,
            Scalar::Boolean(_) => DataType::Boolean,
            Scalar::Timestamp(_) => DataType::Timestamp(None),
            Scalar::String(_) => DataType::String,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Compares two non-null scalars of the same type.
    ///
    /// Returns `None` for nulls, mismatched types and NaN.
    pub fn partial_cmp_value(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Int8(a), Scalar::Int8(b)) => a.partial_cmp(b),
            (Scalar::Int16(a), Scalar::Int16(b)) => a.partial_cmp(b),
            (Scalar::Int32(a), Scalar::Int32(b)) => a.partial_cmp(b),
            (Scalar::Int64(a), Scalar::Int64(b)) => a.partial_cmp(b),
            (Scalar::Float32(a), Scalar::Float32(b)) => a.partial_cmp(b),
            (Scalar::Float64(a), Scalar::Float64(b)) => a.partial_cmp(b),
            (Scalar::Boolean(a), Scalar::Boolean(b)) => a.partial_cmp(b),
            (Scalar::Timestamp(a), Scalar::Timestamp(b)) => a.partial_cmp(b),
            (Scalar::String(a), Scalar::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// Creates an array of `len` copies of this scalar with the type `data_type`.
    ///
    /// A null scalar produces an all-null array of `data_type`.
    pub fn to_array(&self, data_type: DataType, len: usize) -> Result<ArrayRef> {
        Ok(match (data_type, self) {
            (DataType::Null, Scalar::Null) => Arc::new(NullArray::new(len)),
            (DataType::Int8, Scalar::Int8(value)) => scalar_array!(Int8Array, len, Some(*value)),
            (DataType::Int16, Scalar::Int16(value)) => {
                scalar_array!(Int16Array, len, Some(*value))
            }
            (DataType::Int32, Scalar::Int32(value)) => {
                scalar_array!(Int32Array, len, Some(*value))
            }
            (DataType::Int64, Scalar::Int64(value)) => {
                scalar_array!(Int64Array, len, Some(*value))
            }
            (DataType::Float32, Scalar::Float32(value)) => {
                scalar_array!(Float32Array, len, Some(*value))
            }
            (DataType::Float64, Scalar::Float64(value)) => {
                scalar_array!(Float64Array, len, Some(*value))
            }
            (DataType::Boolean, Scalar::Boolean(value)) => {
                scalar_array!(BooleanArray, len, Some(*value))
            }
            (DataType::Timestamp(_), Scalar::Timestamp(value)) => {
                scalar_array!(TimestampArray, len, Some(*value))
            }
            (DataType::String, Scalar::String(value)) => {
                Arc::new(StringArray::new_scalar(len, Some(value.clone())))
            }
            (DataType::Int8, Scalar::Null) => scalar_array!(Int8Array, len, None),
            (DataType::Int16, Scalar::Null) => scalar_array!(Int16Array, len, None),
            (DataType::Int32, Scalar::Null) => scalar_array!(Int32Array, len, None),
            (DataType::Int64, Scalar::Null) => scalar_array!(Int64Array, len, None),
            (DataType::Float32, Scalar::Null) => scalar_array!(Float32Array, len, None),
            (DataType::Float64, Scalar::Null) => scalar_array!(Float64Array, len, None),
            (DataType::Boolean, Scalar::Null) => scalar_array!(BooleanArray, len, None),
            (DataType::Timestamp(_), Scalar::Null) => scalar_array!(TimestampArray, len, None),
            (DataType::String, Scalar::Null) => {
                Arc::new(StringArray::new_scalar(len, None::<Arc<str>>))
            }
            (data_type, scalar) => anyhow::bail!(
                "scalar '{}' of type '{}' does not match the type '{}'",
                scalar,
                scalar.data_type(),
                data_type
            ),
        })
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Int8(n) => write!(f, "{}", n),
            Scalar::Int16(n) => write!(f, "{}", n),
            Scalar::Int32(n) => write!(f, "{}", n),
            Scalar::Int64(n) => write!(f, "{}", n),
            Scalar::Float32(n) => write!(f, "{}", n),
            Scalar::Float64(n) => write!(f, "{}", n),
            Scalar::Boolean(n) => write!(f, "{}", n),
            Scalar::Timestamp(n) => write!(f, "{}", chrono::Utc.timestamp_millis(*n)),
            Scalar::String(n) => f.write_str(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Array, ArrayExt};

    #[test]
    fn test_to_array() {
        let array = Scalar::Int64(7).to_array(DataType::Int64, 3).unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.scalar_value(2), Scalar::Int64(7));

        let array = Scalar::Null.to_array(DataType::Float64, 2).unwrap();
        assert_eq!(array.data_type(), DataType::Float64);
        assert_eq!(array.null_count(), 2);

        assert!(Scalar::Int32(1).to_array(DataType::Int64, 1).is_err());
    }

    #[test]
    fn test_partial_cmp_value() {
        assert_eq!(
            Scalar::Int32(1).partial_cmp_value(&Scalar::Int32(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Scalar::from("b").partial_cmp_value(&Scalar::from("a")),
            Some(Ordering::Greater)
        );
        assert_eq!(Scalar::Int32(1).partial_cmp_value(&Scalar::Int64(1)), None);
        assert_eq!(Scalar::Null.partial_cmp_value(&Scalar::Null), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Scalar::from(Some(1i64)), Scalar::Int64(1));
        assert_eq!(Scalar::from(None::<i64>), Scalar::Null);
    }
}
