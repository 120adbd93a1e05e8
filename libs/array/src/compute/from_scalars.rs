use std::sync::Arc;

use anyhow::Result;

use crate::{
    ArrayRef, BooleanType, DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type,
    Int8Type, NullArray, PrimitiveBuilder, Scalar, StringBuilder, TimestampType,
};

macro_rules! build_primitive {
    ($values:expr, $data_type:expr, $ty:ty, $variant:ident) => {{
        let mut builder = PrimitiveBuilder::<$ty>::with_capacity($values.len());
        for value in $values {
            match value {
                Scalar::$variant(value) => builder.append(*value),
                Scalar::Null => builder.append_null(),
                other => anyhow::bail!(
                    "expect a value of type '{}', actual is '{}'",
                    $data_type,
                    other.data_type()
                ),
            }
        }
        Ok(Arc::new(builder.finish()))
    }};
}

/// Builds an array of type `data_type` from a sequence of scalars.
///
/// `Scalar::Null` becomes a null slot, every other scalar must match `data_type`.
pub fn from_scalars(data_type: DataType, values: &[Scalar]) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => {
            anyhow::ensure!(
                values.iter().all(Scalar::is_null),
                "expect only null values for type 'null'"
            );
            Ok(Arc::new(NullArray::new(values.len())))
        }
        DataType::Int8 => build_primitive!(values, data_type, Int8Type, Int8),
        DataType::Int16 => build_primitive!(values, data_type, Int16Type, Int16),
        DataType::Int32 => build_primitive!(values, data_type, Int32Type, Int32),
        DataType::Int64 => build_primitive!(values, data_type, Int64Type, Int64),
        DataType::Float32 => build_primitive!(values, data_type, Float32Type, Float32),
        DataType::Float64 => build_primitive!(values, data_type, Float64Type, Float64),
        DataType::Boolean => build_primitive!(values, data_type, BooleanType, Boolean),
        DataType::Timestamp(_) => build_primitive!(values, data_type, TimestampType, Timestamp),
        DataType::String => {
            let mut builder = StringBuilder::with_capacity(values.len());
            for value in values {
                match value {
                    Scalar::String(value) => builder.append(value),
                    Scalar::Null => builder.append_null(),
                    other => anyhow::bail!(
                        "expect a value of type 'string', actual is '{}'",
                        other.data_type()
                    ),
                }
            }
            Ok(Arc::new(builder.finish()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Array, ArrayExt, Int64Array};

    #[test]
    fn test_from_scalars() {
        let array = from_scalars(
            DataType::Int64,
            &[Scalar::Int64(1), Scalar::Null, Scalar::Int64(3)],
        )
        .unwrap();
        assert_eq!(
            array.downcast_ref::<Int64Array>().iter_opt().collect::<Vec<_>>(),
            vec![Some(1), None, Some(3)]
        );

        let array = from_scalars(DataType::String, &[Scalar::from("a"), Scalar::Null]).unwrap();
        assert_eq!(array.null_count(), 1);
        assert_eq!(array.scalar_value(0), Scalar::from("a"));
    }

    #[test]
    fn test_from_scalars_type_mismatch() {
        assert!(from_scalars(DataType::Int64, &[Scalar::Float64(1.0)]).is_err());
    }
}
