use std::sync::Arc;

use anyhow::Result;

use crate::{
    Array, ArrayExt, ArrayRef, BooleanType, DataType, Float32Type, Float64Type, Int16Type,
    Int32Type, Int64Type, Int8Type, PrimitiveArray, PrimitiveBuilder, PrimitiveType, Scalar,
    StringArray, StringBuilder, TimestampType,
};

macro_rules! numeric_cast {
    ($array:expr, $from:ty, $to:ty) => {{
        let array = $array.downcast_ref::<PrimitiveArray<$from>>();
        if let Some(scalar) = array.to_scalar() {
            return Ok(Arc::new(PrimitiveArray::<$to>::new_scalar(
                array.len(),
                scalar.map(|value| value as <$to as PrimitiveType>::Native),
            )));
        }
        let mut builder = PrimitiveBuilder::<$to>::with_capacity(array.len());
        for value in array.iter_opt() {
            builder.append_opt(value.map(|value| value as <$to as PrimitiveType>::Native));
        }
        Ok(Arc::new(builder.finish()))
    }};
}

macro_rules! cast_to_string {
    ($array:expr, $from:ty) => {{
        let array = $array.downcast_ref::<PrimitiveArray<$from>>();
        if let Some(scalar) = array.to_scalar() {
            return Ok(Arc::new(StringArray::new_scalar(
                array.len(),
                scalar.map(|value| value.to_string()),
            )));
        }
        let mut builder = StringBuilder::with_capacity(array.len());
        for value in array.iter_opt() {
            builder.append_opt(value.map(|value| value.to_string()).as_deref());
        }
        Ok(Arc::new(builder.finish()))
    }};
}

/// Casts `array` to `data_type`, null slots stay null.
///
/// Only widening numeric casts, casts from the null type and casts to string
/// are supported.
pub fn cast(array: &ArrayRef, data_type: DataType) -> Result<ArrayRef> {
    use DataType::*;

    match (array.data_type(), data_type) {
        (from, to) if from == to => Ok(array.clone()),
        (Null, to) => Scalar::Null.to_array(to, array.len()),

        (Int8, Int16) => numeric_cast!(array, Int8Type, Int16Type),
        (Int8, Int32) => numeric_cast!(array, Int8Type, Int32Type),
        (Int8, Int64) => numeric_cast!(array, Int8Type, Int64Type),
        (Int8, Float32) => numeric_cast!(array, Int8Type, Float32Type),
        (Int8, Float64) => numeric_cast!(array, Int8Type, Float64Type),
        (Int8, String) => cast_to_string!(array, Int8Type),

        (Int16, Int32) => numeric_cast!(array, Int16Type, Int32Type),
        (Int16, Int64) => numeric_cast!(array, Int16Type, Int64Type),
        (Int16, Float32) => numeric_cast!(array, Int16Type, Float32Type),
        (Int16, Float64) => numeric_cast!(array, Int16Type, Float64Type),
        (Int16, String) => cast_to_string!(array, Int16Type),

        (Int32, Int64) => numeric_cast!(array, Int32Type, Int64Type),
        (Int32, Float64) => numeric_cast!(array, Int32Type, Float64Type),
        (Int32, String) => cast_to_string!(array, Int32Type),

        (Int64, String) => cast_to_string!(array, Int64Type),

        (Float32, Float64) => numeric_cast!(array, Float32Type, Float64Type),
        (Float32, String) => cast_to_string!(array, Float32Type),

        (Float64, String) => cast_to_string!(array, Float64Type),

        (Boolean, String) => cast_to_string!(array, BooleanType),

        (Timestamp(_), Timestamp(_)) => Ok(array.clone()),
        (Timestamp(_), String) => {
            let array = array.downcast_ref::<PrimitiveArray<TimestampType>>();
            let mut builder = StringBuilder::with_capacity(array.len());
            for value in array.iter_opt() {
                builder.append_opt(value.map(|value| Scalar::Timestamp(value).to_string()).as_deref());
            }
            Ok(Arc::new(builder.finish()))
        }

        _ => anyhow::bail!(
            "cannot cast type from '{}' to '{}'",
            array.data_type(),
            data_type
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Float64Array, Int32Array, Int64Array, NullArray};

    #[test]
    fn test_cast_keeps_nulls() {
        let array: ArrayRef = Arc::new(Int32Array::from_opt_vec(vec![Some(1), None, Some(3)]));
        let res = cast(&array, DataType::Int64).unwrap();
        assert_eq!(
            res.downcast_ref::<Int64Array>().iter_opt().collect::<Vec<_>>(),
            vec![Some(1), None, Some(3)]
        );

        let res = cast(&array, DataType::String).unwrap();
        assert_eq!(
            res.downcast_ref::<StringArray>().iter_opt().collect::<Vec<_>>(),
            vec![Some("1"), None, Some("3")]
        );
    }

    #[test]
    fn test_cast_scalar_array() {
        let array: ArrayRef = Arc::new(Int32Array::new_scalar(4, Some(2)));
        let res = cast(&array, DataType::Float64).unwrap();
        let res = res.downcast_ref::<Float64Array>();
        assert!(res.is_scalar_array());
        assert_eq!(res.value(3), 2.0);
    }

    #[test]
    fn test_cast_null() {
        let array: ArrayRef = Arc::new(NullArray::new(2));
        let res = cast(&array, DataType::Int64).unwrap();
        assert_eq!(res.data_type(), DataType::Int64);
        assert_eq!(res.null_count(), 2);
    }

    #[test]
    fn test_cast_unsupported() {
        let array: ArrayRef = Arc::new(Float64Array::from_vec(vec![1.5]));
        assert!(cast(&array, DataType::Int32).is_err());
    }
}
