use anyhow::Result;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use winq_array::{
    Array, ArrayExt, BooleanArray, DataType, Float32Type, Float64Type, Int16Type, Int32Type,
    Int64Type, Int8Type, PrimitiveArray, StringArray, TimestampType,
};
use winq_dataset::DataSet;
use winq_expr::FieldRef;

macro_rules! fill_integer_key {
    ($record_keys:expr, $array:expr, $ty:ty, $num_columns:expr, $column:expr) => {{
        let array = $array.downcast_ref::<PrimitiveArray<$ty>>();
        for row in 0..array.len() {
            if let Some(value) = array.value_opt(row) {
                $record_keys[row * $num_columns + $column] = Key::Int(value as i64);
            }
        }
    }};
}

macro_rules! fill_float_key {
    ($record_keys:expr, $array:expr, $ty:ty, $num_columns:expr, $column:expr) => {{
        let array = $array.downcast_ref::<PrimitiveArray<$ty>>();
        for row in 0..array.len() {
            if let Some(value) = array.value_opt(row) {
                $record_keys[row * $num_columns + $column] = Key::Float(OrderedFloat(value as f64));
            }
        }
    }};
}

#[derive(Debug, Hash, Eq, PartialEq, Clone)]
enum Key {
    Null,
    Boolean(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    String(String),
}

/// The values of the partition keys of one row, nulls are equal to each other.
#[derive(Debug, Default, Eq, PartialEq, Hash, Clone)]
pub struct GroupedKey(SmallVec<[Key; 4]>);

impl GroupedKey {
    pub fn memory_size(&self) -> usize {
        let spilled = if self.0.spilled() {
            self.0.capacity() * std::mem::size_of::<Key>()
        } else {
            0
        };
        let strings = self
            .0
            .iter()
            .map(|key| match key {
                Key::String(value) => value.len(),
                _ => 0,
            })
            .sum::<usize>();
        std::mem::size_of::<Self>() + spilled + strings
    }
}

pub fn partition_keys(dataset: &DataSet, fields: &[FieldRef]) -> Result<Vec<GroupedKey>> {
    let num_columns = fields.len();
    let keys = fields
        .iter()
        .map(|field| super::column(dataset, field))
        .try_collect::<_, Vec<_>, _>()?;
    let mut record_keys = vec![Key::Null; num_columns * dataset.len()];

    for (column, array) in keys.into_iter().enumerate() {
        match array.data_type() {
            DataType::Null => {}
            DataType::Int8 => fill_integer_key!(record_keys, array, Int8Type, num_columns, column),
            DataType::Int16 => {
                fill_integer_key!(record_keys, array, Int16Type, num_columns, column)
            }
            DataType::Int32 => {
                fill_integer_key!(record_keys, array, Int32Type, num_columns, column)
            }
            DataType::Int64 => {
                fill_integer_key!(record_keys, array, Int64Type, num_columns, column)
            }
            DataType::Float32 => {
                fill_float_key!(record_keys, array, Float32Type, num_columns, column)
            }
            DataType::Float64 => {
                fill_float_key!(record_keys, array, Float64Type, num_columns, column)
            }
            DataType::Boolean => {
                let array = array.downcast_ref::<BooleanArray>();
                for row in 0..array.len() {
                    if let Some(value) = array.value_opt(row) {
                        record_keys[row * num_columns + column] = Key::Boolean(value);
                    }
                }
            }
            DataType::Timestamp(_) => {
                fill_integer_key!(record_keys, array, TimestampType, num_columns, column)
            }
            DataType::String => {
                let array = array.downcast_ref::<StringArray>();
                for row in 0..array.len() {
                    if let Some(value) = array.value_opt(row) {
                        record_keys[row * num_columns + column] = Key::String(value.to_string());
                    }
                }
            }
        }
    }

    let mut grouped_keys = Vec::with_capacity(dataset.len());
    for row in 0..dataset.len() {
        let mut grouped_key = GroupedKey::default();
        for value in record_keys[row * num_columns..(row + 1) * num_columns].iter_mut() {
            grouped_key.0.push(std::mem::replace(value, Key::Null));
        }
        grouped_keys.push(grouped_key);
    }
    Ok(grouped_keys)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use winq_array::{ArrayRef, Float64Array, Int32Array};
    use winq_dataset::{Field, Schema};

    use super::*;

    fn field(index: usize, name: &str, data_type: DataType) -> FieldRef {
        FieldRef {
            index,
            name: name.to_string(),
            data_type,
        }
    }

    #[test]
    fn test_partition_keys() {
        let schema = Arc::new(
            Schema::try_new(vec![
                Field::new("a", DataType::String),
                Field::new("b", DataType::Int32),
                Field::new("c", DataType::Float64),
            ])
            .unwrap(),
        );
        let dataset = DataSet::try_new(
            schema,
            vec![
                Arc::new(StringArray::from_opt_vec(vec![
                    Some("x"),
                    Some("x"),
                    None,
                    None,
                ])) as ArrayRef,
                Arc::new(Int32Array::from_opt_vec(vec![Some(1), Some(1), None, Some(2)])),
                Arc::new(Float64Array::from_vec(vec![1.0, 2.0, 3.0, 4.0])),
            ],
        )
        .unwrap();

        let keys = partition_keys(
            &dataset,
            &[
                field(0, "a", DataType::String),
                field(1, "b", DataType::Int32),
            ],
        )
        .unwrap();
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[0], keys[1]);
        assert_ne!(keys[1], keys[2]);
        assert_ne!(keys[2], keys[3]);

        let keys = partition_keys(&dataset, &[field(2, "c", DataType::Float64)]).unwrap();
        assert_ne!(keys[0], keys[1]);

        let keys = partition_keys(&dataset, &[]).unwrap();
        assert!(keys.iter().all(|key| key == &GroupedKey::default()));

        assert!(partition_keys(&dataset, &[field(5, "z", DataType::Int64)]).is_err());
    }

    #[test]
    fn test_null_keys_are_equal() {
        let schema = Arc::new(Schema::try_new(vec![Field::new("a", DataType::Int64)]).unwrap());
        let dataset = DataSet::try_new(
            schema,
            vec![Arc::new(winq_array::Int64Array::new_scalar(3, None)) as ArrayRef],
        )
        .unwrap();
        let keys = partition_keys(&dataset, &[field(0, "a", DataType::Int64)]).unwrap();
        assert!(keys.iter().all(|key| key == &keys[0]));
    }

    #[test]
    fn test_memory_size() {
        let schema = Arc::new(Schema::try_new(vec![Field::new("a", DataType::String)]).unwrap());
        let dataset = DataSet::try_new(
            schema,
            vec![Arc::new(StringArray::from_opt_vec(vec![Some("abcdefgh"), None])) as ArrayRef],
        )
        .unwrap();
        let keys = partition_keys(&dataset, &[field(0, "a", DataType::String)]).unwrap();
        assert_eq!(keys[0].memory_size(), keys[1].memory_size() + 8);
        assert_eq!(
            GroupedKey::default().memory_size(),
            std::mem::size_of::<GroupedKey>()
        );
    }
}
