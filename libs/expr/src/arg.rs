use std::fmt::{self, Display, Formatter};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use winq_array::{compute, ArrayRef, DataType, Scalar};
use winq_dataset::DataSet;

use crate::FieldRef;

/// An argument of an aggregate call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AggregateArg {
    Column(FieldRef),
    Literal(Scalar),
}

impl AggregateArg {
    pub fn data_type(&self) -> DataType {
        match self {
            AggregateArg::Column(field) => field.data_type,
            AggregateArg::Literal(value) => value.data_type(),
        }
    }

    /// Evaluates the argument over `dataset` and casts the result to `data_type`.
    pub fn eval(&self, dataset: &DataSet, data_type: DataType) -> Result<ArrayRef> {
        let array = match self {
            AggregateArg::Column(field) => dataset.column(field.index).ok_or_else(|| {
                anyhow::anyhow!(
                    "column '{}' is out of range, the dataset has {} columns",
                    field,
                    dataset.columns().len()
                )
            })?,
            AggregateArg::Literal(value) => value.to_array(value.data_type(), dataset.len())?,
        };
        compute::cast(&array, data_type)
    }
}

impl Display for AggregateArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AggregateArg::Column(field) => write!(f, "{}", field),
            AggregateArg::Literal(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use winq_array::{Array, ArrayExt, Int32Array, Int64Array};
    use winq_dataset::{Field, Schema};

    use super::*;

    fn create_dataset() -> DataSet {
        let schema = Arc::new(Schema::try_new(vec![Field::new("v", DataType::Int32)]).unwrap());
        DataSet::try_new(
            schema,
            vec![Arc::new(Int32Array::from_opt_vec(vec![Some(1), None, Some(3)]))],
        )
        .unwrap()
    }

    #[test]
    fn test_eval_column() {
        let arg = AggregateArg::Column(FieldRef {
            index: 0,
            name: "v".to_string(),
            data_type: DataType::Int32,
        });
        let array = arg.eval(&create_dataset(), DataType::Int64).unwrap();
        assert_eq!(
            array.downcast_ref::<Int64Array>().iter_opt().collect::<Vec<_>>(),
            vec![Some(1), None, Some(3)]
        );
    }

    #[test]
    fn test_eval_literal() {
        let arg = AggregateArg::Literal(Scalar::Int64(1));
        let array = arg.eval(&create_dataset(), DataType::Int64).unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.null_count(), 0);
        assert_eq!(array.scalar_value(2), Scalar::Int64(1));
    }

    #[test]
    fn test_eval_missing_column() {
        let arg = AggregateArg::Column(FieldRef {
            index: 5,
            name: "x".to_string(),
            data_type: DataType::Int32,
        });
        assert!(arg.eval(&create_dataset(), DataType::Int32).is_err());
    }
}
