mod partition_key;

use std::cmp::Ordering;

use anyhow::Result;
use winq_array::{ArrayRef, Scalar};
use winq_dataset::DataSet;
use winq_expr::FieldRef;
use winq_planner::logical_plan::SortDirection;
use winq_planner::physical_plan::OrderKey;

pub use partition_key::GroupedKey;

pub trait DataSetExt {
    /// Returns the partition key of every row.
    fn partition_keys(&self, fields: &[FieldRef]) -> Result<Vec<GroupedKey>>;

    fn order_columns(&self, keys: &[OrderKey]) -> Result<Vec<ArrayRef>>;
}

impl DataSetExt for DataSet {
    fn partition_keys(&self, fields: &[FieldRef]) -> Result<Vec<GroupedKey>> {
        partition_key::partition_keys(self, fields)
    }

    fn order_columns(&self, keys: &[OrderKey]) -> Result<Vec<ArrayRef>> {
        keys.iter()
            .map(|key| column(self, &key.field))
            .collect()
    }
}

pub(crate) fn column(dataset: &DataSet, field: &FieldRef) -> Result<ArrayRef> {
    dataset.column(field.index).ok_or_else(|| {
        anyhow::anyhow!(
            "column '{}' is out of range, the dataset has {} columns",
            field,
            dataset.columns().len()
        )
    })
}

/// Compares two rows by the values of their order keys.
///
/// Values that cannot be compared, such as NaN, are treated as equal.
pub fn compare_order_values(keys: &[OrderKey], a: &[Scalar], b: &[Scalar]) -> Ordering {
    for ((key, a), b) in keys.iter().zip(a).zip(b) {
        let ordering = match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) if key.nulls_first => Ordering::Less,
            (true, false) => Ordering::Greater,
            (false, true) if key.nulls_first => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = a.partial_cmp_value(b).unwrap_or(Ordering::Equal);
                match key.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
