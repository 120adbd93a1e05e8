use anyhow::Result;
use winq_array::{ArrayExt, ArrayRef, DataType};

use crate::SchemaRef;

fn same_column_type(column: DataType, field: DataType) -> bool {
    match (column, field) {
        (DataType::Timestamp(_), DataType::Timestamp(_)) => true,
        (column, field) => column == field,
    }
}

/// A batch of rows stored column by column.
#[derive(Debug, Clone)]
pub struct DataSet {
    schema: SchemaRef,
    columns: Vec<ArrayRef>,
}

impl DataSet {
    pub fn try_new(schema: SchemaRef, columns: Vec<ArrayRef>) -> Result<Self> {
        anyhow::ensure!(
            schema.fields().len() == columns.len() && !columns.is_empty(),
            "invalid dataset: expect {} columns, actual is {}",
            schema.fields().len(),
            columns.len()
        );

        let size = columns[0].len();
        for column in &columns[1..] {
            anyhow::ensure!(
                column.len() == size,
                "invalid dataset: columns have different lengths"
            );
        }

        for (column, field) in columns.iter().zip(schema.fields()) {
            anyhow::ensure!(
                same_column_type(column.data_type(), field.data_type),
                "invalid dataset: column '{}' expect type '{}', actual is '{}'",
                field.name,
                field.data_type,
                column.data_type()
            );
        }

        Ok(Self { schema, columns })
    }

    #[inline]
    pub fn column(&self, index: usize) -> Option<ArrayRef> {
        self.columns.get(index).cloned()
    }

    #[inline]
    pub fn columns(&self) -> &[ArrayRef] {
        &self.columns
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns[0].is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    #[inline]
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Returns the number of bytes held by the columns of this dataset.
    pub fn memory_size(&self) -> usize {
        self.columns.iter().map(|column| column.memory_size()).sum()
    }

    /// Returns a zero-copy slice of the rows `offset..offset + length`.
    ///
    /// # Panics
    ///
    /// Panics if offset + length > len.
    pub fn slice(&self, offset: usize, length: usize) -> DataSet {
        DataSet {
            schema: self.schema.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| column.slice(offset, length))
                .collect(),
        }
    }

    /// Appends `columns` after the existing columns, `schema` describes the result.
    pub fn with_columns(
        &self,
        schema: SchemaRef,
        columns: impl IntoIterator<Item = ArrayRef>,
    ) -> Result<DataSet> {
        DataSet::try_new(
            schema,
            self.columns.iter().cloned().chain(columns).collect(),
        )
    }
}

impl PartialEq for DataSet {
    fn eq(&self, other: &Self) -> bool {
        if self.schema != other.schema {
            return false;
        }
        if self.columns.len() != other.columns.len() {
            return false;
        }
        for (a, b) in self.columns.iter().zip(&other.columns) {
            if a.len() != b.len() || a.data_type() != b.data_type() {
                return false;
            }
            let equal = (0..a.len()).all(|index| a.scalar_value(index) == b.scalar_value(index));
            if !equal {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Field, Schema};
    use winq_array::{Array, Int64Array, StringArray};

    fn create_dataset() -> DataSet {
        let schema = Arc::new(
            Schema::try_new(vec![
                Field::new("a", DataType::Int64),
                Field::new("b", DataType::String),
            ])
            .unwrap(),
        );
        DataSet::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from_vec(vec![1, 2, 3])),
                Arc::new(StringArray::from_vec(vec!["x", "y", "z"])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_try_new() {
        let dataset = create_dataset();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.columns().len(), 2);

        let schema = dataset.schema();
        assert!(DataSet::try_new(
            schema.clone(),
            vec![Arc::new(Int64Array::from_vec(vec![1, 2, 3]))]
        )
        .is_err());
        assert!(DataSet::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from_vec(vec![1, 2, 3])),
                Arc::new(StringArray::from_vec(vec!["x"])),
            ]
        )
        .is_err());
        assert!(DataSet::try_new(
            schema,
            vec![
                Arc::new(StringArray::from_vec(vec!["x", "y", "z"])),
                Arc::new(StringArray::from_vec(vec!["x", "y", "z"])),
            ]
        )
        .is_err());
    }

    #[test]
    fn test_slice() {
        let dataset = create_dataset().slice(1, 2);
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.columns()[1]
                .as_any()
                .downcast_ref::<StringArray>()
                .map(|array| array.iter().collect::<Vec<_>>()),
            Some(vec!["y", "z"])
        );
        assert_eq!(dataset.memory_size(), 2 * 8 + 2 + 2 * 4);
    }

    #[test]
    fn test_with_columns() {
        let dataset = create_dataset();
        let schema = Arc::new(
            dataset
                .schema()
                .try_append(vec![Field::new("c", DataType::Int64)])
                .unwrap(),
        );
        let extended = dataset
            .with_columns(
                schema.clone(),
                vec![Arc::new(Int64Array::new_scalar(3, Some(6))) as ArrayRef],
            )
            .unwrap();
        assert_eq!(extended.schema().len(), 3);
        assert_eq!(extended.column(2).map(|c| c.len()), Some(3));
        assert!(dataset.with_columns(schema, Vec::new()).is_err());
    }
}
