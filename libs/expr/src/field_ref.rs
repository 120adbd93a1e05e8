use derive_more::Display;
use serde::{Deserialize, Serialize};
use winq_array::DataType;
use winq_dataset::Schema;

/// A column of an operator's input, resolved once at plan time.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display)]
#[display(fmt = "{}#{}", name, index)]
pub struct FieldRef {
    pub index: usize,
    pub name: String,
    pub data_type: DataType,
}

impl FieldRef {
    /// Resolves the field at `index` of `schema`.
    pub fn resolve(schema: &Schema, index: usize) -> Option<FieldRef> {
        schema.field_at(index).map(|field| FieldRef {
            index,
            name: field.name.clone(),
            data_type: field.data_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use winq_dataset::Field;

    use super::*;

    #[test]
    fn test_resolve() {
        let schema = Schema::try_new(vec![
            Field::new("k", DataType::String),
            Field::new("v", DataType::Int32),
        ])
        .unwrap();

        let field = FieldRef::resolve(&schema, 1).unwrap();
        assert_eq!(field.name, "v");
        assert_eq!(field.data_type, DataType::Int32);
        assert_eq!(field.to_string(), "v#1");
        assert!(FieldRef::resolve(&schema, 2).is_none());
    }
}
