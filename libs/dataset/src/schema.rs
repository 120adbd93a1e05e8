use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use winq_array::DataType;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub qualifier: Option<String>,
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
            data_type,
        }
    }

    pub fn with_qualifier(self, qualifier: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            ..self
        }
    }

    pub fn qualified_name(&self) -> String {
        match &self.qualifier {
            Some(qualifier) => format!("{}.{}", qualifier, self.name),
            None => self.name.clone(),
        }
    }
}

pub type SchemaRef = Arc<Schema>;

#[derive(Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Creates a schema, rejecting duplicate and ambiguous field names.
    pub fn try_new(fields: Vec<Field>) -> Result<Self> {
        let mut qualified_names = HashSet::new();
        let mut unqualified_names = HashSet::new();

        for field in &fields {
            match &field.qualifier {
                Some(qualifier) => anyhow::ensure!(
                    qualified_names.insert((qualifier.as_str(), field.name.as_str())),
                    "schema contains duplicate qualified field name: '{}'",
                    field.qualified_name()
                ),
                None => anyhow::ensure!(
                    unqualified_names.insert(field.name.as_str()),
                    "schema contains duplicate unqualified field name: '{}'",
                    field.name
                ),
            }
        }

        let mut ambiguous = qualified_names
            .iter()
            .filter(|(_, name)| unqualified_names.contains(name))
            .collect::<Vec<_>>();
        ambiguous.sort_unstable();
        if let Some((qualifier, name)) = ambiguous.first() {
            anyhow::bail!(
                "schema contains qualified field name '{}.{}' \
                and unqualified field name '{}' which would be ambiguous",
                qualifier,
                name,
                name
            );
        }

        Ok(Self { fields })
    }

    /// Creates a schema with the fields of this schema followed by `fields`.
    pub fn try_append(&self, fields: impl IntoIterator<Item = Field>) -> Result<Self> {
        Self::try_new(self.fields.iter().cloned().chain(fields).collect())
    }

    /// Looks up a field by name, ignoring ASCII case.
    pub fn field(&self, qualifier: Option<&str>, name: &str) -> Option<(usize, &Field)> {
        self.fields.iter().enumerate().find(|(_, f)| {
            let qualifier_matches = match (qualifier, &f.qualifier) {
                (Some(qualifier), Some(field_qualifier)) => {
                    field_qualifier.eq_ignore_ascii_case(qualifier)
                }
                (Some(_), None) => false,
                (None, _) => true,
            };
            qualifier_matches && f.name.eq_ignore_ascii_case(name)
        })
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_fields() {
        assert!(Schema::try_new(vec![
            Field::new("a", DataType::Int32),
            Field::new("a", DataType::Int64),
        ])
        .is_err());

        assert!(Schema::try_new(vec![
            Field::new("a", DataType::Int32).with_qualifier("t"),
            Field::new("a", DataType::Int64).with_qualifier("s"),
        ])
        .is_ok());

        assert!(Schema::try_new(vec![
            Field::new("a", DataType::Int32).with_qualifier("t"),
            Field::new("a", DataType::Int64),
        ])
        .is_err());
    }

    #[test]
    fn test_field_lookup() {
        let schema = Schema::try_new(vec![
            Field::new("a", DataType::Int32).with_qualifier("t"),
            Field::new("b", DataType::String),
        ])
        .unwrap();

        assert_eq!(schema.field(None, "A").map(|(i, _)| i), Some(0));
        assert_eq!(schema.field(Some("t"), "a").map(|(i, _)| i), Some(0));
        assert_eq!(schema.field(Some("t"), "b").map(|(i, _)| i), None);
        assert_eq!(schema.field(None, "b").map(|(i, _)| i), Some(1));
        assert_eq!(schema.field_at(1).map(|f| f.data_type), Some(DataType::String));
    }

    #[test]
    fn test_try_append() {
        let schema = Schema::try_new(vec![Field::new("a", DataType::Int32)]).unwrap();
        let appended = schema
            .try_append(vec![Field::new("sum_a", DataType::Int64)])
            .unwrap();
        assert_eq!(appended.len(), 2);
        assert!(schema.try_append(vec![Field::new("a", DataType::Int64)]).is_err());
    }

    #[test]
    fn test_serde() {
        let schema = Schema::try_new(vec![
            Field::new("a", DataType::Int32),
            Field::new("ts", DataType::Timestamp(Some(chrono_tz::Tz::UTC))),
        ])
        .unwrap();
        let data = bincode::serialize(&schema).unwrap();
        let schema2: Schema = bincode::deserialize(&data).unwrap();
        assert_eq!(schema, schema2);
    }
}
