use ahash::AHashMap;
use winq_planner::SourceProviderRef;

/// The source providers of a worker, looked up by the name a plan refers to them with.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    providers: AHashMap<String, SourceProviderRef>,
}

impl SourceRegistry {
    /// Registers `provider` as `name`, replacing the provider previously registered with it.
    pub fn register(&mut self, name: impl Into<String>, provider: SourceProviderRef) {
        self.providers.insert(name.into(), provider);
    }

    pub fn get(&self, name: &str) -> Option<&SourceProviderRef> {
        self.providers.get(name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use winq_array::DataType;
    use winq_dataset::{Field, Schema};

    use super::*;
    use crate::MemorySource;

    #[test]
    fn test_register() {
        let schema = Arc::new(Schema::try_new(vec![Field::new("a", DataType::Int64)]).unwrap());
        let mut registry = SourceRegistry::default();
        registry.register("t", Arc::new(MemorySource::new(schema, Vec::new())));

        assert_eq!(
            registry.get("t").map(|provider| provider.provider_name()),
            Some("memory")
        );
        assert!(registry.get("u").is_none());
    }
}
