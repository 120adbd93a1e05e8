use crate::SourceProviderRef;

pub struct LogicalSourcePlan {
    pub name: String,
    pub qualifier: Option<String>,
    pub provider: SourceProviderRef,
}
