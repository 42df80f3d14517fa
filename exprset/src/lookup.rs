use std::collections::HashMap;
use std::hash::BuildHasher;

/// An external annotation service mapping a feature identifier to one
/// descriptive value, e.g. probe id to chromosomal location.
///
/// `Ok(None)` means the identifier is unknown to the service; `Err` means the
/// service itself failed.
pub trait FeatureLookup {
    fn lookup(&self, feature_id: &str) -> anyhow::Result<Option<String>>;
}

impl<F> FeatureLookup for F
where
    F: Fn(&str) -> anyhow::Result<Option<String>>,
{
    fn lookup(&self, feature_id: &str) -> anyhow::Result<Option<String>> {
        self(feature_id)
    }
}

impl<S: BuildHasher> FeatureLookup for HashMap<String, String, S> {
    fn lookup(&self, feature_id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.get(feature_id).cloned())
    }
}
