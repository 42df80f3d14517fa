use indexmap::IndexSet;
use log::warn;
use std::collections::{HashMap, HashSet};

use crate::data::selector::BoundedSelector;
use crate::error::{ExprSetError, Result};

/// Ordered sequence of unique identifiers for one axis.
#[derive(Debug, Clone, Default)]
pub struct NameIndex(IndexSet<String>);

impl std::cmp::PartialEq for NameIndex {
    fn eq(&self, other: &Self) -> bool {
        self.0.iter().eq(other.0.iter())
    }
}

impl Eq for NameIndex {}

impl NameIndex {
    pub fn empty() -> Self {
        Self(IndexSet::new())
    }

    /// Positional identifiers "0", "1", ..., "n-1".
    pub fn range(n: usize) -> Self {
        Self((0..n).map(|i| i.to_string()).collect())
    }

    /// Build an index from identifiers. `kind` names the axis in error messages.
    pub fn try_new<I, S>(kind: &'static str, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter();
        let mut index = IndexSet::with_capacity(names.size_hint().0);
        for name in names {
            let name = name.into();
            if index.contains(&name) {
                return Err(ExprSetError::DuplicateIdentifier { kind, name });
            }
            index.insert(name);
        }
        Ok(Self(index))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get_index(i).map(|x| x.as_str())
    }

    /// Position of an identifier.
    pub fn get_index(&self, name: &str) -> Option<usize> {
        self.0.get_index_of(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.0.iter().map(|x| x.as_str())
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }

    /// Select identifiers by position. The first occurrence of an identifier
    /// keeps its name; later copies are suffixed with ".1", ".2", ... skipping
    /// any name already present among the selected identifiers.
    pub fn select(&self, select: &BoundedSelector) -> Result<Self> {
        select.check_axis(self.len())?;
        if select.is_full() {
            return Ok(self.clone());
        }
        let reserved: HashSet<&str> = select.iter().map(|i| self.0[i].as_str()).collect();
        let mut index = IndexSet::with_capacity(select.len());
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut renamed = 0;
        for i in select.iter() {
            let name = &self.0[i];
            if index.contains(name) {
                let n = counts.entry(name.as_str()).or_insert(0);
                let candidate = loop {
                    *n += 1;
                    let candidate = format!("{}.{}", name, n);
                    if !reserved.contains(candidate.as_str()) && !index.contains(&candidate) {
                        break candidate;
                    }
                };
                index.insert(candidate);
                renamed += 1;
            } else {
                index.insert(name.clone());
            }
        }
        if renamed > 0 {
            warn!("{} repeated identifiers were made unique", renamed);
        }
        Ok(Self(index))
    }
}

impl<'a> IntoIterator for &'a NameIndex {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::selector::Selector;

    #[test]
    fn test_duplicates() {
        let err = NameIndex::try_new("sample", ["a", "b", "a"]).unwrap_err();
        assert!(matches!(
            err,
            ExprSetError::DuplicateIdentifier { kind: "sample", ref name } if name == "a"
        ));
    }

    #[test]
    fn test_select() {
        let index = NameIndex::try_new("sample", ["a", "b", "c"]).unwrap();
        let sel = Selector::from(vec![2usize, 0]);
        let selected = index.select(&sel.bound(3).unwrap()).unwrap();
        assert_eq!(selected.to_vec(), vec!["c", "a"]);
        assert_eq!(selected.get_index("a"), Some(1));
    }

    #[test]
    fn test_select_repeated() {
        let index = NameIndex::try_new("sample", ["a", "b", "a.1"]).unwrap();
        let sel = Selector::from(vec![0usize, 0, 2, 0]);
        let selected = index.select(&sel.bound(3).unwrap()).unwrap();
        assert_eq!(selected.to_vec(), vec!["a", "a.2", "a.1", "a.3"]);

        // A copy never takes the name of a selected identifier that comes later
        let sel = Selector::from(vec![0usize, 0, 2]);
        let selected = index.select(&sel.bound(3).unwrap()).unwrap();
        assert_eq!(selected.get_index("a.1"), Some(2));
        assert_eq!(selected.get_index("a.2"), Some(1));
    }

    #[test]
    fn test_select_other_axis() {
        let index = NameIndex::range(3);
        let sel = Selector::from(vec![5usize]);
        assert!(matches!(
            index.select(&sel.bound(6).unwrap()),
            Err(ExprSetError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_order_matters() {
        let a = NameIndex::try_new("feature", ["x", "y"]).unwrap();
        let b = NameIndex::try_new("feature", ["y", "x"]).unwrap();
        assert_ne!(a, b);
        assert_eq!(NameIndex::range(2).to_vec(), vec!["0", "1"]);
    }
}
