use std::{
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
};

/// State that can be updated with a partial patch.
///
/// Fields named by the patch are overwritten, all others are kept.
pub trait Merge {
    type Patch;

    fn merge(&mut self, patch: Self::Patch);
}

impl<K: Ord, V> Merge for BTreeMap<K, V> {
    type Patch = BTreeMap<K, V>;

    fn merge(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}

impl<K, V, B> Merge for HashMap<K, V, B>
where
    K: Eq + Hash,
    B: BuildHasher,
{
    type Patch = HashMap<K, V, B>;

    fn merge(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn btree_merge_keeps_unnamed_keys() {
        let mut state = BTreeMap::from([("count", 1), ("step", 2)]);
        state.merge(BTreeMap::from([("count", 5)]));
        assert_eq!(state, BTreeMap::from([("count", 5), ("step", 2)]));
    }

    #[rstest]
    fn hash_merge_adds_new_keys() {
        let mut state: HashMap<String, i32> = HashMap::from([("count".to_string(), 1)]);
        state.merge(HashMap::from([("max".to_string(), 9)]));
        assert_eq!(state.len(), 2);
        assert_eq!(state["count"], 1);
        assert_eq!(state["max"], 9);
    }
}
