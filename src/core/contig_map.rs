use std::collections::HashMap;

use crate::core::types::ContigId;

/// Two-way lookup between internal [`ContigId`]s and assembler contig numbers
/// (the `<n>` in `NODE_<n>_length_...`).
///
/// Internal ids are handed out sequentially in insertion order, so the table
/// always covers exactly `[0, len())`.
#[derive(Debug, Clone, Default)]
pub struct ContigIdMap {
    to_external: Vec<u64>,
    to_internal: HashMap<u64, ContigId>,
}

impl ContigIdMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an external contig number, returning its internal id.
    ///
    /// Registering the same number twice returns the id assigned the first time.
    pub fn insert(&mut self, external: u64) -> ContigId {
        if let Some(&id) = self.to_internal.get(&external) {
            return id;
        }
        let id = ContigId(self.to_external.len());
        self.to_external.push(external);
        self.to_internal.insert(external, id);
        id
    }

    #[must_use]
    pub fn internal(&self, external: u64) -> Option<ContigId> {
        self.to_internal.get(&external).copied()
    }

    #[must_use]
    pub fn external(&self, id: ContigId) -> Option<u64> {
        self.to_external.get(id.index()).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.to_external.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_external.is_empty()
    }

    /// Iterate `(internal, external)` pairs in internal id order
    pub fn iter(&self) -> impl Iterator<Item = (ContigId, u64)> + '_ {
        self.to_external
            .iter()
            .enumerate()
            .map(|(i, &ext)| (ContigId(i), ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut map = ContigIdMap::new();
        assert_eq!(map.insert(17), ContigId(0));
        assert_eq!(map.insert(3), ContigId(1));
        assert_eq!(map.insert(17), ContigId(0));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_lookups_stay_in_sync() {
        let mut map = ContigIdMap::new();
        for ext in [5, 9, 1] {
            map.insert(ext);
        }
        for (id, ext) in map.iter() {
            assert_eq!(map.internal(ext), Some(id));
            assert_eq!(map.external(id), Some(ext));
        }
        assert_eq!(map.internal(42), None);
        assert_eq!(map.external(ContigId(3)), None);
    }
}
