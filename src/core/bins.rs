use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::types::{BinId, ContigId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BinError {
    #[error("contig {0} is outside the graph ({1} contigs)")]
    UnknownContig(ContigId, usize),

    #[error("bin {0} does not exist ({1} bins)")]
    UnknownBin(BinId, usize),
}

/// The mutable partition of contigs into bins.
///
/// A contig is a member of at most one bin at any time; contigs in no bin are
/// unassigned. Membership is kept twice (per-bin member sets and a per-contig
/// owner table) and both views are updated together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinAssignment {
    /// External bin number for each `BinId`
    labels: Vec<u32>,
    members: Vec<BTreeSet<ContigId>>,
    owner: Vec<Option<BinId>>,
}

impl BinAssignment {
    /// Empty assignment with one bin per entry of `labels`
    #[must_use]
    pub fn new(labels: Vec<u32>, node_count: usize) -> Self {
        let members = vec![BTreeSet::new(); labels.len()];
        Self {
            labels,
            members,
            owner: vec![None; node_count],
        }
    }

    /// Empty assignment with bins labelled `1..=n_bins`
    #[must_use]
    pub fn with_bin_count(n_bins: usize, node_count: usize) -> Self {
        let labels = (1..=n_bins)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .collect();
        Self::new(labels, node_count)
    }

    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.owner.len()
    }

    /// External bin number of `bin`
    #[must_use]
    pub fn label(&self, bin: BinId) -> Option<u32> {
        self.labels.get(bin.index()).copied()
    }

    #[must_use]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    #[must_use]
    pub fn bin_of(&self, contig: ContigId) -> Option<BinId> {
        self.owner.get(contig.index()).copied().flatten()
    }

    #[must_use]
    pub fn is_assigned(&self, contig: ContigId) -> bool {
        self.bin_of(contig).is_some()
    }

    /// Members of `bin` in ascending id order
    #[must_use]
    pub fn members(&self, bin: BinId) -> Option<&BTreeSet<ContigId>> {
        self.members.get(bin.index())
    }

    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.owner.iter().filter(|o| o.is_some()).count()
    }

    /// Assigned contigs with their bins, in contig order
    pub fn assigned(&self) -> impl Iterator<Item = (ContigId, BinId)> + '_ {
        self.owner
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.map(|b| (ContigId(i), b)))
    }

    /// Add `contig` to `bin` unless it already belongs to some bin.
    ///
    /// Returns `Ok(true)` if the contig was inserted and `Ok(false)` if it was
    /// already assigned (to `bin` or any other bin); an existing assignment is
    /// never overwritten.
    ///
    /// # Errors
    ///
    /// Returns `BinError` if `contig` or `bin` is out of range.
    pub fn insert(&mut self, contig: ContigId, bin: BinId) -> Result<bool, BinError> {
        self.check_contig(contig)?;
        if bin.index() >= self.labels.len() {
            return Err(BinError::UnknownBin(bin, self.labels.len()));
        }
        if self.owner[contig.index()].is_some() {
            return Ok(false);
        }
        self.owner[contig.index()] = Some(bin);
        self.members[bin.index()].insert(contig);
        Ok(true)
    }

    /// Remove `contig` from whichever bin holds it, returning that bin
    pub fn remove(&mut self, contig: ContigId) -> Option<BinId> {
        let bin = self.owner.get_mut(contig.index())?.take()?;
        self.members[bin.index()].remove(&contig);
        Some(bin)
    }

    /// Remove every listed contig; returns the ones that were actually assigned
    pub fn apply_removals(&mut self, contigs: &[ContigId]) -> Vec<ContigId> {
        contigs
            .iter()
            .copied()
            .filter(|&c| self.remove(c).is_some())
            .collect()
    }

    /// Frozen copy of the current contig -> bin mapping
    #[must_use]
    pub fn snapshot(&self) -> BinSnapshot {
        BinSnapshot {
            owner: self.owner.clone(),
        }
    }

    /// Whether the per-bin sets and the owner table describe the same
    /// partition with every contig in at most one bin
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen = vec![false; self.owner.len()];
        for (b, members) in self.members.iter().enumerate() {
            for contig in members {
                let Some(slot) = seen.get_mut(contig.index()) else {
                    return false;
                };
                if *slot || self.owner[contig.index()] != Some(BinId(b)) {
                    return false;
                }
                *slot = true;
            }
        }
        self.owner
            .iter()
            .zip(&seen)
            .all(|(owner, &in_a_set)| owner.is_some() == in_a_set)
    }

    fn check_contig(&self, contig: ContigId) -> Result<(), BinError> {
        if contig.index() < self.owner.len() {
            Ok(())
        } else {
            Err(BinError::UnknownContig(contig, self.owner.len()))
        }
    }
}

/// Read-only view of a [`BinAssignment`] taken before an evaluation pass.
///
/// Pass evaluation reads only the snapshot, so flags never depend on removals
/// made earlier in the same pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinSnapshot {
    owner: Vec<Option<BinId>>,
}

impl BinSnapshot {
    #[must_use]
    pub fn bin_of(&self, contig: ContigId) -> Option<BinId> {
        self.owner.get(contig.index()).copied().flatten()
    }

    #[must_use]
    pub fn is_assigned(&self, contig: ContigId) -> bool {
        self.bin_of(contig).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.owner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }

    /// Assigned contigs with their bins, in contig order
    pub fn assigned(&self) -> impl Iterator<Item = (ContigId, BinId)> + '_ {
        self.owner
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.map(|b| (ContigId(i), b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_exclusive() {
        let mut bins = BinAssignment::with_bin_count(2, 4);
        assert_eq!(bins.insert(ContigId(1), BinId(0)), Ok(true));
        assert_eq!(bins.insert(ContigId(1), BinId(1)), Ok(false));
        assert_eq!(bins.insert(ContigId(1), BinId(0)), Ok(false));

        assert_eq!(bins.bin_of(ContigId(1)), Some(BinId(0)));
        assert!(bins.members(BinId(1)).unwrap().is_empty());
        assert!(bins.is_consistent());
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut bins = BinAssignment::with_bin_count(1, 2);
        assert_eq!(
            bins.insert(ContigId(5), BinId(0)),
            Err(BinError::UnknownContig(ContigId(5), 2))
        );
        assert_eq!(
            bins.insert(ContigId(0), BinId(3)),
            Err(BinError::UnknownBin(BinId(3), 1))
        );
    }

    #[test]
    fn test_remove_and_apply_removals() {
        let mut bins = BinAssignment::with_bin_count(2, 5);
        bins.insert(ContigId(0), BinId(0)).unwrap();
        bins.insert(ContigId(2), BinId(1)).unwrap();
        bins.insert(ContigId(4), BinId(1)).unwrap();

        assert_eq!(bins.remove(ContigId(0)), Some(BinId(0)));
        assert_eq!(bins.remove(ContigId(0)), None);

        let removed = bins.apply_removals(&[ContigId(2), ContigId(3), ContigId(9)]);
        assert_eq!(removed, vec![ContigId(2)]);
        assert_eq!(bins.assigned_count(), 1);
        assert!(bins.is_consistent());
    }

    #[test]
    fn test_snapshot_is_frozen() {
        let mut bins = BinAssignment::with_bin_count(1, 3);
        bins.insert(ContigId(0), BinId(0)).unwrap();
        let snapshot = bins.snapshot();
        bins.remove(ContigId(0));

        assert!(snapshot.is_assigned(ContigId(0)));
        assert!(!bins.is_assigned(ContigId(0)));
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn test_labels() {
        let bins = BinAssignment::new(vec![3, 7], 1);
        assert_eq!(bins.n_bins(), 2);
        assert_eq!(bins.label(BinId(1)), Some(7));
        assert_eq!(bins.label(BinId(2)), None);
    }
}
