use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::core::bins::{BinAssignment, BinSnapshot};
use crate::core::graph::AdjacencyGraph;
use crate::core::types::{BinId, ContigId};

/// Outcome of checking one assigned contig against its direct neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborVerdict {
    /// No neighbour is assigned; nothing supports or contradicts the label
    Unsupported,
    /// Every assigned neighbour shares the contig's bin
    Confirmed,
    /// At least one assigned neighbour sits in a different bin
    Conflicting,
}

/// Result of the direct-neighbour pass, evaluated against one snapshot
#[derive(Debug, Clone, Default)]
pub struct NeighborConsensus {
    /// Contigs to strip, in ascending order
    pub flagged: Vec<ContigId>,
    /// Contigs whose label every assigned neighbour agrees with
    pub confirmed: Vec<ContigId>,
}

/// Closest assigned contigs found by the breadth-first search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    /// All assigned contigs at the first level that had any, ascending
    pub contigs: Vec<ContigId>,
    /// Level at which they were found (1 = direct neighbours); 0 when none
    pub depth: usize,
    /// Distinct contigs visited, including the start contig
    pub explored: usize,
}

/// Removals made by the two resolution passes
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    pub neighbor_removed: Vec<ContigId>,
    pub distance_removed: Vec<ContigId>,
}

impl ResolutionReport {
    #[must_use]
    pub fn total_removed(&self) -> usize {
        self.neighbor_removed.len() + self.distance_removed.len()
    }
}

/// Strips bin labels that contradict the labels around them in the graph.
///
/// Every pass evaluates all contigs against a [`BinSnapshot`] and only then
/// applies its removals, so the outcome does not depend on evaluation order.
pub struct AmbiguityResolver<'a> {
    graph: &'a AdjacencyGraph,
}

impl<'a> AmbiguityResolver<'a> {
    #[must_use]
    pub fn new(graph: &'a AdjacencyGraph) -> Self {
        Self { graph }
    }

    /// Run the direct-neighbour pass and then the breadth-first pass
    pub fn resolve(&self, bins: &mut BinAssignment) -> ResolutionReport {
        let consensus = self.neighbor_pass(&bins.snapshot());
        let neighbor_removed = bins.apply_removals(&consensus.flagged);
        info!(
            "Direct-neighbour pass removed {} labels ({} confirmed)",
            neighbor_removed.len(),
            consensus.confirmed.len()
        );

        let flagged = self.distance_pass(&bins.snapshot(), &consensus.confirmed);
        let distance_removed = bins.apply_removals(&flagged);
        info!(
            "Breadth-first pass removed {} further labels",
            distance_removed.len()
        );

        ResolutionReport {
            neighbor_removed,
            distance_removed,
        }
    }

    /// Re-run only the direct-neighbour rule and apply it; returns removed contigs
    pub fn cleanup(&self, bins: &mut BinAssignment) -> Vec<ContigId> {
        let consensus = self.neighbor_pass(&bins.snapshot());
        let removed = bins.apply_removals(&consensus.flagged);
        info!("Final cleanup removed {} labels", removed.len());
        removed
    }

    /// Verdict for `contig` under `snapshot`; `None` if it is unassigned
    #[must_use]
    pub fn neighbor_verdict(
        &self,
        contig: ContigId,
        snapshot: &BinSnapshot,
    ) -> Option<NeighborVerdict> {
        let own = snapshot.bin_of(contig)?;
        let mut any_bound = false;

        for &neighbour in self.graph.neighbors(contig) {
            if let Some(bin) = snapshot.bin_of(neighbour) {
                if bin != own {
                    return Some(NeighborVerdict::Conflicting);
                }
                any_bound = true;
            }
        }

        Some(if any_bound {
            NeighborVerdict::Confirmed
        } else {
            NeighborVerdict::Unsupported
        })
    }

    /// Evaluate every assigned contig against its direct neighbours
    #[must_use]
    pub fn neighbor_pass(&self, snapshot: &BinSnapshot) -> NeighborConsensus {
        let verdicts: Vec<Option<NeighborVerdict>> = (0..self.graph.node_count())
            .into_par_iter()
            .map(|i| self.neighbor_verdict(ContigId(i), snapshot))
            .collect();

        let mut consensus = NeighborConsensus::default();
        for (i, verdict) in verdicts.into_iter().enumerate() {
            match verdict {
                Some(NeighborVerdict::Conflicting) => consensus.flagged.push(ContigId(i)),
                Some(NeighborVerdict::Confirmed) => consensus.confirmed.push(ContigId(i)),
                Some(NeighborVerdict::Unsupported) | None => {}
            }
        }
        consensus
    }

    /// Flag assigned, unconfirmed contigs whose closest assigned contigs
    /// include one in a different bin
    #[must_use]
    pub fn distance_pass(&self, snapshot: &BinSnapshot, confirmed: &[ContigId]) -> Vec<ContigId> {
        let confirmed: HashSet<ContigId> = confirmed.iter().copied().collect();

        let candidates: Vec<(ContigId, BinId)> = snapshot
            .assigned()
            .filter(|(contig, _)| !confirmed.contains(contig))
            .collect();

        debug!(
            "Searching for closest labelled contigs of {} candidates",
            candidates.len()
        );

        candidates
            .into_par_iter()
            .filter_map(|(contig, own)| {
                let evidence = self.closest_labelled(contig, snapshot);
                let conflicting = evidence
                    .contigs
                    .iter()
                    .any(|&c| snapshot.bin_of(c) != Some(own));
                conflicting.then_some(contig)
            })
            .collect()
    }

    /// Level-by-level search outward from `contig` for the nearest assigned
    /// contigs. Stops at the first level containing any; ties are all kept.
    #[must_use]
    pub fn closest_labelled(&self, contig: ContigId, snapshot: &BinSnapshot) -> Evidence {
        let mut visited: HashSet<ContigId> = HashSet::from([contig]);
        let mut frontier: Vec<ContigId> = self
            .graph
            .neighbors(contig)
            .iter()
            .copied()
            .filter(|&n| visited.insert(n))
            .collect();
        let mut depth = 1;

        while !frontier.is_empty() {
            let mut labelled: Vec<ContigId> = frontier
                .iter()
                .copied()
                .filter(|&n| snapshot.is_assigned(n))
                .collect();

            if !labelled.is_empty() {
                labelled.sort_unstable();
                return Evidence {
                    contigs: labelled,
                    depth,
                    explored: visited.len(),
                };
            }

            let mut next = Vec::new();
            for &n in &frontier {
                for &m in self.graph.neighbors(n) {
                    if visited.insert(m) {
                        next.push(m);
                    }
                }
            }
            frontier = next;
            depth += 1;
        }

        Evidence {
            contigs: Vec::new(),
            depth: 0,
            explored: visited.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize)]) -> AdjacencyGraph {
        let edges: Vec<_> = edges
            .iter()
            .map(|&(a, b)| (ContigId(a), ContigId(b)))
            .collect();
        AdjacencyGraph::from_edges(n, &edges)
    }

    fn bins(n_bins: usize, n: usize, assignment: &[(usize, usize)]) -> BinAssignment {
        let mut bins = BinAssignment::with_bin_count(n_bins, n);
        for &(contig, bin) in assignment {
            bins.insert(ContigId(contig), BinId(bin)).unwrap();
        }
        bins
    }

    fn path6() -> AdjacencyGraph {
        graph(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)])
    }

    #[test]
    fn test_consistent_contig_is_kept() {
        let g = path6();
        let mut b = bins(2, 6, &[(0, 0), (1, 0), (2, 0), (4, 1), (5, 1)]);
        let report = AmbiguityResolver::new(&g).resolve(&mut b);

        assert_eq!(report.total_removed(), 0);
        assert_eq!(b.bin_of(ContigId(2)), Some(BinId(0)));
    }

    #[test]
    fn test_conflicting_neighbour_removes_label() {
        let g = path6();
        let mut b = bins(2, 6, &[(0, 0), (2, 0), (1, 1), (4, 1), (5, 1)]);
        let report = AmbiguityResolver::new(&g).resolve(&mut b);

        assert_eq!(
            report.neighbor_removed,
            vec![ContigId(0), ContigId(1), ContigId(2)]
        );
        assert!(report.distance_removed.is_empty());
        assert!(!b.is_assigned(ContigId(2)));
        assert_eq!(b.bin_of(ContigId(4)), Some(BinId(1)));
        assert!(b.is_consistent());
    }

    #[test]
    fn test_neighbor_pass_reads_snapshot_only() {
        // 0 (bin 0) - 1 (bin 1) - 2 (bin 1): removing 0 first must not
        // rescue 1 within the same pass
        let g = graph(3, &[(0, 1), (1, 2)]);
        let b = bins(2, 3, &[(0, 0), (1, 1), (2, 1)]);
        let resolver = AmbiguityResolver::new(&g);

        let forward = resolver.neighbor_pass(&b.snapshot());
        assert_eq!(forward.flagged, vec![ContigId(0), ContigId(1)]);
        assert_eq!(forward.confirmed, vec![ContigId(2)]);

        let mut after_zero = b.clone();
        after_zero.remove(ContigId(0));
        let verdict = resolver.neighbor_verdict(ContigId(1), &b.snapshot());
        assert_eq!(verdict, Some(NeighborVerdict::Conflicting));
        assert_eq!(
            resolver.neighbor_verdict(ContigId(1), &after_zero.snapshot()),
            Some(NeighborVerdict::Confirmed)
        );
    }

    #[test]
    fn test_unassigned_has_no_verdict() {
        let g = path6();
        let b = bins(1, 6, &[(0, 0)]);
        let resolver = AmbiguityResolver::new(&g);
        assert_eq!(resolver.neighbor_verdict(ContigId(3), &b.snapshot()), None);
        assert_eq!(
            resolver.neighbor_verdict(ContigId(0), &b.snapshot()),
            Some(NeighborVerdict::Unsupported)
        );
    }

    #[test]
    fn test_distance_pass_removes_far_conflict() {
        // 0 (bin 0) - 1 - 2 (bin 1): nearest labelled contig of 0 is 2
        let g = graph(3, &[(0, 1), (1, 2)]);
        let mut b = bins(2, 3, &[(0, 0), (2, 1)]);
        let report = AmbiguityResolver::new(&g).resolve(&mut b);

        assert!(report.neighbor_removed.is_empty());
        assert_eq!(report.distance_removed, vec![ContigId(0), ContigId(2)]);
        assert_eq!(b.assigned_count(), 0);
    }

    #[test]
    fn test_distance_pass_keeps_nearest_agreement() {
        // 0 (bin 0) - 1 - 2 (bin 0) - 3 - 4 - 5 (bin 1)
        let g = path6();
        let mut b = bins(2, 6, &[(0, 0), (2, 0), (5, 1)]);
        let report = AmbiguityResolver::new(&g).resolve(&mut b);

        // 2 reaches 0 (bin 0) and 4 (unassigned) at distance two
        assert_eq!(report.distance_removed, vec![ContigId(5)]);
        assert_eq!(b.bin_of(ContigId(0)), Some(BinId(0)));
        assert_eq!(b.bin_of(ContigId(2)), Some(BinId(0)));
    }

    #[test]
    fn test_closest_labelled_keeps_ties() {
        // star: 0 in the middle, 1 and 2 labelled differently
        let g = graph(4, &[(0, 1), (0, 2), (0, 3)]);
        let b = bins(2, 4, &[(1, 0), (2, 1)]);
        let evidence = AmbiguityResolver::new(&g).closest_labelled(ContigId(0), &b.snapshot());
        assert_eq!(evidence.contigs, vec![ContigId(1), ContigId(2)]);
        assert_eq!(evidence.depth, 1);
    }

    #[test]
    fn test_closest_labelled_terminates_on_cycle() {
        // 5-cycle with no labels besides the start contig
        let g = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let b = bins(1, 5, &[(0, 0)]);
        let evidence = AmbiguityResolver::new(&g).closest_labelled(ContigId(0), &b.snapshot());

        assert!(evidence.contigs.is_empty());
        assert_eq!(evidence.depth, 0);
        assert_eq!(evidence.explored, 5);
    }

    #[test]
    fn test_closest_labelled_depth() {
        let g = path6();
        let b = bins(1, 6, &[(0, 0), (4, 0)]);
        let evidence = AmbiguityResolver::new(&g).closest_labelled(ContigId(0), &b.snapshot());
        assert_eq!(evidence.contigs, vec![ContigId(4)]);
        assert_eq!(evidence.depth, 4);
    }

    #[test]
    fn test_cleanup_only_uses_direct_neighbours() {
        let g = graph(3, &[(0, 1), (1, 2)]);
        let mut b = bins(2, 3, &[(0, 0), (2, 1)]);
        let removed = AmbiguityResolver::new(&g).cleanup(&mut b);
        assert!(removed.is_empty());
        assert_eq!(b.assigned_count(), 2);
    }
}
