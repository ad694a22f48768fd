use std::collections::HashSet;

use tracing::info;

use crate::core::bins::BinAssignment;
use crate::core::graph::AdjacencyGraph;
use crate::core::types::ContigId;

/// Which contigs may take part in label propagation.
///
/// A contig is eligible iff its connected component contains at least one
/// assigned contig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    flags: Vec<bool>,
    /// Number of connected components in the graph
    pub components: usize,
    /// Components that contain at least one assigned contig
    pub labelled_components: usize,
}

impl Eligibility {
    #[must_use]
    pub fn is_eligible(&self, contig: ContigId) -> bool {
        self.flags.get(contig.index()).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    #[must_use]
    pub fn eligible_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn eligible(&self) -> impl Iterator<Item = ContigId> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, &f)| f)
            .map(|(i, _)| ContigId(i))
    }

    /// Contigs left out of propagation, in id order
    pub fn excluded(&self) -> impl Iterator<Item = ContigId> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, &f)| !f)
            .map(|(i, _)| ContigId(i))
    }
}

/// Splits the graph into connected components and marks the labelled ones
pub struct ComponentAnalyzer<'a> {
    graph: &'a AdjacencyGraph,
}

impl<'a> ComponentAnalyzer<'a> {
    #[must_use]
    pub fn new(graph: &'a AdjacencyGraph) -> Self {
        Self { graph }
    }

    /// Compute eligibility against the current assignment
    #[must_use]
    pub fn analyze(&self, bins: &BinAssignment) -> Eligibility {
        let node_count = self.graph.node_count();
        let mut flags = vec![false; node_count];
        let mut visited = vec![false; node_count];
        let mut components = 0;
        let mut labelled_components = 0;

        for contig in self.graph.contigs() {
            if visited[contig.index()] {
                continue;
            }

            let members = self.closure(&[contig]);
            components += 1;
            for member in &members {
                visited[member.index()] = true;
            }

            if members.iter().any(|&m| bins.is_assigned(m)) {
                labelled_components += 1;
                for member in &members {
                    flags[member.index()] = true;
                }
            }
        }

        let eligibility = Eligibility {
            flags,
            components,
            labelled_components,
        };

        info!(
            "{} of {} contigs are in components with labels ({} of {} components)",
            eligibility.eligible_count(),
            node_count,
            labelled_components,
            components
        );

        eligibility
    }

    /// Grow `seeds` by adding neighbours of members until a full sweep over
    /// the member list adds nothing. Returns members in ascending order.
    #[must_use]
    pub fn closure(&self, seeds: &[ContigId]) -> Vec<ContigId> {
        let mut seen: HashSet<ContigId> = HashSet::new();
        let mut members: Vec<ContigId> = Vec::new();
        for &seed in seeds {
            if seen.insert(seed) {
                members.push(seed);
            }
        }

        loop {
            let size = members.len();
            let mut i = 0;
            while i < members.len() {
                for &n in self.graph.neighbors(members[i]) {
                    if seen.insert(n) {
                        members.push(n);
                    }
                }
                i += 1;
            }
            if members.len() == size {
                break;
            }
        }

        members.sort_unstable();
        members
    }
}
