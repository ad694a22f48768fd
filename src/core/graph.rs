use crate::core::types::ContigId;

/// Undirected, simple contig adjacency graph.
///
/// Built once by [`GraphBuilder`](crate::graph::builder::GraphBuilder) and
/// never mutated afterwards. Neighbour lists are sorted and free of
/// duplicates and self-loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyGraph {
    adjacency: Vec<Vec<ContigId>>,
    edge_count: usize,
}

impl AdjacencyGraph {
    /// Create a graph from an arbitrary edge list, simplifying it.
    ///
    /// Parallel edges collapse into one and self-loops are dropped. Edges
    /// referring to a vertex outside `[0, node_count)` are ignored.
    #[must_use]
    pub fn from_edges(node_count: usize, edges: &[(ContigId, ContigId)]) -> Self {
        let mut adjacency: Vec<Vec<ContigId>> = vec![Vec::new(); node_count];

        for &(a, b) in edges {
            if a == b || a.index() >= node_count || b.index() >= node_count {
                continue;
            }
            adjacency[a.index()].push(b);
            adjacency[b.index()].push(a);
        }

        let mut degree_sum = 0;
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
            neighbours.dedup();
            degree_sum += neighbours.len();
        }

        Self {
            adjacency,
            edge_count: degree_sum / 2,
        }
    }

    /// A graph with `node_count` vertices and no edges
    #[must_use]
    pub fn isolated(node_count: usize) -> Self {
        Self::from_edges(node_count, &[])
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Sorted neighbours of `contig`; empty for ids outside the graph
    #[must_use]
    pub fn neighbors(&self, contig: ContigId) -> &[ContigId] {
        self.adjacency
            .get(contig.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn degree(&self, contig: ContigId) -> usize {
        self.neighbors(contig).len()
    }

    pub fn contigs(&self) -> impl Iterator<Item = ContigId> {
        (0..self.adjacency.len()).map(ContigId)
    }

    /// Every edge once, as `(low, high)` in ascending order
    pub fn edges(&self) -> impl Iterator<Item = (ContigId, ContigId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, neighbours)| {
            neighbours
                .iter()
                .filter(move |n| n.index() > i)
                .map(move |&n| (ContigId(i), n))
        })
    }

    /// Number of vertices with no incident edge
    #[must_use]
    pub fn isolated_count(&self) -> usize {
        self.adjacency.iter().filter(|n| n.is_empty()).count()
    }
}
