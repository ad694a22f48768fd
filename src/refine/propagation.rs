//! Label propagation over the eligible part of the graph.
//!
//! The diffusion itself sits behind [`PropagationOracle`] so the resolver and
//! component logic never depend on a particular solver. [`LabelPropagation`]
//! is the built-in implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::bins::BinAssignment;
use crate::core::graph::AdjacencyGraph;
use crate::core::types::ContigId;
use crate::refine::components::Eligibility;

/// Default convergence threshold
pub const DEFAULT_DIFF_THRESHOLD: f64 = 0.1;

/// Default iteration cap
pub const DEFAULT_MAX_ITERATION: usize = 100;

/// Weight given to every assembly graph edge
pub const EDGE_WEIGHT: f64 = 1.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropagationError {
    #[error("contig {contig} has label {label}, outside 0..={n_bins}")]
    LabelOutOfRange {
        contig: ContigId,
        label: usize,
        n_bins: usize,
    },

    #[error("propagation returned label {label} for contig {contig}; expected 1..={n_bins}")]
    InvalidResult {
        contig: ContigId,
        label: usize,
        n_bins: usize,
    },

    #[error("propagation returned contig {0}, which was not in its input")]
    UnknownContig(ContigId),
}

/// Tuning for the iterative diffusion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropagationParams {
    /// Stop once the largest per-entry confidence change drops below this
    pub diff_threshold: f64,
    /// Hard cap on the number of iterations
    pub max_iteration: usize,
}

impl Default for PropagationParams {
    fn default() -> Self {
        Self {
            diff_threshold: DEFAULT_DIFF_THRESHOLD,
            max_iteration: DEFAULT_MAX_ITERATION,
        }
    }
}

/// One eligible contig as handed to the oracle
#[derive(Debug, Clone, PartialEq)]
pub struct OracleNode {
    pub contig: ContigId,
    /// 0 = unassigned, otherwise `BinId + 1`
    pub label: usize,
    pub neighbors: Vec<(ContigId, f64)>,
}

/// Oracle input: every eligible contig with its label and weighted edges
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationInput {
    pub n_bins: usize,
    pub nodes: Vec<OracleNode>,
}

impl PropagationInput {
    /// Collect eligible contigs; ineligible ones are left out entirely
    #[must_use]
    pub fn from_assignment(
        graph: &AdjacencyGraph,
        bins: &BinAssignment,
        eligibility: &Eligibility,
    ) -> Self {
        let nodes = eligibility
            .eligible()
            .map(|contig| OracleNode {
                contig,
                label: bins.bin_of(contig).map_or(0, |b| b.index() + 1),
                neighbors: graph
                    .neighbors(contig)
                    .iter()
                    .map(|&n| (n, EDGE_WEIGHT))
                    .collect(),
            })
            .collect();

        Self {
            n_bins: bins.n_bins(),
            nodes,
        }
    }

    #[must_use]
    pub fn labelled_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.label != 0).count()
    }
}

/// Oracle output: one label in `1..=n_bins` per input contig
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationOutput {
    pub labels: Vec<(ContigId, usize)>,
    pub iterations: usize,
    pub converged: bool,
}

/// Anything that can turn a partial labelling into a complete one
pub trait PropagationOracle {
    /// # Errors
    ///
    /// Returns `PropagationError` if the input violates the label contract.
    fn propagate(
        &self,
        input: &PropagationInput,
        params: &PropagationParams,
    ) -> Result<PropagationOutput, PropagationError>;
}

/// Iterative label diffusion with clamped seeds.
///
/// Labelled nodes keep a one-hot confidence vector; unlabelled nodes start
/// with no mass and take the normalised weighted sum of their neighbours'
/// previous vectors each iteration (a node none of whose neighbours carry
/// mass yet keeps its vector). The final label is the arg-max bin, lowest
/// index on ties, so every node resolves to some bin.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelPropagation;

impl LabelPropagation {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PropagationOracle for LabelPropagation {
    fn propagate(
        &self,
        input: &PropagationInput,
        params: &PropagationParams,
    ) -> Result<PropagationOutput, PropagationError> {
        let n_bins = input.n_bins;
        for node in &input.nodes {
            if node.label > n_bins {
                return Err(PropagationError::LabelOutOfRange {
                    contig: node.contig,
                    label: node.label,
                    n_bins,
                });
            }
        }

        if n_bins == 0 || input.nodes.is_empty() {
            return Ok(PropagationOutput {
                labels: Vec::new(),
                iterations: 0,
                converged: true,
            });
        }

        let row_of: HashMap<ContigId, usize> = input
            .nodes
            .iter()
            .enumerate()
            .map(|(row, node)| (node.contig, row))
            .collect();

        let mut confidence: Vec<Vec<f64>> = input
            .nodes
            .iter()
            .map(|node| {
                if node.label == 0 {
                    vec![0.0; n_bins]
                } else {
                    let mut one_hot = vec![0.0; n_bins];
                    one_hot[node.label - 1] = 1.0;
                    one_hot
                }
            })
            .collect();

        info!(
            "Starting label propagation over {} contigs ({} labelled) with eps={} and max_iteration={}",
            input.nodes.len(),
            input.labelled_count(),
            params.diff_threshold,
            params.max_iteration
        );

        let mut iterations = 0;
        let mut converged = false;

        while iterations < params.max_iteration {
            let mut next = confidence.clone();
            let mut delta: f64 = 0.0;

            for (row, node) in input.nodes.iter().enumerate() {
                if node.label != 0 {
                    continue;
                }

                let mut acc = vec![0.0; n_bins];
                for (neighbour, weight) in &node.neighbors {
                    if let Some(&j) = row_of.get(neighbour) {
                        for (a, c) in acc.iter_mut().zip(&confidence[j]) {
                            *a += weight * c;
                        }
                    }
                }

                let total: f64 = acc.iter().sum();
                if total <= 0.0 {
                    continue;
                }
                for a in &mut acc {
                    *a /= total;
                }

                for (a, c) in acc.iter().zip(&confidence[row]) {
                    delta = delta.max((a - c).abs());
                }
                next[row] = acc;
            }

            confidence = next;
            iterations += 1;
            debug!("Iteration {iterations}: max change {delta:.6}");

            if delta < params.diff_threshold {
                converged = true;
                break;
            }
        }

        if converged {
            info!("Label propagation converged after {iterations} iterations");
        } else {
            warn!(
                "Label propagation did not converge within {} iterations; using last state",
                params.max_iteration
            );
        }

        let labels = input
            .nodes
            .iter()
            .zip(&confidence)
            .map(|(node, row)| {
                let label = if node.label == 0 {
                    arg_max(row) + 1
                } else {
                    node.label
                };
                (node.contig, label)
            })
            .collect();

        Ok(PropagationOutput {
            labels,
            iterations,
            converged,
        })
    }
}

/// Index of the largest entry; the first one wins ties
fn arg_max(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(contig: usize, label: usize, neighbors: &[usize]) -> OracleNode {
        OracleNode {
            contig: ContigId(contig),
            label,
            neighbors: neighbors.iter().map(|&n| (ContigId(n), 1.0)).collect(),
        }
    }

    fn label_of(output: &PropagationOutput, contig: usize) -> usize {
        output
            .labels
            .iter()
            .find(|(c, _)| *c == ContigId(contig))
            .map(|&(_, l)| l)
            .unwrap()
    }

    #[test]
    fn test_chain_takes_nearest_seed() {
        // 0(1) - 1 - 2 - 3 - 4(2)
        let input = PropagationInput {
            n_bins: 2,
            nodes: vec![
                node(0, 1, &[1]),
                node(1, 0, &[0, 2]),
                node(2, 0, &[1, 3]),
                node(3, 0, &[2, 4]),
                node(4, 2, &[3]),
            ],
        };
        let params = PropagationParams {
            diff_threshold: 1e-6,
            max_iteration: 1000,
        };
        let output = LabelPropagation::new().propagate(&input, &params).unwrap();

        assert!(output.converged);
        assert_eq!(label_of(&output, 0), 1);
        assert_eq!(label_of(&output, 1), 1);
        assert_eq!(label_of(&output, 3), 2);
        assert_eq!(label_of(&output, 4), 2);
        assert_eq!(output.labels.len(), 5);
    }

    #[test]
    fn test_every_result_is_a_bin() {
        let input = PropagationInput {
            n_bins: 3,
            nodes: vec![node(0, 3, &[1]), node(1, 0, &[0, 2]), node(2, 0, &[1])],
        };
        let output = LabelPropagation::new()
            .propagate(&input, &PropagationParams::default())
            .unwrap();
        assert!(output.labels.iter().all(|&(_, l)| (1..=3).contains(&l)));
        assert_eq!(label_of(&output, 2), 3);
    }

    #[test]
    fn test_iteration_cap_is_respected() {
        let input = PropagationInput {
            n_bins: 2,
            nodes: vec![
                node(0, 1, &[1]),
                node(1, 0, &[0, 2]),
                node(2, 0, &[1, 3]),
                node(3, 2, &[2]),
            ],
        };
        let params = PropagationParams {
            diff_threshold: 0.0,
            max_iteration: 3,
        };
        let output = LabelPropagation::new().propagate(&input, &params).unwrap();
        assert_eq!(output.iterations, 3);
        assert!(!output.converged);
        assert_eq!(output.labels.len(), 4);
    }

    #[test]
    fn test_label_out_of_range() {
        let input = PropagationInput {
            n_bins: 1,
            nodes: vec![node(0, 2, &[])],
        };
        let result = LabelPropagation::new().propagate(&input, &PropagationParams::default());
        assert!(matches!(
            result,
            Err(PropagationError::LabelOutOfRange { label: 2, .. })
        ));
    }

    #[test]
    fn test_no_bins() {
        let input = PropagationInput {
            n_bins: 0,
            nodes: vec![node(0, 0, &[])],
        };
        let output = LabelPropagation::new()
            .propagate(&input, &PropagationParams::default())
            .unwrap();
        assert!(output.labels.is_empty());
    }

    #[test]
    fn test_arg_max_prefers_first() {
        assert_eq!(arg_max(&[0.5, 0.5]), 0);
        assert_eq!(arg_max(&[0.1, 0.7, 0.2]), 1);
    }
}
