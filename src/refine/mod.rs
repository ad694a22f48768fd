//! Graph-based refinement of an initial binning.
//!
//! The stages run in this order:
//!
//! 1. [`AmbiguityResolver`](resolver::AmbiguityResolver): strips labels that
//!    contradict the graph, first by direct-neighbour consensus and then by a
//!    breadth-first search for the closest labelled contigs
//! 2. [`ComponentAnalyzer`](components::ComponentAnalyzer): marks contigs whose
//!    connected component still holds a label as eligible for propagation
//! 3. [`PropagationOracle`](propagation::PropagationOracle): fills in labels
//!    for eligible contigs
//! 4. [`ResultAssembler`](assembler::ResultAssembler): merges the propagated
//!    labels without overwriting and re-runs the direct-neighbour cleanup
//!
//! [`RefinePipeline`](pipeline::RefinePipeline) wires the stages together.
//!
//! ## Snapshots
//!
//! Each removal pass evaluates every contig against a frozen
//! [`BinSnapshot`](crate::core::bins::BinSnapshot) and applies all of its
//! removals afterwards. Evaluation is parallel (rayon) and the result does
//! not depend on the order contigs are visited.

pub mod assembler;
pub mod components;
pub mod pipeline;
pub mod propagation;
pub mod resolver;

pub use pipeline::{RefineConfig, RefineOutcome, RefinePipeline, RefineStats};
pub use propagation::{LabelPropagation, PropagationOracle, PropagationParams};
