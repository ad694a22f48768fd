//! End-to-end refinement tests
//!
//! These tests drive the library from assembler text through parsing, graph
//! construction and refinement to the formatted result files.

use graphbin::core::bins::BinAssignment;
use graphbin::core::types::{BinId, ContigId};
use graphbin::output::writer::format_bins_csv;
use graphbin::parsing::assembly::{megahit_records, spades_records};
use graphbin::parsing::bins::{build_assignment, parse_bins_text};
use graphbin::parsing::gfa::parse_gfa_text;
use graphbin::parsing::paths::parse_paths_text;
use graphbin::refine::assembler::ResultAssembler;
use graphbin::refine::components::ComponentAnalyzer;
use graphbin::refine::propagation::{PropagationInput, PropagationOracle};
use graphbin::refine::resolver::AmbiguityResolver;
use graphbin::{
    build_graph, AdjacencyGraph, AssemblyRecords, LabelPropagation, PropagationParams,
    RefinePipeline,
};

/// Six single-segment SPAdes contigs NODE_1..NODE_6 linked in a chain
fn spades_chain() -> AssemblyRecords {
    let mut gfa = String::from("H\tVN:Z:1.0\n");
    let mut paths = String::new();
    for n in 1..=6 {
        gfa.push_str(&format!("S\t{n}\tACGT\n"));
        paths.push_str(&format!("NODE_{n}_length_4_cov_1.0\n{n}+\n"));
        paths.push_str(&format!("NODE_{n}_length_4_cov_1.0'\n{n}-\n"));
    }
    for n in 1..6 {
        gfa.push_str(&format!("L\t{n}\t+\t{}\t+\t0M\n", n + 1));
    }

    spades_records(
        parse_gfa_text(&gfa).unwrap(),
        parse_paths_text(&paths).unwrap(),
    )
}

fn refine(records: &AssemblyRecords, binning: &str) -> (AdjacencyGraph, BinAssignment) {
    let graph = build_graph(records).unwrap();
    let entries = parse_bins_text(binning).unwrap();
    let bins = build_assignment(&entries, &records.contigs).unwrap();

    let oracle = LabelPropagation::new();
    let outcome = RefinePipeline::new(&graph, &oracle, PropagationParams::default())
        .run(bins)
        .unwrap();
    assert!(outcome.bins.is_consistent());
    (graph, outcome.bins)
}

#[test]
fn test_spades_chain_graph() {
    let records = spades_chain();
    let graph = build_graph(&records).unwrap();

    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.edge_count(), 5);
    let edges: Vec<(usize, usize)> = graph.edges().map(|(a, b)| (a.index(), b.index())).collect();
    assert_eq!(edges, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
}

#[test]
fn test_consistent_label_is_kept() {
    let records = spades_chain();
    let (_, bins) = refine(&records, "NODE_1,1\nNODE_2,1\nNODE_3,1\nNODE_5,2\nNODE_6,2\n");

    // NODE_3 agrees with its only labelled neighbour and stays in bin 1
    assert_eq!(bins.bin_of(ContigId(2)), Some(BinId(0)));
    assert_eq!(bins.bin_of(ContigId(0)), Some(BinId(0)));
    assert_eq!(bins.bin_of(ContigId(5)), Some(BinId(1)));

    // NODE_4 sits between the two bins; once labelled it conflicts with one
    // side, so the final cleanup leaves it and its conflicting neighbour out
    assert_eq!(bins.bin_of(ContigId(3)), None);
    assert_eq!(bins.bin_of(ContigId(4)), None);
}

#[test]
fn test_contradicted_label_is_replaced() {
    let records = spades_chain();
    let (_, bins) = refine(&records, "NODE_1,1\nNODE_3,1\nNODE_2,2\nNODE_5,2\nNODE_6,2\n");

    // NODE_3's only labelled neighbour was in bin 2; it is stripped of bin 1
    // and diffusion then places it, and every other contig, in bin 2
    for i in 0..6 {
        assert_eq!(bins.bin_of(ContigId(i)), Some(BinId(1)), "contig {i}");
    }

    let csv = format_bins_csv(&bins, &records.contigs).unwrap();
    assert_eq!(
        csv,
        "NODE_1,2\nNODE_2,2\nNODE_3,2\nNODE_4,2\nNODE_5,2\nNODE_6,2\n"
    );
}

#[test]
fn test_component_without_labels_stays_unbinned() {
    let gfa = "S\tNODE_1_length_9\t*\nS\tNODE_2_length_9\t*\nS\tNODE_3_length_9\t*\n\
               S\tNODE_4_length_9\t*\n\
               L\tNODE_1_length_9\t+\tNODE_2_length_9\t+\t0M\n\
               L\tNODE_3_length_9\t+\tNODE_4_length_9\t-\t0M\n";
    let records = megahit_records(parse_gfa_text(gfa).unwrap()).unwrap();
    let (graph, bins) = refine(&records, "NODE_1,4\n");

    assert_eq!(graph.edge_count(), 2);
    assert_eq!(bins.bin_of(ContigId(1)), Some(BinId(0)));
    assert_eq!(bins.bin_of(ContigId(2)), None);
    assert_eq!(bins.bin_of(ContigId(3)), None);

    let csv = format_bins_csv(&bins, &records.contigs).unwrap();
    assert_eq!(
        csv,
        "NODE_1,4\nNODE_2,4\nNODE_3,unbinned\nNODE_4,unbinned\n"
    );
}

#[test]
fn test_merge_is_idempotent() {
    let records = spades_chain();
    let graph = build_graph(&records).unwrap();
    let entries = parse_bins_text("NODE_1,1\nNODE_2,1\nNODE_5,2\nNODE_6,2\n").unwrap();
    let mut bins = build_assignment(&entries, &records.contigs).unwrap();

    AmbiguityResolver::new(&graph).resolve(&mut bins);
    let eligibility = ComponentAnalyzer::new(&graph).analyze(&bins);
    let input = PropagationInput::from_assignment(&graph, &bins, &eligibility);
    let output = LabelPropagation::new()
        .propagate(&input, &PropagationParams::default())
        .unwrap();

    let assembler = ResultAssembler::new(&graph);
    let first = assembler.merge(&mut bins, &output).unwrap();
    assert_eq!(first, vec![ContigId(2), ContigId(3)]);
    let once = bins.clone();
    let added = assembler.merge(&mut bins, &output).unwrap();

    assert!(added.is_empty());
    assert_eq!(bins, once);
}

#[test]
fn test_partition_invariant_holds_throughout() {
    let records = spades_chain();
    let graph = build_graph(&records).unwrap();
    let entries = parse_bins_text("NODE_1,1\nNODE_2,2\nNODE_4,1\nNODE_6,3\n").unwrap();
    let mut bins = build_assignment(&entries, &records.contigs).unwrap();
    assert!(bins.is_consistent());

    let resolver = AmbiguityResolver::new(&graph);
    resolver.resolve(&mut bins);
    assert!(bins.is_consistent());

    let eligibility = ComponentAnalyzer::new(&graph).analyze(&bins);
    let input = PropagationInput::from_assignment(&graph, &bins, &eligibility);
    let output = LabelPropagation::new()
        .propagate(&input, &PropagationParams::default())
        .unwrap();
    ResultAssembler::new(&graph)
        .assemble(&mut bins, &output)
        .unwrap();
    assert!(bins.is_consistent());

    let mut seen = vec![false; bins.node_count()];
    for bin in 0..bins.n_bins() {
        for contig in bins.members(BinId(bin)).unwrap() {
            assert!(!seen[contig.index()], "{contig} is in two bins");
            seen[contig.index()] = true;
        }
    }
}

#[test]
fn test_empty_binning_leaves_everything_unbinned() {
    let records = spades_chain();
    let (_, bins) = refine(&records, "# nothing binned yet\n");
    assert_eq!(bins.n_bins(), 0);
    assert_eq!(bins.assigned_count(), 0);
}

#[test]
fn test_contig_ids_follow_paths_order() {
    let paths = "NODE_7_length_4\n1+\nNODE_3_length_4\n2+\n";
    let records = spades_records(
        parse_gfa_text("L\t1\t+\t2\t+\t0M\n").unwrap(),
        parse_paths_text(paths).unwrap(),
    );
    assert_eq!(records.contigs.external(ContigId(0)), Some(7));
    assert_eq!(records.contigs.external(ContigId(1)), Some(3));

    let graph = build_graph(&records).unwrap();
    assert_eq!(graph.neighbors(ContigId(0)), &[ContigId(1)]);
}
