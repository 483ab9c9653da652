use super::*;
use crate::error::EvoError;
use crate::seq::SequenceInputs;
use proptest::prelude::*;

fn labels(names: &[&str]) -> Vec<Box<str>> {
    names
        .iter()
        .map(|s| s.to_string().into_boxed_str())
        .collect()
}

fn tri(names: &[&str], rows: Vec<Vec<f64>>) -> DistanceMatrix {
    DistanceMatrix::from_lower_triangle(labels(names), rows).unwrap()
}

fn leaf_by_label(tree: &PhyloTree, label: &str) -> usize {
    tree.leaves()
        .into_iter()
        .find(|&i| tree.node(i).label.as_deref() == Some(label))
        .unwrap()
}

fn branch(tree: &PhyloTree, label: &str) -> f64 {
    tree.node(leaf_by_label(tree, label)).branch_length.unwrap()
}

// ─── DistanceMatrix ─────────────────────────────────────────

#[test]
fn dm_lower_triangle_access() {
    let dm = tri(&["a", "b", "c"], vec![vec![], vec![1.5], vec![2.0, 3.0]]);
    assert_eq!(dm.n(), 3);
    assert_eq!(dm.get(1, 0), 1.5);
    assert_eq!(dm.get(0, 1), 1.5);
    assert_eq!(dm.get(2, 1), 3.0);
    assert_eq!(dm.get(1, 2), 3.0);
    assert_eq!(dm.get(2, 2), 0.0);
    assert_eq!(dm.lower_triangle(), vec![&[][..], &[1.5][..], &[2.0, 3.0][..]]);
}

#[test]
fn dm_accepts_trailing_diagonal() {
    let dm = tri(&["a", "b"], vec![vec![0.0], vec![0.7, 0.0]]);
    assert!((dm.get(0, 1) - 0.7).abs() < 1e-12);
}

#[test]
fn dm_rejects_bad_rows() {
    let err = DistanceMatrix::from_lower_triangle(labels(&["a", "b"]), vec![vec![], vec![]])
        .unwrap_err();
    assert!(matches!(err, EvoError::TriangleShape { row: 1, .. }));

    let err = DistanceMatrix::from_lower_triangle(labels(&["a", "b"]), vec![vec![]]).unwrap_err();
    assert!(matches!(err, EvoError::LabelCountMismatch { .. }));
}

#[test]
fn dm_set_symmetric() {
    let mut dm = DistanceMatrix::zeros(labels(&["a", "b", "c"]));
    dm.set(0, 2, 5.0);
    assert_eq!(dm.get(0, 2), 5.0);
    assert_eq!(dm.get(2, 0), 5.0);
    dm.set(1, 1, 9.0);
    assert_eq!(dm.get(1, 1), 0.0);
}

#[test]
fn dm_to_square() {
    let dm = tri(&["a", "b"], vec![vec![], vec![0.25]]);
    assert_eq!(dm.to_square(), vec![vec![0.0, 0.25], vec![0.25, 0.0]]);
}

// ─── padding + identity distances ───────────────────────────

#[test]
fn pad_to_longest() {
    let seqs: Vec<&[u8]> = vec![b"ATG", b"ATGCA", b""];
    let padded = pad_sequences(&seqs);
    assert_eq!(padded, vec![b"ATG--".to_vec(), b"ATGCA".to_vec(), b"-----".to_vec()]);
}

#[test]
fn identity_known() {
    let seqs: Vec<&[u8]> = vec![b"ACGT", b"ATAT", b"ACGT"];
    let dm = build_distance_matrix(labels(&["a", "b", "c"]), &seqs).unwrap();
    assert!((dm.get(1, 0) - 0.5).abs() < 1e-12);
    assert!((dm.get(2, 0) - 0.0).abs() < 1e-12);
    assert!((dm.get(2, 1) - 0.5).abs() < 1e-12);
}

#[test]
fn identity_counts_gaps_as_characters() {
    let seqs: Vec<&[u8]> = vec![b"AC--", b"AC--", b"ACG-"];
    let dm = build_distance_matrix(labels(&["a", "b", "c"]), &seqs).unwrap();
    assert_eq!(dm.get(1, 0), 0.0);
    assert!((dm.get(2, 0) - 0.25).abs() < 1e-12);
}

#[test]
fn identity_of_empty_sequences_is_one() {
    let seqs: Vec<&[u8]> = vec![b"", b""];
    let dm = build_distance_matrix(labels(&["a", "b"]), &seqs).unwrap();
    assert_eq!(dm.get(1, 0), 1.0);
}

#[test]
fn matrix_needs_two_sequences() {
    let seqs: Vec<&[u8]> = vec![b"ACGT"];
    let err = build_distance_matrix(labels(&["a"]), &seqs).unwrap_err();
    assert!(matches!(err, EvoError::InsufficientInput { needed: 2, found: 1, .. }));
}

#[test]
fn matrix_label_count_mismatch() {
    let seqs: Vec<&[u8]> = vec![b"ACGT", b"ACGT"];
    assert!(build_distance_matrix(labels(&["a"]), &seqs).is_err());
}

#[test]
fn matrix_rejects_unpadded_input() {
    let seqs: Vec<&[u8]> = vec![b"ACGT", b"ACG"];
    let err = build_distance_matrix(labels(&["a", "b"]), &seqs).unwrap_err();
    assert!(matches!(err, EvoError::SequenceLengthMismatch { index: 1, .. }));
}

#[test]
fn matrix_from_collected_sequences() {
    let set = SequenceInputs::new()
        .without_namespaces()
        .with_pasted(
            &b">seq1\nATGCTAGCTAGCTACGATCG\n>seq2\nATGCTAGCTAGCTACGATGG\n>seq3\nATGCTAGCTAGATACGATCG\n"[..],
        )
        .collect();
    let dm = distance_matrix_from_set(&set).unwrap();
    assert_eq!(&*dm.labels()[0], "seq1");
    assert!((dm.get(1, 0) - 0.05).abs() < 1e-12);
    assert!((dm.get(2, 0) - 0.05).abs() < 1e-12);
    assert!((dm.get(2, 1) - 0.10).abs() < 1e-12);
}

#[test]
fn matrix_from_ragged_set_pads() {
    let set = SequenceInputs::new()
        .with_manual("a", "ATGC")
        .with_manual("b", "ATG")
        .collect();
    let dm = distance_matrix_from_set(&set).unwrap();
    assert!((dm.get(1, 0) - 0.25).abs() < 1e-12);
}

// ─── UPGMA ──────────────────────────────────────────────────

#[test]
fn upgma_two_taxa() {
    let dm = tri(&["X", "Y"], vec![vec![], vec![6.0]]);
    let tree = upgma(&dm).unwrap();
    assert_eq!(tree.num_leaves(), 2);
    assert_eq!(tree.num_nodes(), 3);
    assert!(tree.is_rooted());
    for leaf in tree.leaves() {
        assert!((tree.node(leaf).branch_length.unwrap() - 3.0).abs() < 1e-10);
    }
    assert_eq!(tree.node(tree.root()).branch_length, None);
}

#[test]
fn upgma_ultrametric() {
    // (((A:1,B:1):1,C:2):0,D:2)
    let dm = tri(
        &["A", "B", "C", "D"],
        vec![vec![], vec![2.0], vec![4.0, 4.0], vec![4.0, 4.0, 4.0]],
    );
    let tree = upgma(&dm).unwrap();
    assert_eq!(tree.num_leaves(), 4);
    assert_eq!(tree.num_nodes(), 7);
    for leaf in tree.leaves() {
        assert!((tree.distance_to_root(leaf) - 2.0).abs() < 1e-10);
    }
    assert!((branch(&tree, "A") - 1.0).abs() < 1e-10);
    assert!((branch(&tree, "C") - 2.0).abs() < 1e-10);
}

#[test]
fn upgma_ties_follow_slot_order() {
    // After A+B merge, all remaining pairs are at 4.0; the AB cluster and C
    // come first in slot order.
    let dm = tri(
        &["A", "B", "C", "D"],
        vec![vec![], vec![2.0], vec![4.0, 4.0], vec![4.0, 4.0, 4.0]],
    );
    let tree = upgma(&dm).unwrap();
    let c = leaf_by_label(&tree, "C");
    let d = leaf_by_label(&tree, "D");
    let a = leaf_by_label(&tree, "A");
    let ab = tree.node(a).parent.unwrap();
    let abc = tree.node(c).parent.unwrap();
    assert_eq!(tree.node(abc).children, vec![ab, c]);
    assert_eq!(tree.node(d).parent, Some(tree.root()));
}

#[test]
fn upgma_weights_by_cluster_size() {
    // A,B join at 1; d(AB,C) = (4*1 + 6*1)/2 = 5
    let dm = tri(&["A", "B", "C"], vec![vec![], vec![2.0], vec![4.0, 6.0]]);
    let tree = upgma(&dm).unwrap();
    assert_eq!(tree.num_nodes(), 5);
    assert!((branch(&tree, "C") - 2.5).abs() < 1e-10);
    let ab = tree.node(leaf_by_label(&tree, "A")).parent.unwrap();
    assert!((tree.node(ab).branch_length.unwrap() - 1.5).abs() < 1e-10);
}

#[test]
fn upgma_needs_two_leaves() {
    let dm = DistanceMatrix::zeros(labels(&["only"]));
    assert!(matches!(
        upgma(&dm),
        Err(EvoError::InsufficientInput { needed: 2, found: 1, .. })
    ));
}

// ─── NJ ─────────────────────────────────────────────────────

fn simple_4taxa_dm() -> DistanceMatrix {
    // Additive distances for ((A:1,B:1):1,(C:1,D:1):1)
    tri(
        &["A", "B", "C", "D"],
        vec![vec![], vec![2.0], vec![4.0, 4.0], vec![4.0, 4.0, 2.0]],
    )
}

#[test]
fn nj_recovers_additive_tree() {
    let tree = neighbor_joining(&simple_4taxa_dm()).unwrap();
    assert_eq!(tree.num_leaves(), 4);
    assert_eq!(tree.num_nodes(), 6);
    assert!(!tree.is_rooted());
    for leaf in tree.leaves() {
        let bl = tree.node(leaf).branch_length.unwrap();
        assert!((bl - 1.0).abs() < 1e-10, "leaf {:?} has {}", tree.node(leaf).label, bl);
    }
    let ab = tree.node(leaf_by_label(&tree, "A")).parent.unwrap();
    assert!((tree.node(ab).branch_length.unwrap() - 2.0).abs() < 1e-10);
}

#[test]
fn nj_ties_follow_slot_order() {
    // Every Q value ties; slots 0 and 1 join first, then 0, 2, 3 meet at the root.
    let dm = tri(
        &["A", "B", "C", "D"],
        vec![vec![], vec![1.0], vec![1.0, 1.0], vec![1.0, 1.0, 1.0]],
    );
    let tree = neighbor_joining(&dm).unwrap();
    let u = tree.node(0).parent.unwrap();
    assert_eq!(tree.node(u).children, vec![0, 1]);
    assert_eq!(tree.node(tree.root()).children, vec![u, 2, 3]);
    assert!((tree.node(0).branch_length.unwrap() - 0.5).abs() < 1e-10);
    assert!((tree.node(u).branch_length.unwrap() - 0.0).abs() < 1e-10);
    assert!((tree.node(2).branch_length.unwrap() - 0.5).abs() < 1e-10);
}

#[test]
fn nj_three_taxa_join_at_root() {
    let dm = tri(&["1", "2", "3"], vec![vec![], vec![0.2], vec![0.5, 0.5]]);
    let tree = neighbor_joining(&dm).unwrap();
    assert_eq!(tree.num_nodes(), 4);
    assert_eq!(tree.node(tree.root()).children.len(), 3);
    assert!((branch(&tree, "1") - 0.1).abs() < 1e-10);
    assert!((branch(&tree, "2") - 0.1).abs() < 1e-10);
    assert!((branch(&tree, "3") - 0.4).abs() < 1e-10);
}

#[test]
fn nj_two_taxa() {
    let dm = tri(&["X", "Y"], vec![vec![], vec![3.0]]);
    let tree = neighbor_joining(&dm).unwrap();
    assert_eq!(tree.num_leaves(), 2);
    assert_eq!(tree.node(tree.root()).children.len(), 2);
    for leaf in tree.leaves() {
        assert!((tree.node(leaf).branch_length.unwrap() - 1.5).abs() < 1e-10);
    }
}

#[test]
fn nj_clamps_negative_branches() {
    let dm = tri(
        &["A", "B", "C", "D"],
        vec![vec![], vec![0.1], vec![0.9, 0.1], vec![0.1, 0.9, 0.1]],
    );
    let tree = neighbor_joining(&dm).unwrap();
    for node in tree.nodes() {
        if let Some(bl) = node.branch_length {
            assert!(bl >= 0.0);
        }
    }
}

#[test]
fn construct_tree_dispatch() {
    let dm = simple_4taxa_dm();
    assert!(construct_tree(&dm, TreeMethod::Upgma).unwrap().is_rooted());
    assert!(!construct_tree(&dm, TreeMethod::NeighborJoining).unwrap().is_rooted());
    assert_eq!("NJ".parse::<TreeMethod>().unwrap(), TreeMethod::NeighborJoining);
    assert_eq!("upgma".parse::<TreeMethod>().unwrap(), TreeMethod::Upgma);
    assert!("ml".parse::<TreeMethod>().is_err());
}

// ─── Newick ─────────────────────────────────────────────────

#[test]
fn newick_upgma_exact() {
    let dm = tri(&["X", "Y"], vec![vec![], vec![4.0]]);
    let tree = upgma(&dm).unwrap();
    assert_eq!(to_newick(&tree), "(X:2.00000,Y:2.00000);");
}

#[test]
fn newick_nj_three_taxa_exact() {
    let dm = tri(&["s1", "s2", "s3"], vec![vec![], vec![0.2], vec![0.5, 0.5]]);
    let tree = neighbor_joining(&dm).unwrap();
    assert_eq!(to_newick(&tree), "(s1:0.10000,s2:0.10000,s3:0.40000);");
}

#[test]
fn newick_precision_is_configurable() {
    let dm = tri(&["X", "Y"], vec![vec![], vec![1.0]]);
    let tree = upgma(&dm).unwrap();
    let nwk = to_newick_with(&tree, &NewickFormat::default().with_precision(2));
    assert_eq!(nwk, "(X:0.50,Y:0.50);");
}

#[test]
fn newick_quotes_labels() {
    let dm = tri(
        &["A B", "C:D", "E'F", "File1|G"],
        vec![vec![], vec![1.0], vec![2.0, 2.0], vec![3.0, 3.0, 3.0]],
    );
    let tree = neighbor_joining(&dm).unwrap();
    let nwk = to_newick(&tree);
    assert!(nwk.contains("'A B'"));
    assert!(nwk.contains("'C:D'"));
    assert!(nwk.contains("'E''F'"));
    assert!(nwk.contains("File1|G:"));

    let parsed = parse_newick(&nwk).unwrap();
    let mut got = parsed.leaf_labels();
    got.sort();
    assert_eq!(got, vec!["A B", "C:D", "E'F", "File1|G"]);
}

#[test]
fn parse_nested_with_internal_labels_and_comments() {
    let tree = parse_newick("((A:0.1,B:0.2)inner:0.3,[note] C:0.4)root;").unwrap();
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_nodes(), 5);
    assert!(tree.is_rooted());
    assert_eq!(tree.node(tree.root()).label.as_deref(), Some("root"));
    let b = leaf_by_label(&tree, "B");
    assert!((tree.distance_to_root(b) - 0.5).abs() < 1e-12);

    let again = to_newick_with(&tree, &NewickFormat::default().with_precision(1));
    assert_eq!(again, "((A:0.1,B:0.2)inner:0.3,C:0.4)root;");
    let bare = to_newick_with(
        &tree,
        &NewickFormat::default()
            .without_internal_labels()
            .with_precision(1),
    );
    assert_eq!(bare, "((A:0.1,B:0.2):0.3,C:0.4);");
}

#[test]
fn parse_root_branch_length() {
    let tree = parse_newick("(A:1,B:2,C:3):0.5;").unwrap();
    assert!(!tree.is_rooted());
    assert_eq!(tree.node(tree.root()).branch_length, Some(0.5));
}

#[test]
fn parse_errors() {
    for bad in ["", "(A,B)", "(A,B;", "(A:x,B);", "(A,B);extra", "('A,B);", "(A,B)[x;"] {
        assert!(
            matches!(parse_newick(bad), Err(EvoError::NewickFormat { .. })),
            "accepted {bad:?}"
        );
    }
}

#[test]
fn deep_nesting_round_trips() {
    let depth = 200_000;
    let text = format!("{}A{};", "(".repeat(depth), ")".repeat(depth));
    let tree = parse_newick(&text).unwrap();
    assert_eq!(tree.num_nodes(), depth + 1);
    assert_eq!(tree.leaf_labels(), vec!["A"]);
    assert_eq!(to_newick(&tree), text);
}

#[test]
fn deep_unbalanced_input_is_an_error() {
    let depth = 200_000;
    let open_only = format!("{}A;", "(".repeat(depth));
    assert!(matches!(parse_newick(&open_only), Err(EvoError::NewickFormat { .. })));
    let close_only = format!("A{};", ")".repeat(depth));
    assert!(matches!(parse_newick(&close_only), Err(EvoError::NewickFormat { .. })));
}

fn sorted_leaf_branches(tree: &PhyloTree) -> Vec<(String, f64)> {
    let mut out: Vec<(String, f64)> = tree
        .leaves()
        .into_iter()
        .map(|i| {
            let node = tree.node(i);
            (
                node.label.as_deref().unwrap_or("").to_string(),
                node.branch_length.unwrap_or(0.0),
            )
        })
        .collect();
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

fn random_matrix() -> impl Strategy<Value = DistanceMatrix> {
    (3usize..9).prop_flat_map(|n| {
        prop::collection::vec(0.05f64..1.0, n * (n - 1) / 2).prop_map(move |flat| {
            let mut dm = DistanceMatrix::zeros((0..n).map(|i| format!("t{i}").into()).collect());
            let mut k = 0;
            for i in 1..n {
                for j in 0..i {
                    dm.set(i, j, flat[k]);
                    k += 1;
                }
            }
            dm
        })
    })
}

proptest! {
    #[test]
    fn newick_round_trip(dm in random_matrix(), use_nj in any::<bool>()) {
        let method = if use_nj { TreeMethod::NeighborJoining } else { TreeMethod::Upgma };
        let tree = construct_tree(&dm, method).unwrap();
        let parsed = parse_newick(&to_newick(&tree)).unwrap();

        prop_assert_eq!(parsed.num_leaves(), dm.n());
        prop_assert_eq!(parsed.num_nodes(), tree.num_nodes());
        let want = sorted_leaf_branches(&tree);
        let got = sorted_leaf_branches(&parsed);
        for ((wl, wb), (gl, gb)) in want.iter().zip(got.iter()) {
            prop_assert_eq!(wl, gl);
            prop_assert!((wb - gb).abs() < 1e-5);
        }
    }

    #[test]
    fn upgma_is_ultrametric(dm in random_matrix()) {
        let tree = upgma(&dm).unwrap();
        let depths: Vec<f64> = tree.leaves().into_iter().map(|l| tree.distance_to_root(l)).collect();
        for d in &depths {
            prop_assert!((d - depths[0]).abs() < 1e-9);
        }
    }

    #[test]
    fn trees_are_binary_with_all_leaves(dm in random_matrix()) {
        let up = upgma(&dm).unwrap();
        prop_assert_eq!(up.num_nodes(), 2 * dm.n() - 1);
        let nj = neighbor_joining(&dm).unwrap();
        prop_assert_eq!(nj.num_nodes(), 2 * dm.n() - 2);
        prop_assert_eq!(nj.node(nj.root()).children.len(), 3);
    }
}
