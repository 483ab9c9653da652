pub mod distance;
pub mod newick;
pub mod tree;

pub use distance::{build_distance_matrix, distance_matrix_from_set, pad_sequences, DistanceMatrix};
pub use newick::{parse_newick, to_newick, to_newick_with, NewickFormat};
pub use tree::{construct_tree, neighbor_joining, upgma, PhyloNode, PhyloTree, TreeMethod};

#[cfg(test)]
mod tests;
