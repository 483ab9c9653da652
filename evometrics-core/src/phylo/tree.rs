use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use log::{debug, trace};

use super::distance::DistanceMatrix;
use crate::error::{EvoError, EvoResult};

#[derive(Debug, Clone, PartialEq)]
pub struct PhyloNode {
    pub label: Option<Box<str>>,
    pub branch_length: Option<f64>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl PhyloNode {
    fn leaf(label: Box<str>) -> Self {
        Self {
            label: Some(label),
            branch_length: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed tree. NJ trees are unrooted in meaning but still carry a
/// designated root node so they can be walked and serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct PhyloTree {
    nodes: Vec<PhyloNode>,
    root: usize,
    rooted: bool,
}

impl PhyloTree {
    pub(crate) fn from_parts(nodes: Vec<PhyloNode>, root: usize, rooted: bool) -> Self {
        Self {
            nodes,
            root,
            rooted,
        }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn is_rooted(&self) -> bool {
        self.rooted
    }

    pub fn node(&self, idx: usize) -> &PhyloNode {
        &self.nodes[idx]
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn leaves(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn leaf_labels(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.label.as_deref().unwrap_or("").to_string())
            .collect()
    }

    pub fn nodes(&self) -> &[PhyloNode] {
        &self.nodes
    }

    /// Sum of branch lengths from `idx` up to the root.
    pub fn distance_to_root(&self, idx: usize) -> f64 {
        let mut total = 0.0;
        let mut cur = idx;
        while let Some(parent) = self.nodes[cur].parent {
            total += self.nodes[cur].branch_length.unwrap_or(0.0);
            cur = parent;
        }
        total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeMethod {
    Upgma,
    NeighborJoining,
}

impl fmt::Display for TreeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeMethod::Upgma => f.write_str("UPGMA"),
            TreeMethod::NeighborJoining => f.write_str("Neighbor-Joining"),
        }
    }
}

impl FromStr for TreeMethod {
    type Err = EvoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upgma" => Ok(TreeMethod::Upgma),
            "nj" | "neighbor-joining" | "neighbor_joining" => Ok(TreeMethod::NeighborJoining),
            _ => Err(EvoError::UnknownTreeMethod { name: s.to_string() }),
        }
    }
}

pub fn construct_tree(dist: &DistanceMatrix, method: TreeMethod) -> EvoResult<PhyloTree> {
    match method {
        TreeMethod::Upgma => upgma(dist),
        TreeMethod::NeighborJoining => neighbor_joining(dist),
    }
}

/// Working clusters during agglomeration. A cluster lives in the slot of its
/// smallest leaf index; merging slots `a < b` keeps `a` and retires `b`.
struct Clusters {
    n: usize,
    d: Vec<f64>,
    node_of: Vec<usize>,
    active: BitSet,
}

impl Clusters {
    fn new(dist: &DistanceMatrix) -> Self {
        let n = dist.n();
        let mut d = vec![0.0f64; n * n];
        for i in 0..n {
            for j in 0..n {
                d[i * n + j] = dist.get(i, j);
            }
        }
        let mut active = BitSet::with_capacity(n);
        active.extend(0..n);
        Self {
            n,
            d,
            node_of: (0..n).collect(),
            active,
        }
    }

    #[inline]
    fn dist(&self, a: usize, b: usize) -> f64 {
        self.d[a * self.n + b]
    }

    #[inline]
    fn set_dist(&mut self, a: usize, b: usize, val: f64) {
        self.d[a * self.n + b] = val;
        self.d[b * self.n + a] = val;
    }

    fn count(&self) -> usize {
        self.active.len()
    }

    fn slots(&self) -> Vec<usize> {
        self.active.iter().collect()
    }

    /// First pair `(a, b)`, `a < b`, in slot order with the strictly smallest
    /// score. Needs at least two active slots.
    fn min_pair(&self, slots: &[usize], score: impl Fn(usize, usize) -> f64) -> (usize, usize) {
        let mut best = (slots[0], slots[1], f64::INFINITY);
        for (k, &a) in slots.iter().enumerate() {
            for &b in &slots[(k + 1)..] {
                let s = score(a, b);
                if s < best.2 {
                    best = (a, b, s);
                }
            }
        }
        (best.0, best.1)
    }
}

fn leaf_nodes(dist: &DistanceMatrix) -> Vec<PhyloNode> {
    let n = dist.n();
    let mut nodes = Vec::with_capacity(2 * n);
    nodes.extend(dist.labels().iter().cloned().map(PhyloNode::leaf));
    nodes
}

/// Append an internal node over `children` with the given branch lengths.
fn push_internal(nodes: &mut Vec<PhyloNode>, children: &[(usize, f64)]) -> usize {
    let u = nodes.len();
    nodes.push(PhyloNode {
        label: None,
        branch_length: None,
        parent: None,
        children: children.iter().map(|&(c, _)| c).collect(),
    });
    for &(child, len) in children {
        nodes[child].parent = Some(u);
        nodes[child].branch_length = Some(len);
    }
    u
}

fn require_leaves(dist: &DistanceMatrix, operation: &'static str) -> EvoResult<usize> {
    let n = dist.n();
    if n < 2 {
        return Err(EvoError::InsufficientInput {
            operation,
            needed: 2,
            found: n,
        });
    }
    Ok(n)
}

/// UPGMA: ultrametric, rooted.
pub fn upgma(dist: &DistanceMatrix) -> EvoResult<PhyloTree> {
    let n = require_leaves(dist, "UPGMA tree")?;
    let mut nodes = leaf_nodes(dist);
    let mut clusters = Clusters::new(dist);
    let mut cluster_size = vec![1usize; n];
    let mut heights = vec![0.0f64; n];

    while clusters.count() > 1 {
        let slots = clusters.slots();
        let (a, b) = clusters.min_pair(&slots, |a, b| clusters.dist(a, b));
        let h = clusters.dist(a, b) / 2.0;

        let u = push_internal(
            &mut nodes,
            &[
                (clusters.node_of[a], (h - heights[a]).max(0.0)),
                (clusters.node_of[b], (h - heights[b]).max(0.0)),
            ],
        );
        trace!("upgma: joined slots {a} and {b} at height {h}");

        let sa = cluster_size[a] as f64;
        let sb = cluster_size[b] as f64;
        for &k in &slots {
            if k == a || k == b {
                continue;
            }
            let duk = (clusters.dist(a, k) * sa + clusters.dist(b, k) * sb) / (sa + sb);
            clusters.set_dist(a, k, duk);
        }

        cluster_size[a] += cluster_size[b];
        heights[a] = h;
        clusters.node_of[a] = u;
        clusters.active.remove(b);
    }

    let root = clusters.node_of[clusters.slots()[0]];
    debug!("upgma: built tree with {} leaves", n);
    Ok(PhyloTree::from_parts(nodes, root, true))
}

/// Neighbor-Joining. The last three clusters hang directly off the root.
pub fn neighbor_joining(dist: &DistanceMatrix) -> EvoResult<PhyloTree> {
    let n = require_leaves(dist, "neighbor-joining tree")?;
    let mut nodes = leaf_nodes(dist);

    if n == 2 {
        let half = dist.get(0, 1) / 2.0;
        let root = push_internal(&mut nodes, &[(0, half), (1, half)]);
        return Ok(PhyloTree::from_parts(nodes, root, false));
    }

    let mut clusters = Clusters::new(dist);
    let mut r = vec![0.0f64; n];

    while clusters.count() > 3 {
        let slots = clusters.slots();
        let m = slots.len() as f64;
        for &k in &slots {
            let sum: f64 = slots.iter().map(|&l| clusters.dist(k, l)).sum();
            r[k] = sum / (m - 2.0);
        }

        let (a, b) = clusters.min_pair(&slots, |a, b| clusters.dist(a, b) - r[a] - r[b]);
        let dab = clusters.dist(a, b);
        let la = (dab + r[a] - r[b]) / 2.0;
        let lb = dab - la;

        let u = push_internal(
            &mut nodes,
            &[
                (clusters.node_of[a], la.max(0.0)),
                (clusters.node_of[b], lb.max(0.0)),
            ],
        );
        trace!("nj: joined slots {a} and {b} (d={dab})");

        for &k in &slots {
            if k == a || k == b {
                continue;
            }
            let duk = (clusters.dist(a, k) + clusters.dist(b, k) - dab) / 2.0;
            clusters.set_dist(a, k, duk);
        }

        clusters.node_of[a] = u;
        clusters.active.remove(b);
    }

    let slots = clusters.slots();
    let (x, y, z) = (slots[0], slots[1], slots[2]);
    let (dxy, dxz, dyz) = (clusters.dist(x, y), clusters.dist(x, z), clusters.dist(y, z));
    let root = push_internal(
        &mut nodes,
        &[
            (clusters.node_of[x], ((dxy + dxz - dyz) / 2.0).max(0.0)),
            (clusters.node_of[y], ((dxy + dyz - dxz) / 2.0).max(0.0)),
            (clusters.node_of[z], ((dxz + dyz - dxy) / 2.0).max(0.0)),
        ],
    );
    debug!("nj: built tree with {} leaves", n);
    Ok(PhyloTree::from_parts(nodes, root, false))
}
