use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Debug};

/// Referring to a node that was never added to the graph. This is always a bug in the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownNode(pub String);

impl fmt::Display for UnknownNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} isn't a node in the graph", self.0)
    }
}

impl std::error::Error for UnknownNode {}

/// An undirected graph with no edge data. Adjacency is always symmetric, and every neighbor is
/// itself a node. Built once through a `GraphBuilder`, then read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct UndirectedGraph<N: Ord> {
    neighbors: BTreeMap<N, BTreeSet<N>>,
}

impl<N: Ord + Clone + Debug> UndirectedGraph<N> {
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.neighbors.keys()
    }

    pub fn neighbors_of(&self, n: &N) -> Result<&BTreeSet<N>, UnknownNode> {
        self.neighbors
            .get(n)
            .ok_or_else(|| UnknownNode(format!("{:?}", n)))
    }

    pub fn degree(&self, n: &N) -> Result<usize, UnknownNode> {
        Ok(self.neighbors_of(n)?.len())
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Every edge exactly once, with the smaller endpoint first.
    pub fn edges(&self) -> Vec<(N, N)> {
        let mut edges = Vec::new();
        for (a, adj) in &self.neighbors {
            for b in adj {
                if a <= b {
                    edges.push((a.clone(), b.clone()));
                }
            }
        }
        edges
    }
}

pub struct GraphBuilder<N: Ord> {
    neighbors: BTreeMap<N, BTreeSet<N>>,
}

impl<N: Ord + Clone + Debug> GraphBuilder<N> {
    pub fn new() -> GraphBuilder<N> {
        GraphBuilder {
            neighbors: BTreeMap::new(),
        }
    }

    /// Idempotent.
    pub fn add_node(&mut self, n: N) {
        self.neighbors.entry(n).or_insert_with(BTreeSet::new);
    }

    /// Both endpoints must already be nodes. Adding the same edge twice is a no-op.
    pub fn add_edge(&mut self, a: N, b: N) -> Result<(), UnknownNode> {
        for n in [&a, &b] {
            if !self.neighbors.contains_key(n) {
                return Err(UnknownNode(format!("{:?}", n)));
            }
        }
        if let Some(adj) = self.neighbors.get_mut(&a) {
            adj.insert(b.clone());
        }
        if let Some(adj) = self.neighbors.get_mut(&b) {
            adj.insert(a);
        }
        Ok(())
    }

    pub fn build(self) -> UndirectedGraph<N> {
        UndirectedGraph {
            neighbors: self.neighbors,
        }
    }
}

impl<N: Ord + Clone + Debug> Default for GraphBuilder<N> {
    fn default() -> Self {
        GraphBuilder::new()
    }
}
