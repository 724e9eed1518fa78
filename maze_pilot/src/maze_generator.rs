// maze_generator.rs - Grid maze generation and navigation file export
//
// Nodes sit on a centered width x height x depth lattice. Each node, taken in
// random order, joins one lattice neighbour (tried in random order) that is
// not yet in its component, tracked with a union-find forest.

use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

use crate::animation::Vec3;
use crate::config::LoadOptions;
use crate::error_handling::{MazeError, Result};
use crate::maze::{MazeGraph, MazeNode, NodeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub scale: f32,
}

impl GridSpec {
    pub fn node_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    fn index(&self, i: usize, j: usize, k: usize) -> NodeId {
        (i * self.height + j) * self.depth + k
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(MazeError::InvalidDimensions {
                reason: format!("{}x{}x{} has no cells", self.width, self.height, self.depth),
            });
        }
        if self.node_count() < 2 {
            return Err(MazeError::InvalidDimensions {
                reason: "a maze needs at least two cells".to_string(),
            });
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(MazeError::InvalidDimensions {
                reason: format!("scale must be positive, got {}", self.scale),
            });
        }
        Ok(())
    }
}

/// Union-find with path compression
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self { parent: (0..len).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while node != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets of `a` and `b`; false when already joined
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        self.parent[ra] = rb;
        true
    }
}

/// Generate a grid maze. The result is a forest of trees over the lattice
/// with symmetric connections; most seeds produce a single tree.
pub fn generate_grid_maze<R: Rng>(spec: &GridSpec, rng: &mut R) -> Result<MazeGraph> {
    spec.validate()?;

    let half = Vec3::new(
        spec.width as f32 / 2.0,
        spec.height as f32 / 2.0,
        spec.depth as f32 / 2.0,
    );

    let mut locations = Vec::with_capacity(spec.node_count());
    let mut adjacency: Vec<Vec<NodeId>> = Vec::with_capacity(spec.node_count());
    for i in 0..spec.width {
        for j in 0..spec.height {
            for k in 0..spec.depth {
                let cell = Vec3::new(i as f32, j as f32, k as f32);
                locations.push((cell - half) * spec.scale);

                let mut adjacent = Vec::with_capacity(6);
                if i > 0 {
                    adjacent.push(spec.index(i - 1, j, k));
                }
                if i + 1 < spec.width {
                    adjacent.push(spec.index(i + 1, j, k));
                }
                if j > 0 {
                    adjacent.push(spec.index(i, j - 1, k));
                }
                if j + 1 < spec.height {
                    adjacent.push(spec.index(i, j + 1, k));
                }
                if k > 0 {
                    adjacent.push(spec.index(i, j, k - 1));
                }
                if k + 1 < spec.depth {
                    adjacent.push(spec.index(i, j, k + 1));
                }
                adjacency.push(adjacent);
            }
        }
    }

    let mut connections: Vec<Vec<NodeId>> = vec![Vec::new(); spec.node_count()];
    let mut components = DisjointSet::new(spec.node_count());

    let mut order: Vec<NodeId> = (0..spec.node_count()).collect();
    order.shuffle(rng);
    for node in order {
        let mut candidates = adjacency[node].clone();
        candidates.shuffle(rng);
        if let Some(&other) = candidates.iter().find(|&&other| components.union(node, other)) {
            connections[node].push(other);
            connections[other].push(node);
        }
    }

    let nodes = locations
        .into_iter()
        .zip(connections)
        .map(|(location, connections)| MazeNode::new(location, connections))
        .collect();
    MazeGraph::from_nodes(nodes, &LoadOptions::default())
}

/// Write a maze as a navigation file
pub async fn write_navigation_file(graph: &MazeGraph, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&graph.to_records())?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| MazeError::Io { path: path.to_path_buf(), source })?;
    log::info!("Wrote {} nodes to {}", graph.len(), path.display());
    Ok(())
}
