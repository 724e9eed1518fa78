// maze.rs - Maze graph arena, load-time validation and the traversal context

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

use crate::animation::Vec3;
use crate::config::LoadOptions;
use crate::error_handling::{MazeError, Result};
use crate::types::{MazeDocument, MazeNodeRecord};

/// Index of a node in the maze arena
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct MazeNode {
    pub location: Vec3,
    pub connections: Vec<NodeId>,
    pub visit_count: u32,
}

impl MazeNode {
    pub fn new(location: Vec3, connections: Vec<NodeId>) -> Self {
        Self {
            location,
            connections,
            visit_count: 0,
        }
    }

    pub fn is_dead_end(&self) -> bool {
        self.connections.is_empty()
    }
}

/// Flat arena of maze nodes. Edges are stored as indices into the arena.
///
/// The shape of the graph is fixed after construction; only visit counts
/// change.
#[derive(Debug, Clone, Default)]
pub struct MazeGraph {
    nodes: Vec<MazeNode>,
}

impl MazeGraph {
    /// Build a graph from parsed records, validating it against `options`
    pub fn from_records(records: Vec<MazeNodeRecord>, options: &LoadOptions) -> Result<Self> {
        if records.is_empty() {
            return Err(MazeError::Empty);
        }
        let len = records.len();

        let mut nodes = Vec::with_capacity(len);
        for (id, record) in records.into_iter().enumerate() {
            let location = Vec3::from(record.location);
            if !location.is_finite() {
                return Err(MazeError::InvalidLocation { node: id });
            }

            let mut connections = Vec::with_capacity(record.connections.len());
            for target in record.connections {
                if target < 0 || target as u64 >= len as u64 {
                    return Err(MazeError::ConnectionOutOfRange { node: id, target, len });
                }
                let target = target as NodeId;
                if target == id {
                    return Err(MazeError::SelfLoop { node: id });
                }
                connections.push(target);
            }

            nodes.push(MazeNode::new(location, connections));
        }

        let graph = Self { nodes };
        graph.validate(options)?;
        Ok(graph)
    }

    /// Build a graph from nodes already in arena form
    pub fn from_nodes(nodes: Vec<MazeNode>, options: &LoadOptions) -> Result<Self> {
        let records = nodes
            .into_iter()
            .map(|node| MazeNodeRecord {
                location: node.location.into(),
                connections: node.connections.into_iter().map(|c| c as i64).collect(),
            })
            .collect();
        Self::from_records(records, options)
    }

    pub fn from_json_str(json: &str, options: &LoadOptions) -> Result<Self> {
        let document: MazeDocument = serde_json::from_str(json)?;
        Self::from_records(document.into_records(), options)
    }

    /// Read and validate a navigation file
    pub async fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let s = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| MazeError::Io { path: path.to_path_buf(), source })?;
        let graph = Self::from_json_str(&s, options)?;
        log::info!(
            "Loaded maze from {}: {} nodes, {} edges",
            path.display(),
            graph.len(),
            graph.edge_count()
        );
        Ok(graph)
    }

    fn validate(&self, options: &LoadOptions) -> Result<()> {
        for (id, node) in self.nodes.iter().enumerate() {
            if node.is_dead_end() && !options.allow_dead_ends {
                return Err(MazeError::DeadEnd { node: id });
            }
            if options.require_symmetric {
                for &to in &node.connections {
                    if !self.nodes[to].connections.contains(&id) {
                        return Err(MazeError::Asymmetric { from: id, to });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&MazeNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[MazeNode] {
        &self.nodes
    }

    /// Number of directed connections
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.connections.len()).sum()
    }

    /// Increment a node's visit count, returning the new count
    pub fn visit(&mut self, id: NodeId) -> Option<u32> {
        let node = self.nodes.get_mut(id)?;
        node.visit_count += 1;
        Some(node.visit_count)
    }

    pub fn visited_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.visit_count > 0).count()
    }

    pub fn all_visited(&self) -> bool {
        self.nodes.iter().all(|n| n.visit_count > 0)
    }

    pub fn reset_visits(&mut self) {
        for node in &mut self.nodes {
            node.visit_count = 0;
        }
    }

    /// Records in navigation file form, visit counts dropped
    pub fn to_records(&self) -> Vec<MazeNodeRecord> {
        self.nodes
            .iter()
            .map(|node| MazeNodeRecord {
                location: node.location.into(),
                connections: node.connections.iter().map(|&c| c as i64).collect(),
            })
            .collect()
    }

    /// Center and radius of the bounding sphere around all node locations
    pub fn bounds(&self) -> (Vec3, f32) {
        if self.nodes.is_empty() {
            return (Vec3::zero(), 0.0);
        }
        let sum = self
            .nodes
            .iter()
            .fold(Vec3::zero(), |acc, n| acc + n.location);
        let center = sum / self.nodes.len() as f32;
        let radius = self
            .nodes
            .iter()
            .map(|n| n.location.distance(center))
            .fold(0.0_f32, f32::max);
        (center, radius)
    }
}

/// Everything the pilot shares with the rest of the scene: the maze, the
/// running visit total and the RNG used by the random neighbor policy.
pub struct MazeContext {
    pub graph: MazeGraph,
    pub total_visits: u64,
    pub rng: StdRng,
}

impl MazeContext {
    pub fn new(graph: MazeGraph, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            graph,
            total_visits: 0,
            rng,
        }
    }

    /// Record an arrival at `id`
    pub fn mark_visited(&mut self, id: NodeId) -> Option<u32> {
        let count = self.graph.visit(id)?;
        self.total_visits += 1;
        Some(count)
    }
}
