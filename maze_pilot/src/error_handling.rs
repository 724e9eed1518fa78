// error_handling.rs - Load-time errors for maze data and scene assets

use std::path::PathBuf;
use thiserror::Error;

use crate::maze::NodeId;

#[derive(Error, Debug)]
pub enum MazeError {
    #[error("Failed to read maze file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Maze JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Maze contains no nodes")]
    Empty,

    #[error("Node {node} has no connections")]
    DeadEnd { node: NodeId },

    #[error("Node {node} connects to {target}, but the maze only has {len} nodes")]
    ConnectionOutOfRange { node: NodeId, target: i64, len: usize },

    #[error("Node {node} connects to itself")]
    SelfLoop { node: NodeId },

    #[error("Node {from} connects to {to} but {to} does not connect back")]
    Asymmetric { from: NodeId, to: NodeId },

    #[error("Node {node} has a non-finite location")]
    InvalidLocation { node: NodeId },

    #[error("Invalid maze dimensions: {reason}")]
    InvalidDimensions { reason: String },
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to load model asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model asset {path} is empty")]
    Empty { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, MazeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_node() {
        let err = MazeError::ConnectionOutOfRange { node: 3, target: 9, len: 4 };
        assert_eq!(
            err.to_string(),
            "Node 3 connects to 9, but the maze only has 4 nodes"
        );

        let err = MazeError::Asymmetric { from: 0, to: 2 };
        assert!(err.to_string().contains("2 does not connect back"));
    }
}
