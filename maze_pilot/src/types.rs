// types.rs - Wire format of the maze navigation file
use serde::{Deserialize, Serialize};

use crate::animation::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Node location as written by the generator (`{x,y,z}`) or as a bare triple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Point(Point3),
    Triple([f32; 3]),
}

impl From<Location> for Vec3 {
    fn from(loc: Location) -> Self {
        match loc {
            Location::Point(p) => Vec3::new(p.x, p.y, p.z),
            Location::Triple(t) => Vec3::from(t),
        }
    }
}

impl From<Vec3> for Location {
    fn from(v: Vec3) -> Self {
        Location::Point(Point3 { x: v.x, y: v.y, z: v.z })
    }
}

/// One record of the navigation file.
///
/// Connection indices are read signed so that a negative index is reported
/// as out of range instead of as a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeNodeRecord {
    pub location: Location,
    #[serde(default)]
    pub connections: Vec<i64>,
}

/// Top-level document: a bare array, or an object with a `nodes` array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MazeDocument {
    Nodes(Vec<MazeNodeRecord>),
    Wrapped { nodes: Vec<MazeNodeRecord> },
}

impl MazeDocument {
    pub fn into_records(self) -> Vec<MazeNodeRecord> {
        match self {
            MazeDocument::Nodes(nodes) | MazeDocument::Wrapped { nodes } => nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_location_shapes_parse() {
        let json = r#"[
            {"location": {"x": 1.0, "y": 2.0, "z": 3.0}, "connections": [1]},
            {"location": [4.0, 5.0, 6.0], "connections": [0], "visitCount": 7}
        ]"#;
        let records = serde_json::from_str::<MazeDocument>(json).unwrap().into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(Vec3::from(records[0].location), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vec3::from(records[1].location), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_wrapped_document() {
        let json = r#"{"nodes": [{"location": [0, 0, 0], "connections": []}]}"#;
        let records = serde_json::from_str::<MazeDocument>(json).unwrap().into_records();
        assert_eq!(records.len(), 1);
        assert!(records[0].connections.is_empty());
    }
}
