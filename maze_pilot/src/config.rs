// config.rs - Pilot tuning and maze load options
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::animation::Vec3;

/// How the pilot picks the next node among the current node's connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NeighborPolicy {
    /// Neighbor with the fewest visits, first in connection order on ties
    LeastVisited,
    /// Uniformly random neighbor
    Random,
}

/// What happens once every node has been visited at least once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CoveragePolicy {
    /// Keep traversing forever
    Continue,
    /// Stop the pilot where it is
    Halt,
    /// Zero all visit counts and start a new sweep
    ResetVisits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    /// Travel speed in units per second
    pub speed: f32,
    /// Fraction of the remaining heading error closed each tick
    pub heading_blend: f32,
    /// Squared distance between heading and target below which the turn is done
    pub heading_epsilon: f32,
    /// Heading counts as reversed when `dot(heading, target) < -1 + opposite_epsilon`
    pub opposite_epsilon: f32,
    /// Size of the perpendicular nudge applied to a reversed heading
    pub opposite_nudge: f32,
    pub initial_direction: Vec3,
    pub neighbor_policy: NeighborPolicy,
    pub coverage_policy: CoveragePolicy,
    /// Place the pilot exactly on the node on arrival instead of keeping the overshoot
    pub snap_on_arrival: bool,
    pub seed: Option<u64>,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            heading_blend: 0.05,
            heading_epsilon: 1e-4,
            opposite_epsilon: 1e-3,
            opposite_nudge: 0.1,
            initial_direction: Vec3::new(0.0, 0.0, -1.0),
            neighbor_policy: NeighborPolicy::LeastVisited,
            coverage_policy: CoveragePolicy::Continue,
            snap_on_arrival: true,
            seed: None,
        }
    }
}

impl PilotConfig {
    /// Read a JSON config file; missing fields keep their defaults
    pub async fn from_file(path: &Path) -> Result<Self> {
        let s = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: PilotConfig = serde_json::from_str(&s)
            .with_context(|| format!("Failed to parse pilot config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.speed.is_finite() && self.speed > 0.0,
            "speed must be positive, got {}",
            self.speed
        );
        anyhow::ensure!(
            self.heading_blend > 0.0 && self.heading_blend <= 1.0,
            "heading_blend must be in (0, 1], got {}",
            self.heading_blend
        );
        anyhow::ensure!(self.heading_epsilon > 0.0, "heading_epsilon must be positive");
        anyhow::ensure!(
            self.opposite_epsilon > 0.0 && self.opposite_epsilon < 1.0,
            "opposite_epsilon must be in (0, 1)"
        );
        anyhow::ensure!(self.opposite_nudge > 0.0, "opposite_nudge must be positive");
        anyhow::ensure!(
            self.initial_direction.is_finite() && self.initial_direction.length_squared() > 1e-12,
            "initial_direction must be a non-zero vector"
        );
        Ok(())
    }
}

/// Validation applied when a maze file is loaded
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Accept nodes without connections (the pilot errors if it reaches one)
    pub allow_dead_ends: bool,
    /// Require every edge to have its reverse edge
    pub require_symmetric: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            allow_dead_ends: false,
            require_symmetric: true,
        }
    }
}
