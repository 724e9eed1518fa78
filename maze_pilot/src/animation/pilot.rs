// animation/pilot.rs - Maze traversal state machine driven once per frame

use rand::Rng;
use std::time::Duration;

use super::{PilotError, Result, Vec3};
use crate::config::{CoveragePolicy, NeighborPolicy, PilotConfig};
use crate::maze::{MazeContext, MazeGraph, NodeId};

/// Pilot traversal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilotState {
    /// Not yet placed on the maze
    Initialize,
    /// Standing on `node`, about to pick the next one
    ChooseNextNode,
    /// Turning toward `next_node`
    AcquireHeading,
    /// Travelling toward `next_node`
    AcquireTargetLocation,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    Initialized { node: NodeId },
    ChoseNext { from: NodeId, to: NodeId },
    Turning,
    HeadingAcquired,
    Advanced,
    Arrived { node: NodeId },
    /// Arrived and every node has now been visited at least once.
    ///
    /// Replaces `Arrived` for that tick, so arrival counters must match both.
    CoverageComplete { node: NodeId },
    Halted,
}

/// The agent walking the maze.
///
/// `tick` advances exactly one state per call except for heading acquisition,
/// which completes in the same tick once the heading lines up.
#[derive(Debug, Clone)]
pub struct Pilot {
    position: Vec3,
    direction: Vec3,
    state: PilotState,
    node: Option<NodeId>,
    next_node: Option<NodeId>,
    speed: f32,

    config: PilotConfig,
    halted: bool,
    coverage_reported: bool,
    sweeps: u32,
}

impl Pilot {
    pub fn new(config: PilotConfig) -> Self {
        Self {
            position: Vec3::zero(),
            direction: config.initial_direction.normalize(),
            state: PilotState::Initialize,
            node: None,
            next_node: None,
            speed: config.speed,
            config,
            halted: false,
            coverage_reported: false,
            sweeps: 0,
        }
    }

    /// Advance the state machine by one frame
    pub fn tick(&mut self, ctx: &mut MazeContext, dt: Duration) -> Result<TickEvent> {
        if self.halted {
            return Ok(TickEvent::Halted);
        }

        match self.state {
            PilotState::Initialize => self.initialize(ctx),
            PilotState::ChooseNextNode => self.choose_next_node(ctx),
            PilotState::AcquireHeading => self.acquire_heading(ctx),
            PilotState::AcquireTargetLocation => self.acquire_target_location(ctx, dt),
        }
    }

    fn initialize(&mut self, ctx: &mut MazeContext) -> Result<TickEvent> {
        let start: NodeId = 0;
        let location = ctx
            .graph
            .node(start)
            .ok_or(PilotError::UnknownNode(start))?
            .location;

        ctx.mark_visited(start);
        self.node = Some(start);
        self.next_node = None;
        self.position = location;
        self.state = PilotState::ChooseNextNode;

        log::debug!("Pilot placed on node {} at {:?}", start, location);
        Ok(TickEvent::Initialized { node: start })
    }

    fn choose_next_node(&mut self, ctx: &mut MazeContext) -> Result<TickEvent> {
        let from = self.node.ok_or(PilotError::NoCurrentNode)?;
        let to = match self.config.neighbor_policy {
            NeighborPolicy::LeastVisited => least_visited_neighbor(&ctx.graph, from)?,
            NeighborPolicy::Random => random_neighbor(&mut ctx.rng, &ctx.graph, from)?,
        };

        self.next_node = Some(to);
        self.state = PilotState::AcquireHeading;
        Ok(TickEvent::ChoseNext { from, to })
    }

    fn acquire_heading(&mut self, ctx: &MazeContext) -> Result<TickEvent> {
        let (from, to) = self.leg_locations(&ctx.graph)?;
        let target = (to - from).normalize();

        // Coincident nodes give no heading to turn toward.
        if target == Vec3::zero() || self.heading_aligned(target) {
            self.state = PilotState::AcquireTargetLocation;
            return Ok(TickEvent::HeadingAcquired);
        }

        self.direction = steer_heading(self.direction, target, &self.config);

        if self.heading_aligned(target) {
            self.state = PilotState::AcquireTargetLocation;
            Ok(TickEvent::HeadingAcquired)
        } else {
            Ok(TickEvent::Turning)
        }
    }

    fn acquire_target_location(&mut self, ctx: &mut MazeContext, dt: Duration) -> Result<TickEvent> {
        let next = self.next_node.ok_or(PilotError::NoNextNode)?;
        let target = ctx.graph.node(next).ok_or(PilotError::UnknownNode(next))?.location;

        let before = self.position.distance(target);
        let travel = (target - self.position).normalize();
        let step = self.speed * dt.as_secs_f32();
        let position = self.position + travel * step;
        let after = position.distance(target);
        self.position = position;

        // Passing the target flips the remaining vector against the travel direction.
        let passed = (target - position).dot(travel) <= 0.0;
        if after > before || passed {
            return Ok(self.arrive(ctx, next, target));
        }
        Ok(TickEvent::Advanced)
    }

    fn arrive(&mut self, ctx: &mut MazeContext, node: NodeId, location: Vec3) -> TickEvent {
        if self.config.snap_on_arrival {
            self.position = location;
        }
        self.node = Some(node);
        self.next_node = None;
        self.state = PilotState::ChooseNextNode;
        ctx.mark_visited(node);

        log::debug!(
            "Pilot arrived at node {} ({} of {} nodes visited)",
            node,
            ctx.graph.visited_count(),
            ctx.graph.len()
        );

        if !ctx.graph.all_visited() {
            return TickEvent::Arrived { node };
        }

        match self.config.coverage_policy {
            CoveragePolicy::Continue => {
                if self.coverage_reported {
                    return TickEvent::Arrived { node };
                }
                self.coverage_reported = true;
            }
            CoveragePolicy::Halt => {
                self.halted = true;
            }
            CoveragePolicy::ResetVisits => {
                ctx.graph.reset_visits();
                ctx.graph.visit(node);
            }
        }
        self.sweeps += 1;
        log::info!(
            "Maze fully covered after {} visits (sweep {}, policy {:?})",
            ctx.total_visits,
            self.sweeps,
            self.config.coverage_policy
        );
        TickEvent::CoverageComplete { node }
    }

    fn leg_locations(&self, graph: &MazeGraph) -> Result<(Vec3, Vec3)> {
        let from = self.node.ok_or(PilotError::NoCurrentNode)?;
        let to = self.next_node.ok_or(PilotError::NoNextNode)?;
        let from = graph.node(from).ok_or(PilotError::UnknownNode(from))?;
        let to = graph.node(to).ok_or(PilotError::UnknownNode(to))?;
        Ok((from.location, to.location))
    }

    #[inline]
    fn heading_aligned(&self, target: Vec3) -> bool {
        self.direction.distance_squared(target) < self.config.heading_epsilon
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point one unit ahead along the heading
    pub fn forward_point(&self) -> Vec3 {
        self.position + self.direction
    }

    pub fn state(&self) -> PilotState {
        self.state
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn next_node(&self) -> Option<NodeId> {
        self.next_node
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Number of completed coverage sweeps
    pub fn sweeps(&self) -> u32 {
        self.sweeps
    }
}

/// Neighbor of `node` with the fewest visits, first in connection order on ties
pub fn least_visited_neighbor(graph: &MazeGraph, node: NodeId) -> Result<NodeId> {
    let current = graph.node(node).ok_or(PilotError::UnknownNode(node))?;
    current
        .connections
        .iter()
        .copied()
        .min_by_key(|&c| graph.node(c).map_or(u32::MAX, |n| n.visit_count))
        .ok_or(PilotError::DeadEnd { node })
}

/// Uniformly random neighbor of `node`
pub fn random_neighbor<R: Rng>(rng: &mut R, graph: &MazeGraph, node: NodeId) -> Result<NodeId> {
    let current = graph.node(node).ok_or(PilotError::UnknownNode(node))?;
    if current.connections.is_empty() {
        return Err(PilotError::DeadEnd { node });
    }
    let index = rng.gen_range(0..current.connections.len());
    Ok(current.connections[index])
}

#[inline]
fn is_reversed(direction: Vec3, target: Vec3, opposite_epsilon: f32) -> bool {
    direction.dot(target) < -1.0 + opposite_epsilon
}

/// One smoothing step of the heading toward `target`.
///
/// A heading pointing (almost) straight away from the target is first pushed
/// along an axis perpendicular to the target, since blending two opposite
/// vectors would pass through zero.
pub fn steer_heading(direction: Vec3, target: Vec3, config: &PilotConfig) -> Vec3 {
    if is_reversed(direction, target, config.opposite_epsilon) {
        log::debug!("Heading reversed relative to target; nudging off-axis");
        let axis = target.any_orthogonal();
        return (direction + axis * config.opposite_nudge).normalize();
    }
    direction.lerp(target, config.heading_blend).normalize()
}
