// animation/mod.rs - Per-frame pilot animation and the scene followers it drives

pub mod pilot;
pub mod camera_animator;
pub mod lighting_animator;
pub mod orchestrator;

pub use pilot::*;
pub use camera_animator::*;
pub use lighting_animator::*;
pub use orchestrator::*;

use serde::{Serialize, Deserialize};

use crate::maze::NodeId;

// ============================================================================
// CORE MATH TYPES
// ============================================================================

/// 3D vector used for node locations, pilot position and heading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        Vec3::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    #[inline]
    pub fn distance_squared(self, other: Vec3) -> f32 {
        (other - self).length_squared()
    }

    /// Unit vector in the same direction, or zero for a degenerate input
    #[inline]
    pub fn normalize(self) -> Vec3 {
        let len_sq = self.length_squared();
        if len_sq > 1e-20 {
            let inv_len = 1.0 / len_sq.sqrt();
            Vec3::new(
                self.x * inv_len,
                self.y * inv_len,
                self.z * inv_len,
            )
        } else {
            Vec3::zero()
        }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Some unit vector perpendicular to `self`.
    ///
    /// Crosses with the world axis least aligned with `self`, so the result
    /// is well conditioned for any non-zero input.
    pub fn any_orthogonal(self) -> Vec3 {
        let ax = self.x.abs();
        let ay = self.y.abs();
        let az = self.z.abs();
        let axis = if ax <= ay && ax <= az {
            Vec3::new(1.0, 0.0, 0.0)
        } else if ay <= az {
            Vec3::new(0.0, 1.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, 1.0)
        };
        self.cross(axis).normalize()
    }

    /// Angle in radians between two non-zero vectors
    #[inline]
    pub fn angle_to(self, other: Vec3) -> f32 {
        let denom = (self.length_squared() * other.length_squared()).sqrt();
        if denom <= 1e-20 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// Implement operators for Vec3
impl std::ops::Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, scalar: f32) -> Vec3 {
        Vec3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl std::ops::Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, scalar: f32) -> Vec3 {
        self * scalar.recip()
    }
}

impl From<[f32; 3]> for Vec3 {
    #[inline]
    fn from(arr: [f32; 3]) -> Self {
        Vec3::new(arr[0], arr[1], arr[2])
    }
}

impl From<Vec3> for [f32; 3] {
    #[inline]
    fn from(v: Vec3) -> [f32; 3] {
        [v.x, v.y, v.z]
    }
}

// ============================================================================
// COLOR TYPE
// ============================================================================

/// RGB light color
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Pilot state machine errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PilotError {
    #[error("Node {node} has no connections; the pilot cannot choose a next node")]
    DeadEnd { node: NodeId },

    #[error("Pilot has no current node")]
    NoCurrentNode,

    #[error("Pilot has no target node")]
    NoNextNode,

    #[error("Node {0} does not exist in the maze")]
    UnknownNode(NodeId),
}

pub type Result<T> = std::result::Result<T, PilotError>;
