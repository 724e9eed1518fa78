// animation/camera_animator.rs - First-person camera that rides along with the pilot

use super::{Pilot, Vec3};

/// Camera placed at the pilot and aimed one unit ahead along its heading
#[derive(Debug, Clone, PartialEq)]
pub struct FollowCamera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    fov: f32,
}

impl FollowCamera {
    pub fn new() -> Self {
        Self {
            position: Vec3::zero(),
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: 75.0_f32.to_radians(),
        }
    }

    /// Move onto the pilot and look at its forward point
    pub fn follow(&mut self, pilot: &Pilot) {
        self.position = pilot.position();
        self.target = pilot.forward_point();
    }

    /// Up vector usable for a look-at matrix.
    ///
    /// Falls back to a perpendicular axis when the view direction is
    /// (anti)parallel to the configured up, which happens on vertical legs.
    pub fn effective_up(&self) -> Vec3 {
        let forward = (self.target - self.position).normalize();
        if forward.cross(self.up).length_squared() < 1e-8 {
            forward.any_orthogonal()
        } else {
            self.up
        }
    }

    /// Get (position, target, up) for building the view matrix
    pub fn get_view_components(&self) -> (Vec3, Vec3, Vec3) {
        (self.position, self.target, self.effective_up())
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PilotConfig;

    #[test]
    fn test_follow_uses_pilot_heading() {
        let pilot = Pilot::new(PilotConfig {
            initial_direction: Vec3::new(0.0, 0.0, 2.0),
            ..Default::default()
        });
        let mut camera = FollowCamera::new();
        camera.follow(&pilot);

        assert_eq!(camera.position(), Vec3::zero());
        assert_eq!(camera.target(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_effective_up_on_vertical_view() {
        let pilot = Pilot::new(PilotConfig {
            initial_direction: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        });
        let mut camera = FollowCamera::new();
        camera.follow(&pilot);

        let (position, target, up) = camera.get_view_components();
        let forward = (target - position).normalize();
        assert!(forward.dot(up).abs() < 1e-5);
        assert!((up.length() - 1.0).abs() < 1e-5);
    }
}
