// animation/lighting_animator.rs - Cone spotlight carried by the pilot

use serde::{Deserialize, Serialize};

use super::{Color, Pilot, Vec3};

/// Spotlight as handed to the renderer
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub position: Vec3,
    pub target: Vec3,
    pub direction: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub inner_cone_angle: f32,
    pub outer_cone_angle: f32,
    pub range: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            target: Vec3::new(0.0, 0.0, -1.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
            color: Color::WHITE,
            intensity: 1.5,
            inner_cone_angle: 0.3,
            outer_cone_angle: 0.5,
            range: 30.0,
        }
    }
}

/// Keeps a spotlight on the pilot, aimed where the pilot is looking
#[derive(Debug, Clone, Default)]
pub struct FollowSpotlight {
    light: SpotLight,
}

impl FollowSpotlight {
    pub fn new(light: SpotLight) -> Self {
        Self { light }
    }

    pub fn follow(&mut self, pilot: &Pilot) {
        let position = pilot.position();
        let target = pilot.forward_point();
        self.light.position = position;
        self.light.target = target;

        let direction = (target - position).normalize();
        if direction != Vec3::zero() {
            self.light.direction = direction;
        }
    }

    pub fn light(&self) -> &SpotLight {
        &self.light
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PilotConfig;

    #[test]
    fn test_spotlight_aims_at_forward_point() {
        let pilot = Pilot::new(PilotConfig {
            initial_direction: Vec3::new(1.0, 0.0, 0.0),
            ..Default::default()
        });
        let mut spot = FollowSpotlight::default();
        spot.follow(&pilot);

        let light = spot.light();
        assert_eq!(light.position, Vec3::zero());
        assert_eq!(light.target, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(light.direction, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(light.color, Color::WHITE);
    }
}
