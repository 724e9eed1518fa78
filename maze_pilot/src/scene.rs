// scene.rs - Boundary between the simulation and whatever draws it

use serde::Serialize;
use std::collections::VecDeque;

use crate::animation::{FollowCamera, SpotLight, Vec3};
use crate::model_loader::ModelAsset;

/// Receiver of per-frame scene state. A GPU renderer implements this; the
/// crate ships `HeadlessScene` for CLI runs and tests.
pub trait SceneSink {
    fn attach_model(&mut self, model: ModelAsset);

    fn update_camera(&mut self, camera: &FollowCamera);

    fn update_spotlight(&mut self, light: &SpotLight);

    /// Called once per frame after camera and light are updated
    fn present(&mut self, _frame: u64) {}
}

/// Camera view as last pushed to the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraView {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
}

/// Camera and light state captured at one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub camera: CameraView,
    pub light_position: Vec3,
    pub light_target: Vec3,
}

#[derive(Debug)]
struct Recorder {
    every: u64,
    limit: usize,
    snapshots: VecDeque<FrameSnapshot>,
}

/// Scene that only remembers what it was told
#[derive(Debug, Default)]
pub struct HeadlessScene {
    models: Vec<ModelAsset>,
    camera: Option<CameraView>,
    light: Option<SpotLight>,
    frames_presented: u64,
    recorder: Option<Recorder>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every `every` frames, keeping the latest `limit`
    pub fn recording(every: u64, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            recorder: Some(Recorder {
                every: every.max(1),
                limit,
                snapshots: VecDeque::with_capacity(limit.min(1024)),
            }),
            ..Self::default()
        }
    }

    pub fn models(&self) -> &[ModelAsset] {
        &self.models
    }

    pub fn camera(&self) -> Option<&CameraView> {
        self.camera.as_ref()
    }

    pub fn light(&self) -> Option<&SpotLight> {
        self.light.as_ref()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Recorded snapshots, oldest first
    pub fn snapshots(&self) -> impl Iterator<Item = &FrameSnapshot> {
        self.recorder.iter().flat_map(|r| r.snapshots.iter())
    }
}

impl SceneSink for HeadlessScene {
    fn attach_model(&mut self, model: ModelAsset) {
        self.models.push(model);
    }

    fn update_camera(&mut self, camera: &FollowCamera) {
        let (position, target, up) = camera.get_view_components();
        self.camera = Some(CameraView {
            position,
            target,
            up,
            fov: camera.fov(),
        });
    }

    fn update_spotlight(&mut self, light: &SpotLight) {
        self.light = Some(*light);
    }

    fn present(&mut self, frame: u64) {
        self.frames_presented += 1;

        let Some(recorder) = self.recorder.as_mut() else {
            return;
        };
        if frame % recorder.every != 0 {
            return;
        }
        let (Some(camera), Some(light)) = (self.camera, self.light) else {
            return;
        };
        if recorder.snapshots.len() == recorder.limit {
            recorder.snapshots.pop_front();
        }
        recorder.snapshots.push_back(FrameSnapshot {
            frame,
            camera,
            light_position: light.position,
            light_target: light.target,
        });
    }
}
