// animation/orchestrator.rs - Frame loop tying the pilot to the scene

use serde::Serialize;
use std::time::{Duration, Instant};

use super::{FollowCamera, FollowSpotlight, Pilot, PilotError, SpotLight, TickEvent};
use crate::config::PilotConfig;
use crate::error_handling::AssetError;
use crate::frame_stats::{FrameReport, FrameStats};
use crate::maze::MazeContext;
use crate::model_loader::ModelAsset;
use crate::scene::SceneSink;

/// Outcome of a run of frames
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub arrivals: u64,
    pub coverage_frame: Option<u64>,
    pub nodes_visited: usize,
    pub node_count: usize,
    pub total_visits: u64,
    pub halted: bool,
    pub simulated_seconds: f64,
    /// Wall-clock timing over the most recent frames
    pub timing: Option<FrameReport>,
}

/// Drives one pilot tick plus the scene-follow update per frame.
///
/// Built from an already loaded `MazeContext`, so no tick can happen before
/// the maze is available.
pub struct FrameLoop<S: SceneSink> {
    ctx: MazeContext,
    pilot: Pilot,
    camera: FollowCamera,
    spotlight: FollowSpotlight,
    sink: S,

    frame: u64,
    elapsed: Duration,
    arrivals: u64,
    coverage_frame: Option<u64>,

    stats: FrameStats,
    progress_interval: u64,
}

impl<S: SceneSink> FrameLoop<S> {
    pub fn new(ctx: MazeContext, config: PilotConfig, sink: S) -> Self {
        Self {
            ctx,
            pilot: Pilot::new(config),
            camera: FollowCamera::new(),
            spotlight: FollowSpotlight::new(SpotLight::default()),
            sink,
            frame: 0,
            elapsed: Duration::ZERO,
            arrivals: 0,
            coverage_frame: None,
            stats: FrameStats::new(120),
            progress_interval: 600,
        }
    }

    /// Log progress every `frames` frames (0 disables)
    pub fn with_progress_interval(mut self, frames: u64) -> Self {
        self.progress_interval = frames;
        self
    }

    /// Attach a loaded model, or log why there is none
    pub fn attach_model(&mut self, model: Result<ModelAsset, AssetError>) -> bool {
        match model {
            Ok(model) => {
                log::info!(
                    "Attached model '{}' ({:?}, {} bytes)",
                    model.name,
                    model.format,
                    model.size_bytes()
                );
                self.sink.attach_model(model);
                true
            }
            Err(e) => {
                log::error!("{}; continuing without the model", e);
                false
            }
        }
    }

    /// One display frame: tick, then push camera and light to the sink
    pub fn frame(&mut self, dt: Duration) -> Result<TickEvent, PilotError> {
        let frame_start = Instant::now();

        let event = self.pilot.tick(&mut self.ctx, dt)?;
        let tick_time = frame_start.elapsed();

        match event {
            TickEvent::Arrived { .. } => self.arrivals += 1,
            TickEvent::CoverageComplete { .. } => {
                self.arrivals += 1;
                if self.coverage_frame.is_none() {
                    self.coverage_frame = Some(self.frame);
                }
            }
            _ => {}
        }

        self.camera.follow(&self.pilot);
        self.spotlight.follow(&self.pilot);
        self.sink.update_camera(&self.camera);
        self.sink.update_spotlight(self.spotlight.light());
        self.sink.present(self.frame);

        self.frame += 1;
        self.elapsed += dt;
        self.stats.record_frame(frame_start.elapsed(), tick_time, dt);

        if self.progress_interval > 0 && self.frame % self.progress_interval == 0 {
            if let Some(report) = self.stats.report() {
                log::info!(
                    "Frame {}: {} of {} nodes visited, {} arrivals | {}",
                    self.frame,
                    self.ctx.graph.visited_count(),
                    self.ctx.graph.len(),
                    self.arrivals,
                    report
                );
            }
        }

        Ok(event)
    }

    /// Run `frames` frames back to back at a fixed `dt`
    pub fn run_frames(&mut self, frames: u64, dt: Duration) -> Result<RunSummary, PilotError> {
        for _ in 0..frames {
            if self.frame(dt)? == TickEvent::Halted {
                log::info!("Pilot halted at frame {}", self.frame);
                break;
            }
        }
        Ok(self.summary())
    }

    /// Run `frames` frames paced to wall-clock time
    pub async fn run_realtime(&mut self, frames: u64, dt: Duration) -> Result<RunSummary, PilotError> {
        let mut interval = tokio::time::interval(dt);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut last = Instant::now();
        for _ in 0..frames {
            interval.tick().await;
            let now = Instant::now();
            let frame_dt = now - last;
            last = now;

            if self.frame(frame_dt)? == TickEvent::Halted {
                log::info!("Pilot halted at frame {}", self.frame);
                break;
            }
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.frame,
            arrivals: self.arrivals,
            coverage_frame: self.coverage_frame,
            nodes_visited: self.ctx.graph.visited_count(),
            node_count: self.ctx.graph.len(),
            total_visits: self.ctx.total_visits,
            halted: self.pilot.is_halted(),
            simulated_seconds: self.elapsed.as_secs_f64(),
            timing: self.stats.report(),
        }
    }

    pub fn pilot(&self) -> &Pilot {
        &self.pilot
    }

    pub fn context(&self) -> &MazeContext {
        &self.ctx
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    /// Total simulated time
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{PilotState, Vec3};
    use crate::config::{CoveragePolicy, LoadOptions};
    use crate::maze::{MazeGraph, MazeNode};
    use crate::scene::HeadlessScene;
    use std::path::PathBuf;

    fn square_maze() -> MazeContext {
        let graph = MazeGraph::from_nodes(
            vec![
                MazeNode::new(Vec3::new(0.0, 0.0, 0.0), vec![1, 3]),
                MazeNode::new(Vec3::new(2.0, 0.0, 0.0), vec![0, 2]),
                MazeNode::new(Vec3::new(2.0, 0.0, 2.0), vec![1, 3]),
                MazeNode::new(Vec3::new(0.0, 0.0, 2.0), vec![2, 0]),
            ],
            &LoadOptions::default(),
        )
        .unwrap();
        MazeContext::new(graph, Some(11))
    }

    #[test]
    fn test_camera_and_light_follow_pilot_every_frame() {
        let mut frame_loop = FrameLoop::new(square_maze(), PilotConfig::default(), HeadlessScene::new());

        for _ in 0..50 {
            frame_loop.frame(Duration::from_millis(16)).unwrap();

            let pilot = frame_loop.pilot();
            let camera = frame_loop.sink().camera().unwrap();
            let light = frame_loop.sink().light().unwrap();
            assert_eq!(camera.position, pilot.position());
            assert_eq!(camera.target, pilot.forward_point());
            assert_eq!(light.position, pilot.position());
            assert_eq!(light.target, pilot.forward_point());
            assert_eq!(frame_loop.camera().position(), pilot.position());
        }
        assert_eq!(frame_loop.sink().frames_presented(), 50);
        assert_eq!(frame_loop.frame_count(), 50);
        assert_eq!(frame_loop.elapsed(), Duration::from_millis(800));
    }

    #[test]
    fn test_run_covers_square() {
        let mut frame_loop = FrameLoop::new(square_maze(), PilotConfig::default(), HeadlessScene::new())
            .with_progress_interval(0);

        let summary = frame_loop.run_frames(5000, Duration::from_millis(16)).unwrap();
        assert_eq!(summary.node_count, 4);
        assert_eq!(summary.nodes_visited, 4);
        assert!(summary.coverage_frame.is_some());
        assert!(summary.arrivals >= 3);
        assert!(!summary.halted);
        assert_eq!(summary.timing.map(|t| t.frames), Some(120));
    }

    #[test]
    fn test_run_stops_when_halted() {
        let config = PilotConfig {
            coverage_policy: CoveragePolicy::Halt,
            ..Default::default()
        };
        let mut frame_loop = FrameLoop::new(square_maze(), config, HeadlessScene::new())
            .with_progress_interval(0);

        let summary = frame_loop.run_frames(100_000, Duration::from_millis(16)).unwrap();
        assert!(summary.halted);
        assert!(summary.frames < 100_000);
        assert_eq!(frame_loop.pilot().state(), PilotState::ChooseNextNode);
    }

    #[test]
    fn test_failed_model_is_not_fatal() {
        let mut frame_loop = FrameLoop::new(square_maze(), PilotConfig::default(), HeadlessScene::new());
        let failed = Err(AssetError::Empty { path: PathBuf::from("missing.gltf") });

        assert!(!frame_loop.attach_model(failed));
        assert!(frame_loop.sink().models().is_empty());
        assert!(frame_loop.frame(Duration::from_millis(16)).is_ok());
    }

    #[test]
    fn test_recording_scene_samples_the_run() {
        let mut frame_loop = FrameLoop::new(square_maze(), PilotConfig::default(), HeadlessScene::recording(10, 5))
            .with_progress_interval(0);
        frame_loop.run_frames(100, Duration::from_millis(16)).unwrap();

        let frames: Vec<u64> = frame_loop.sink().snapshots().map(|s| s.frame).collect();
        assert_eq!(frames, vec![50, 60, 70, 80, 90]);
        let last = frame_loop.sink().snapshots().last().unwrap();
        assert_eq!(last.camera.position, last.light_position);
    }

    #[tokio::test]
    async fn test_realtime_loop() {
        let mut frame_loop = FrameLoop::new(square_maze(), PilotConfig::default(), HeadlessScene::new());
        let summary = frame_loop.run_realtime(3, Duration::from_millis(1)).await.unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(frame_loop.pilot().state(), PilotState::AcquireHeading);
    }
}
