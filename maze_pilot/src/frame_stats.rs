// frame_stats.rs - Sliding-window frame timing for progress logs

use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct FrameSample {
    /// Wall time spent producing the frame
    wall: Duration,
    /// Wall time spent inside `Pilot::tick`
    tick: Duration,
    /// Simulated time step handed to the tick
    dt: Duration,
}

/// Timing summary over the current window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    pub frames: usize,
    pub fps: f64,
    pub mean_frame_ms: f64,
    pub p99_frame_ms: f64,
    pub mean_tick_ms: f64,
    /// Simulated seconds per wall second
    pub sim_ratio: f64,
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FPS: {:.1} | Frame: {:.3}ms (p99: {:.3}ms) | Tick: {:.3}ms | Sim x{:.1}",
            self.fps, self.mean_frame_ms, self.p99_frame_ms, self.mean_tick_ms, self.sim_ratio
        )
    }
}

/// Timings of the last `window` frames
pub struct FrameStats {
    samples: VecDeque<FrameSample>,
    window: usize,
}

impl FrameStats {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    pub fn record_frame(&mut self, wall: Duration, tick: Duration, dt: Duration) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(FrameSample { wall, tick, dt });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn total(&self, pick: impl Fn(&FrameSample) -> Duration) -> Duration {
        self.samples.iter().map(pick).sum()
    }

    fn mean_ms(&self, pick: impl Fn(&FrameSample) -> Duration) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.total(pick).as_secs_f64() * 1000.0 / self.samples.len() as f64
    }

    /// Wall frame time at quantile `p` in [0, 1]
    pub fn percentile(&self, p: f64) -> Duration {
        let mut walls: Vec<Duration> = self.samples.iter().map(|s| s.wall).collect();
        if walls.is_empty() {
            return Duration::ZERO;
        }
        walls.sort_unstable();
        let rank = ((walls.len() - 1) as f64 * p.clamp(0.0, 1.0)).round() as usize;
        walls[rank]
    }

    pub fn report(&self) -> Option<FrameReport> {
        if self.samples.is_empty() {
            return None;
        }
        let wall = self.total(|s| s.wall).as_secs_f64();
        let simulated = self.total(|s| s.dt).as_secs_f64();
        let per_wall_second = |x: f64| if wall > 0.0 { x / wall } else { 0.0 };

        Some(FrameReport {
            frames: self.samples.len(),
            fps: per_wall_second(self.samples.len() as f64),
            mean_frame_ms: self.mean_ms(|s| s.wall),
            p99_frame_ms: self.percentile(0.99).as_secs_f64() * 1000.0,
            mean_tick_ms: self.mean_ms(|s| s.tick),
            sim_ratio: per_wall_second(simulated),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: Duration = Duration::from_millis(16);

    #[test]
    fn test_window_keeps_latest_frames() {
        let mut stats = FrameStats::new(10);
        for i in 0..20 {
            stats.record_frame(Duration::from_millis(16 + i % 4), Duration::from_micros(50), DT);
        }

        assert_eq!(stats.len(), 10);
        assert_eq!(stats.percentile(1.0), Duration::from_millis(19));
        assert_eq!(stats.percentile(0.0), Duration::from_millis(16));

        let report = stats.report().unwrap();
        assert!(report.fps > 50.0 && report.fps < 70.0);
        assert!((report.mean_tick_ms - 0.05).abs() < 1e-9);
        assert!(report.to_string().starts_with("FPS:"));
    }

    #[test]
    fn test_sim_ratio_tracks_dt() {
        let mut stats = FrameStats::new(4);
        for _ in 0..4 {
            stats.record_frame(Duration::from_millis(1), Duration::ZERO, DT);
        }
        let report = stats.report().unwrap();
        assert!((report.sim_ratio - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = FrameStats::new(0);
        assert!(stats.is_empty());
        assert_eq!(stats.percentile(0.5), Duration::ZERO);
        assert!(stats.report().is_none());
    }
}
