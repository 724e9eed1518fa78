//! Pilot tick and frame loop throughput on generated mazes.
//!
//! Run with: cargo bench -p maze-pilot

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use maze_pilot::{
    generate_grid_maze, FrameLoop, GridSpec, HeadlessScene, MazeContext, MazeGraph, NeighborPolicy,
    Pilot, PilotConfig,
};

const DT: Duration = Duration::from_millis(16);

fn build_maze(side: usize) -> MazeGraph {
    let spec = GridSpec { width: side, height: side, depth: side, scale: 4.0 };
    generate_grid_maze(&spec, &mut StdRng::seed_from_u64(7)).expect("valid grid dimensions")
}

fn bench_pilot_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pilot_tick");

    for side in [4, 8, 16] {
        let graph = build_maze(side);

        for (label, neighbor_policy) in [
            ("least_visited", NeighborPolicy::LeastVisited),
            ("random", NeighborPolicy::Random),
        ] {
            group.bench_with_input(BenchmarkId::new(label, side * side * side), &graph, |b, graph| {
                b.iter(|| {
                    let mut ctx = MazeContext::new(graph.clone(), Some(1));
                    let mut pilot = Pilot::new(PilotConfig { neighbor_policy, ..Default::default() });
                    for _ in 0..1_000 {
                        black_box(pilot.tick(&mut ctx, DT).expect("no dead ends"));
                    }
                    black_box(ctx.total_visits)
                });
            });
        }
    }

    group.finish();
}

fn bench_frame_loop(c: &mut Criterion) {
    let graph = build_maze(8);

    c.bench_function("frame_loop_1000_frames", |b| {
        b.iter(|| {
            let ctx = MazeContext::new(graph.clone(), Some(1));
            let mut frame_loop = FrameLoop::new(ctx, PilotConfig::default(), HeadlessScene::new())
                .with_progress_interval(0);
            black_box(frame_loop.run_frames(1_000, DT).expect("no dead ends"))
        });
    });
}

criterion_group!(benches, bench_pilot_ticks, bench_frame_loop);
criterion_main!(benches);
