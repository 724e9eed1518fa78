// main.rs - Headless maze pilot: tours a maze graph and reports the run,
// or generates a new grid maze navigation file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use maze_pilot::{
    generate_grid_maze, load_model, write_navigation_file, CoveragePolicy, FrameLoop,
    FrameSnapshot, GridSpec, HeadlessScene, LoadOptions, MazeContext, MazeGraph, NeighborPolicy,
    PilotConfig, RunSummary,
};

/// CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fly the pilot through a maze
    Run(RunArgs),
    /// Generate a grid maze navigation file
    Generate(GenerateArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Path to maze JSON file (embedded test maze when omitted)
    #[arg(short, long)]
    pub maze: Option<PathBuf>,

    /// Model file attached to the scene
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Pilot config JSON; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Frames to simulate
    #[arg(short, long, default_value = "3600")]
    pub frames: u64,

    /// Frame time step in milliseconds
    #[arg(long, default_value = "16")]
    pub dt_ms: u64,

    /// Travel speed in units per second
    #[arg(long)]
    pub speed: Option<f32>,

    #[arg(long, value_enum)]
    pub policy: Option<NeighborPolicy>,

    /// What to do once every node has been visited
    #[arg(long, value_enum)]
    pub coverage: Option<CoveragePolicy>,

    /// RNG seed for the random neighbor policy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pace frames to wall-clock time
    #[arg(long)]
    pub realtime: bool,

    /// Write the run summary as JSON here; use "-" for stdout
    #[arg(short, long)]
    pub summary: Option<PathBuf>,

    /// Accept nodes without connections
    #[arg(long)]
    pub allow_dead_ends: bool,

    /// Accept one-way connections
    #[arg(long)]
    pub directed: bool,

    /// Log progress every N frames (0 disables)
    #[arg(long, default_value = "600")]
    pub progress_every: u64,

    /// Record a camera/light snapshot every N frames into the summary
    #[arg(long)]
    pub record_every: Option<u64>,

    /// Most recent snapshots kept when recording
    #[arg(long, default_value = "1000")]
    pub record_limit: usize,
}

/// JSON written by `run --summary`
#[derive(Serialize)]
struct RunOutput<'a> {
    #[serde(flatten)]
    summary: &'a RunSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    snapshots: Vec<&'a FrameSnapshot>,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    #[arg(short = 'W', long, default_value = "5")]
    pub width: usize,

    #[arg(short = 'H', long, default_value = "5")]
    pub height: usize,

    #[arg(short = 'D', long, default_value = "5")]
    pub depth: usize,

    /// Distance between adjacent cells
    #[arg(long, default_value = "4.0")]
    pub scale: f32,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Output navigation file
    #[arg(short, long, default_value = "maze.json")]
    pub output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Starting with {args:?}");

    match args.command {
        Command::Run(run) => run_pilot(run).await,
        Command::Generate(generate) => generate_maze(generate).await,
    }
}

async fn run_pilot(args: RunArgs) -> Result<()> {
    let config = pilot_config(&args).await?;
    let options = LoadOptions {
        allow_dead_ends: args.allow_dead_ends,
        require_symmetric: !args.directed,
    };

    // Maze and model load side by side; only the maze is required.
    let (graph, model) = tokio::join!(load_maze(&args, &options), async {
        match &args.model {
            Some(path) => Some(load_model(path).await),
            None => None,
        }
    });
    let graph = graph?;
    let (center, radius) = graph.bounds();
    info!("Maze spans radius {radius:.2} around {center:?}");

    let ctx = MazeContext::new(graph, config.seed);
    let scene = match args.record_every {
        Some(every) => HeadlessScene::recording(every, args.record_limit),
        None => HeadlessScene::new(),
    };
    let mut frame_loop = FrameLoop::new(ctx, config, scene)
        .with_progress_interval(args.progress_every);
    match model {
        Some(model) => {
            frame_loop.attach_model(model);
        }
        None => warn!("No model given; running without scene geometry"),
    }

    let dt = Duration::from_millis(args.dt_ms.max(1));
    let start = Instant::now();
    let summary = if args.realtime {
        frame_loop.run_realtime(args.frames, dt).await?
    } else {
        frame_loop.run_frames(args.frames, dt)?
    };

    info!(
        "Finished {} frames ({:.1}s simulated) in {:.2?}: {}/{} nodes visited, {} arrivals",
        summary.frames,
        summary.simulated_seconds,
        start.elapsed(),
        summary.nodes_visited,
        summary.node_count,
        summary.arrivals
    );
    if let Some(frame) = summary.coverage_frame {
        info!("Full coverage reached at frame {frame}");
    }

    if let Some(path) = &args.summary {
        let output = RunOutput {
            summary: &summary,
            snapshots: frame_loop.sink().snapshots().collect(),
        };
        let json = serde_json::to_string_pretty(&output)?;
        if path == Path::new("-") {
            println!("{json}");
        } else {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Saved run summary: {}", path.display());
        }
    }
    Ok(())
}

async fn pilot_config(args: &RunArgs) -> Result<PilotConfig> {
    let mut config = match &args.config {
        Some(path) => PilotConfig::from_file(path).await?,
        None => PilotConfig::default(),
    };
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if let Some(policy) = args.policy {
        config.neighbor_policy = policy;
    }
    if let Some(coverage) = args.coverage {
        config.coverage_policy = coverage;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

async fn load_maze(args: &RunArgs, options: &LoadOptions) -> Result<MazeGraph> {
    if let Some(maze_path) = &args.maze {
        MazeGraph::load(maze_path, options)
            .await
            .with_context(|| format!("Failed to load maze from {}", maze_path.display()))
    } else {
        // NOTE: keep test_maze.json under src/ for include_str!
        let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/test_maze.json"));
        let graph = MazeGraph::from_json_str(embedded, options)
            .context("Failed to parse embedded test_maze.json")?;
        info!("Using embedded test maze: {} nodes", graph.len());
        Ok(graph)
    }
}

async fn generate_maze(args: GenerateArgs) -> Result<()> {
    let spec = GridSpec {
        width: args.width,
        height: args.height,
        depth: args.depth,
        scale: args.scale,
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let graph = generate_grid_maze(&spec, &mut rng)?;
    info!(
        "Generated {}x{}x{} maze: {} nodes, {} connections",
        spec.width,
        spec.height,
        spec.depth,
        graph.len(),
        graph.edge_count() / 2
    );
    write_navigation_file(&graph, &args.output).await?;
    Ok(())
}
