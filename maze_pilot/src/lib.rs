// lib.rs - Library exports for maze-pilot
// Autonomous pilot that tours a 3D maze graph, plus the camera/light followers
// and frame loop around it.

pub mod animation;
pub mod config;
pub mod error_handling;
pub mod frame_stats;
pub mod maze;
pub mod maze_generator;
pub mod model_loader;
pub mod scene;
pub mod types;

// Re-export commonly used types
pub use animation::{
    FollowCamera, FollowSpotlight, FrameLoop, Pilot, PilotError, PilotState, RunSummary, SpotLight,
    TickEvent, Vec3,
};
pub use config::{CoveragePolicy, LoadOptions, NeighborPolicy, PilotConfig};
pub use error_handling::{AssetError, MazeError};
pub use maze::{MazeContext, MazeGraph, MazeNode, NodeId};
pub use maze_generator::{generate_grid_maze, write_navigation_file, GridSpec};
pub use model_loader::{load_model, ModelAsset, ModelFormat};
pub use scene::{CameraView, FrameSnapshot, HeadlessScene, SceneSink};
