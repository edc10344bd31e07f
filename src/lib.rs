// THEORY:
// This file is the main entry point for the `scene_narrator` library crate.
// It exposes the `describe_scene` entry point and the `SceneDescriber` facade as
// the clean, high-level interface for the engine. The per-stage modules
// (`core_modules`) stay public so callers that only need one stage (a color
// profile, a pluralized noun) can reach it directly, but the expected use is:
// detections in, one sentence out.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use config::DescriberConfig;
pub use error::{BoxViolation, DescribeError};
pub use pipeline::{describe_scene, SceneDescriber};
